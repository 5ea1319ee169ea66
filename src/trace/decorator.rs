use super::resolver::WrapperChain;
use super::signature::{Body, Callable, MethodBody, Signature};
use crate::args::TraceArgs;
use crate::logger::{self, Logger};
use std::fmt::Debug;
use std::panic::Location;
use std::sync::Arc;

/// Body of a traced callable: logs the call, runs the wrapped body, logs
/// what it returned.
///
/// A panic in the wrapped body unwinds straight through; only the entering
/// line is written for that call.
pub struct Traced<F> {
    inner: F,
    signature: Arc<Signature>,
    logger: Arc<Logger>,
}

impl<F> Traced<F> {
    // resolved per call, never cached
    fn enter<A: TraceArgs>(&self, at: &'static Location<'static>, args: &A) {
        let chain = WrapperChain::discover(&self.signature);
        let original = chain.original();
        log::trace!(
            "{} (defined at {}) called through {} wrapper(s)",
            original.qualified_name(),
            original.defined_at(),
            chain.len() - 1
        );
        self.logger.trace_enter(at, original, &args.trace_args());
    }
}

impl<F, A> Body<A> for Traced<F>
where
    F: Body<A>,
    F::Output: Debug,
    A: TraceArgs,
{
    type Output = F::Output;

    fn run(&self, args: A, at: &'static Location<'static>) -> F::Output {
        self.enter(at, &args);
        let out = self.inner.run(args, at);
        self.logger.trace_exit(at, &out);
        out
    }
}

impl<F, S, A> MethodBody<S, A> for Traced<F>
where
    S: ?Sized,
    F: MethodBody<S, A>,
    F::Output: Debug,
    A: TraceArgs,
{
    type Output = F::Output;

    fn run_on(&self, receiver: &S, args: A, at: &'static Location<'static>) -> F::Output {
        self.enter(at, &args);
        let out = self.inner.run_on(receiver, args, at);
        self.logger.trace_exit(at, &out);
        out
    }
}

/// Trace `callable` through the process-wide logger.
///
/// The result declares that it stands in for `callable`, so wrappers applied
/// outside it still resolve to the same original.
pub fn trace<F>(callable: Callable<F>) -> Callable<Traced<F>> {
    trace_with(logger::global(), callable)
}

/// Same as [`trace`]; reads better where `q` is also in scope.
pub fn trace_explicit<F>(callable: Callable<F>) -> Callable<Traced<F>> {
    trace(callable)
}

pub fn trace_with<F>(logger: &Arc<Logger>, callable: Callable<F>) -> Callable<Traced<F>> {
    let (signature, inner) = callable.into_parts();
    let outer = Arc::new(Signature::wrapper(signature.name(), &signature));
    Callable::from_parts(
        outer,
        Traced {
            inner,
            signature,
            logger: Arc::clone(logger),
        },
    )
}

impl Logger {
    pub fn trace<F>(self: &Arc<Self>, callable: Callable<F>) -> Callable<Traced<F>> {
        trace_with(self, callable)
    }
}
