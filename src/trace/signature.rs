use std::panic::Location;
use std::sync::Arc;

/// How a callable is bound to an owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Function,
    /// Called through `Callable::call_on` with a receiver.
    Method(String),
    Static(String),
    /// Associated function that receives its type implicitly.
    Class(String),
}

impl Binding {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Binding::Function => None,
            Binding::Method(owner) | Binding::Static(owner) | Binding::Class(owner) => Some(owner),
        }
    }
}

/// Identity metadata of a callable: its name, binding, declared parameter
/// names (receiver excluded), where it was defined, and, for wrappers that
/// declare it, the callable it stands in for.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    binding: Binding,
    params: Vec<String>,
    defined_at: &'static Location<'static>,
    wraps: Option<Arc<Signature>>,
}

impl Signature {
    #[track_caller]
    pub fn function(name: impl Into<String>) -> Self {
        Self::bound(name, Binding::Function)
    }

    #[track_caller]
    pub fn method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::bound(name, Binding::Method(owner.into()))
    }

    #[track_caller]
    pub fn static_method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::bound(name, Binding::Static(owner.into()))
    }

    #[track_caller]
    pub fn class_method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::bound(name, Binding::Class(owner.into()))
    }

    /// A wrapper named `name` that declares it stands in for `wrapped`.
    /// It inherits the binding so it is called the same way.
    #[track_caller]
    pub fn wrapper(name: impl Into<String>, wrapped: &Arc<Signature>) -> Self {
        Self {
            wraps: Some(Arc::clone(wrapped)),
            ..Self::bound(name, wrapped.binding.clone())
        }
    }

    #[track_caller]
    fn bound(name: impl Into<String>, binding: Binding) -> Self {
        Self {
            name: name.into(),
            binding,
            params: Vec::new(),
            defined_at: Location::caller(),
            wraps: None,
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn defined_at(&self) -> &'static Location<'static> {
        self.defined_at
    }

    pub fn wraps(&self) -> Option<&Arc<Signature>> {
        self.wraps.as_ref()
    }

    /// `Owner::name` for bound callables, `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match self.binding.owner() {
            Some(owner) => format!("{}::{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}

/// Something that can be run with a tuple of arguments.
///
/// Every `Fn(A) -> R` is a body; `Traced` is the other one.
pub trait Body<A> {
    type Output;

    fn run(&self, args: A, at: &'static Location<'static>) -> Self::Output;
}

impl<F, A, R> Body<A> for F
where
    F: Fn(A) -> R,
{
    type Output = R;

    fn run(&self, args: A, _at: &'static Location<'static>) -> R {
        self(args)
    }
}

/// A body run against a receiver that is passed separately from the
/// arguments and never logged.
pub trait MethodBody<S: ?Sized, A> {
    type Output;

    fn run_on(&self, receiver: &S, args: A, at: &'static Location<'static>) -> Self::Output;
}

impl<F, S, A, R> MethodBody<S, A> for F
where
    S: ?Sized,
    F: Fn(&S, A) -> R,
{
    type Output = R;

    fn run_on(&self, receiver: &S, args: A, _at: &'static Location<'static>) -> R {
        self(receiver, args)
    }
}

/// A body together with its identity metadata.
pub struct Callable<F> {
    signature: Arc<Signature>,
    body: F,
}

impl<F> Callable<F> {
    pub fn new(signature: Signature, body: F) -> Self {
        Self::from_parts(Arc::new(signature), body)
    }

    pub fn from_parts(signature: Arc<Signature>, body: F) -> Self {
        Self { signature, body }
    }

    pub fn signature(&self) -> &Arc<Signature> {
        &self.signature
    }

    pub fn into_parts(self) -> (Arc<Signature>, F) {
        (self.signature, self.body)
    }

    #[track_caller]
    pub fn call<A>(&self, args: A) -> <F as Body<A>>::Output
    where
        F: Body<A>,
    {
        self.body.run(args, Location::caller())
    }

    #[track_caller]
    pub fn call_on<S, A>(&self, receiver: &S, args: A) -> <F as MethodBody<S, A>>::Output
    where
        S: ?Sized,
        F: MethodBody<S, A>,
    {
        self.body.run_on(receiver, args, Location::caller())
    }
}
