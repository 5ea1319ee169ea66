mod decorator;
mod resolver;
mod signature;

pub use decorator::{trace, trace_explicit, trace_with, Traced};
pub use resolver::WrapperChain;
pub use signature::{Binding, Body, Callable, MethodBody, Signature};
