//! Tuple views over the arguments handed to `q!` and to traced callables.

use std::fmt::Debug;
use std::ops::Deref;

/// The values of a multi-argument `q!` call, left to right.
///
/// Implemented for tuples of up to 12 `Debug` values.
#[diagnostic::on_unimplemented(
    message = "`q!` cannot log `{Self}`",
    label = "every argument must implement `Debug`",
    note = "`q!` and `q_with!` take at most 12 arguments; split longer lists into several calls"
)]
pub trait ArgValues {
    fn debug_values(&self) -> Vec<&dyn Debug>;
}

/// One argument of a traced call.
pub trait TraceArg {
    /// The key supplied at call time, for keyword arguments.
    fn keyword(&self) -> Option<&str>;
    fn value(&self) -> &dyn Debug;
}

impl<T: Debug> TraceArg for T {
    fn keyword(&self) -> Option<&str> {
        None
    }

    fn value(&self) -> &dyn Debug {
        self
    }
}

/// A keyword argument: logged as `name=value` under the key given here,
/// whatever the callee calls the parameter.
///
/// ```
/// use qtrace::Kw;
/// let sep = Kw::new("sep", ", ");
/// assert_eq!(*sep, ", ");
/// ```
pub struct Kw<T> {
    name: &'static str,
    value: T,
}

impl<T> Kw<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Kw<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Debug> TraceArg for Kw<T> {
    fn keyword(&self) -> Option<&str> {
        Some(self.name)
    }

    fn value(&self) -> &dyn Debug {
        &self.value
    }
}

/// All arguments of a traced call, in call order.
pub trait TraceArgs {
    fn trace_args(&self) -> Vec<&dyn TraceArg>;
}

impl TraceArgs for () {
    fn trace_args(&self) -> Vec<&dyn TraceArg> {
        Vec::new()
    }
}

macro_rules! tuple_impls {
    ($( ($($T:ident $idx:tt),+) )+) => {
        $(
            impl<$($T: Debug),+> ArgValues for ($($T,)+) {
                fn debug_values(&self) -> Vec<&dyn Debug> {
                    vec![$(&self.$idx as &dyn Debug),+]
                }
            }

            impl<$($T: TraceArg),+> TraceArgs for ($($T,)+) {
                fn trace_args(&self) -> Vec<&dyn TraceArg> {
                    vec![$(&self.$idx as &dyn TraceArg),+]
                }
            }
        )+
    };
}

tuple_impls! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11)
}
