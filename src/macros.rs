/// Log the source text and value of each argument, then hand the value(s)
/// back unchanged.
///
/// One argument returns that value; several return a tuple. Arguments are
/// evaluated exactly once. A single call takes at most 12 arguments.
///
/// ```no_run
/// let n = 3;
/// let doubled = qtrace::q!(n * 2) + 1;
/// let (a, b) = qtrace::q!(n, doubled);
/// # let _ = (a, b);
/// ```
#[macro_export]
macro_rules! q {
    ($val:expr $(,)?) => {
        $crate::q_with!($crate::global(); $val)
    };
    ($($val:expr),+ $(,)?) => {
        $crate::q_with!($crate::global(); $($val),+)
    };
}

/// [`q!`] through an explicit [`Logger`](crate::Logger) handle.
#[macro_export]
macro_rules! q_with {
    ($logger:expr; $val:expr $(,)?) => {
        match $val {
            value => {
                $logger.log_values(
                    &$crate::__caller!($val),
                    &[&value as &dyn ::core::fmt::Debug],
                );
                value
            }
        }
    };
    ($logger:expr; $($val:expr),+ $(,)?) => {
        match ($($val,)+) {
            values => {
                $logger.log_values(
                    &$crate::__caller!($($val),+),
                    &$crate::ArgValues::debug_values(&values),
                );
                values
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __caller {
    ($($val:expr),+) => {
        $crate::Caller {
            file: ::core::file!(),
            line: ::core::line!(),
            column: ::core::column!(),
            function: $crate::__function_path!(),
            manifest_dir: ::core::option_env!("CARGO_MANIFEST_DIR"),
            exprs: &[$(::core::stringify!($val)),+],
        }
    };
}

/// Path of the enclosing function, from the type name of a nested item.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __qtrace_probe() {}
        let path = ::core::any::type_name_of_val(&__qtrace_probe);
        match path.strip_suffix("::__qtrace_probe") {
            Some(outer) => outer,
            None => path,
        }
    }};
}
