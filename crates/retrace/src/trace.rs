//! Diagnostic records for buffer bookkeeping.
//!
//! With the `log` feature enabled these forward to the `log` facade at the
//! given level; otherwise the arguments are type-checked and discarded.

#[cfg(feature = "log")]
macro_rules! trace {
    ($lvl:ident, $($arg:tt)+) => {
        ::log::$lvl!(target: "retrace", $($arg)+)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($lvl:ident, $($arg:tt)+) => {
        if false {
            let _ = ::core::format_args!($($arg)+);
        }
    };
}

pub(crate) use trace;
