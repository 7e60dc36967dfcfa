//! Logging macros that forward to `tracing` when the `tracing` feature is on.
//!
//! Without the feature the arguments are still type-checked (and count as
//! used) but nothing is formatted at runtime.

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => { ::tracing::debug!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {
        if false {
            let _ = ::std::format!($($tt)*);
        }
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { ::tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {
        if false {
            let _ = ::std::format!($($tt)*);
        }
    };
}

#[cfg(feature = "tracing")]
macro_rules! warn_ {
    ($($tt:tt)*) => { ::tracing::warn!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_ {
    ($($tt:tt)*) => {
        if false {
            let _ = ::std::format!($($tt)*);
        }
    };
}

pub(crate) use {debug, trace, warn_ as warn};
