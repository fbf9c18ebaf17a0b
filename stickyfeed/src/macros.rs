// Every log line of the crate goes through `slog!` so the target stays in one place.

#[cfg(feature = "tracing")]
macro_rules! slog {
    ($level:ident, $($tt:tt)*) => {
        tracing::$level!(target: "stickyfeed", $($tt)*)
    };
}

/// Without the `tracing` feature log calls expand to nothing and their arguments are not evaluated.
#[cfg(not(feature = "tracing"))]
macro_rules! slog {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! strace {
    ($($tt:tt)*) => { slog!(trace, $($tt)*) };
}

macro_rules! sdebug {
    ($($tt:tt)*) => { slog!(debug, $($tt)*) };
}

macro_rules! swarn {
    ($($tt:tt)*) => { slog!(warn, $($tt)*) };
}
