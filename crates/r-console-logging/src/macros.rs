//! ---
//! console_section: "03-logging"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Structured logging adapters and sinks."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
/// Emit an informational log enriched with navigation context.
#[macro_export]
macro_rules! console_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::console_event!(tracing::Level::INFO, context = $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::console_event!(tracing::Level::INFO, context = $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with navigation context.
#[macro_export]
macro_rules! console_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::console_event!(tracing::Level::DEBUG, context = $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::console_event!(tracing::Level::DEBUG, context = $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with navigation context.
#[macro_export]
macro_rules! console_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::console_event!(tracing::Level::WARN, context = $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::console_event!(tracing::Level::WARN, context = $crate::LogContext::default(), $($arg)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! console_event {
    ($level:expr, context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            user = ctx.user.unwrap_or(""),
            path = ctx.path.unwrap_or(""),
            route = ctx.route.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}
