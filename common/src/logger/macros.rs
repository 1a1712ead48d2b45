use super::TraceId;
use tracing::{Level, Span};

/// Create a root span for a quote fetch or swap submission
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "root",
        op = name,
        trace_id = %trace_id.as_str()
    )
}

/// Create a child span (inherits trace_id automatically)
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "child", op = name)
}
