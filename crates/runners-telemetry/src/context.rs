//! Span helpers for the application and for individual poll cycles.
//!
//! # Design
//! - The application span is entered once for the lifetime of the process and
//!   carries the build SHA.
//! - Cycle spans are attached with `Instrument` rather than entered, so the poll
//!   loop future stays `Send`.

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    #[must_use]
    /// Enter the application-level tracing span for the lifetime of the guard.
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        let span: &'static Span = Box::leak(Box::new(
            tracing::info_span!("app", service = %service, build_sha = %build_sha()),
        ));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Span wrapping a single poll cycle.
#[must_use]
pub fn cycle_span(cycle: u64) -> Span {
    tracing::info_span!("poll_cycle", cycle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_context_guard_enters_and_drops() {
        let guard = GlobalContextGuard::new("runners-exporter");
        drop(guard);
    }

    #[test]
    fn cycle_span_can_be_entered() {
        let span = cycle_span(7);
        let _entered = span.enter();
    }
}
