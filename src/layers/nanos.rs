// SPDX-License-Identifier: BSD-3-Clause
use std::time::{Duration, SystemTime};

use tracing::{Id, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

// Span extensions are keyed by type; the newtype keeps this timestamp
// from clashing with one stored by another layer.
struct Entered(SystemTime);

/// Prints the wall-clock nanoseconds spent inside each span to stderr as
/// the span is exited.
#[derive(Debug, Default)]
pub struct NanoCountLayer;

impl<S> Layer<S> for NanoCountLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(Entered(SystemTime::now()));
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(Entered(time)) = span.extensions().get::<Entered>() {
                let elapsed = time.elapsed().unwrap_or(Duration::ZERO);
                eprintln!("{}: {}", span.name(), elapsed.as_nanos())
            }
        }
    }
}
