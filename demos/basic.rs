//! Basic facade usage.
//!
//! No setup is needed: the first call builds the global logger, which writes
//! one JSON record per line to standard output.

use ctxlog::Context;

fn main() {
    let ctx = Context::new().with_trace_id("req-42");

    ctxlog::info(&ctx, "This is an info message", &[]);
    ctxlog::debug(&ctx, "Dropped by the default info threshold", &[]);
    ctxlog::errorf!(&ctx, "failed: {}", "disk full");

    // No trace identifier: the record carries an empty traceID.
    ctxlog::infof!(&Context::new(), "background tick {}", 1);
}
