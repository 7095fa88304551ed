//! Structured fields and derived loggers.
//!
//! Installs an explicitly configured global logger, then logs from
//! concurrent tasks that each carry their own trace identifier.

use ctxlog::{Context, Field};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ctxlog::builder().with_level("debug").init()?;

    let mut handles = Vec::new();
    for request in 0..3 {
        handles.push(tokio::spawn(async move {
            let ctx = Context::new().with_trace_id(format!("req-{request}"));
            ctxlog::debug(&ctx, "request accepted", &[Field::uint("request", request)]);

            // A derived logger keeps its fields for every record.
            if let Some(logger) = ctxlog::with_context(&ctx) {
                let logger = logger.with(Field::string("component", "auth"));
                logger.info("User logged in", &[Field::int("user_id", 123)]);
            }
        }));
    }
    for handle in handles {
        handle.await?;
    }

    Ok(())
}
