//! Basic logging service usage example
//!
//! Demonstrates named loggers, the double level gate, sub-loggers, shared
//! options and buffered delivery.
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;
use unified_logger::prelude::*;
use unified_logger::{debug, trace};

fn main() -> Result<()> {
    println!("=== Unified Logger - Basic Usage Example ===\n");

    let directory = Arc::new(ServiceDirectory::new());
    let service = LoggingService::new(
        LoggingServiceConfig::builder()
            .level(LogLevel::Error)
            .global_object(directory.clone(), "logger")
            .build(),
    );

    println!("1. Named loggers at the default DEBUG level:");
    let logger = service.get_logger("Checkout");
    trace!(logger, "cart {} loaded", 42);
    debug!(logger, "applying {} discounts", 2);
    logger.info().emit_message("INFO is above DEBUG: hidden");

    println!("\n2. Sub-loggers:");
    let request = logger.sub_logger(Some("request"));
    request.sub_logger(Some("payment")).log().emit_message("authorized");
    logger.sub_logger(None).debug().emit_message("anonymous view");

    println!("\n3. Shared options:");
    let shared = SharedLoggerOptions::new("db", LoggerOptions::new().with_level(LogLevel::Log));
    let pool = service.get_logger_with("Pool", &shared);
    let query = service.get_logger_with("Query", &shared);
    pool.set_level(LogLevel::Warn);
    query.warn().emit(vec!["slow query".into(), serde_json::json!({"ms": 870}).into()]);

    println!("\n4. Lowering the global level silences verbose loggers:");
    service.set_level(LogLevel::Log);
    debug!(logger, "hidden: the logger's DEBUG level is above the global LOG level");

    println!("\n5. Buffered delivery:");
    service.set_level(LogLevel::Error);
    service.set_local_logging(false);
    service.set_remote_logging(true);
    for step in 0..2 {
        logger.debug().emit(vec!["buffered step".into(), step.into()]);
    }
    println!("   {} lines waiting", service.cached_lines().len());
    service.flush();

    let found = directory
        .lookup("logger")
        .ok_or_else(|| LoggerError::config("ServiceDirectory", "service not installed"))?;
    println!("\n{}", serde_json::to_string_pretty(&found.loggers())?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
