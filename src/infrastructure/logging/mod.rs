//! Logging infrastructure with file output support for release builds.

use crate::infrastructure::config::paths;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging with console output and optional daily-rotated
/// file output under the logs directory.
///
/// Console logs go to stderr so command output on stdout stays clean.
/// RUST_LOG overrides the verbosity flag when set.
pub fn setup(verbosity: u8, log_to_file: bool) {
    let directive = match verbosity {
        0 => "fangji=info",
        1 => "fangji=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let file_layer = if log_to_file {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "fangji.log");

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false) // No ANSI colors in file output
                    .with_writer(file_appender)
                    .with_filter(EnvFilter::new("info")),
            )
        }
    } else {
        None
    };

    match file_layer {
        Some(file_layer) => {
            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry().with(console_layer).init();
        }
    }

    if log_to_file {
        tracing::debug!("File logging enabled: {:?}", paths::log_dir());
    }
}
