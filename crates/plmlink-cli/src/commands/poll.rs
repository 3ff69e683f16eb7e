//! Drive the connector on a fixed interval and emit raw batches.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::interval;
use tracing::{error, info, warn};

use plmlink_core::window::{WindowBound, format_datetime};
use plmlink_core::{Connector, ConnectorConfig, PollOutcome};

pub async fn run(config: ConnectorConfig, output: Option<PathBuf>, limit: u64) -> Result<()> {
    let poll_interval = Duration::from_secs(config.poll_interval_secs);
    let mut connector = Connector::connect(config).await?;

    if let Some(window) = connector.window() {
        match window.highest() {
            WindowBound::At(_) => info!(
                from = %format_datetime(window.lowest()),
                to = %window.highest(),
                "polling bounded window"
            ),
            WindowBound::Now => info!(
                from = %format_datetime(window.lowest()),
                now = %format_datetime(window.highest().resolve()),
                "polling open-ended window"
            ),
        }
    }

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let mut timer = interval(poll_interval);
    let mut batches = 0u64;
    let mut consecutive_failures = 0u32;

    loop {
        timer.tick().await;

        match connector.poll().await {
            Ok(PollOutcome::Batch(bytes)) => {
                consecutive_failures = 0;
                writer.write_all(&bytes)?;
                writer.write_all(b"\n")?;
                writer.flush()?;

                batches += 1;
                if limit > 0 && batches >= limit {
                    info!(batches, "batch limit reached, stopping");
                    break;
                }
            }
            Ok(PollOutcome::Exhausted) => {
                info!(batches, "window exhausted, no further data");
                break;
            }
            Err(e) => {
                consecutive_failures += 1;
                if consecutive_failures <= 3 {
                    warn!(attempt = consecutive_failures, "poll failed: {e}");
                } else if consecutive_failures == 4 {
                    error!("poll failed {consecutive_failures} times, will keep trying silently");
                }
                // The connector recovers on its own: the next poll
                // re-authenticates and retries the same slice.
            }
        }
    }

    Ok(())
}
