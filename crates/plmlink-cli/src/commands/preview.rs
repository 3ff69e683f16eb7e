//! Fetch one sample batch for schema inspection.

use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use plmlink_core::{Connector, ConnectorConfig, PollOutcome};

pub async fn run(config: ConnectorConfig) -> Result<()> {
    let mut connector = Connector::connect(config).await?;
    info!(
        samples = connector.schema_sample_size(),
        "fetching one batch; downstream schema inference reads this many events from it"
    );

    match connector.poll().await? {
        PollOutcome::Batch(bytes) => {
            io::stdout().write_all(&bytes)?;
            io::stdout().write_all(b"\n")?;
        }
        PollOutcome::Exhausted => {
            info!("window exhausted; nothing to preview");
        }
    }
    Ok(())
}
