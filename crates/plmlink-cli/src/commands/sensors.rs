//! List the sensors discovered under the configured model.

use anyhow::Result;

use plmlink_core::transport::HttpTransport;
use plmlink_core::{ConnectorConfig, auth, catalog};

pub async fn run(config: ConnectorConfig, format: &str) -> Result<()> {
    let transport = HttpTransport::new()?;
    let token = auth::authenticate(&transport, &config).await?;
    let sensors = catalog::discover_sensors(&transport, &config, &token).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&sensors)?);
        return Ok(());
    }

    if sensors.is_empty() {
        println!("No sensors found under model '{}'", config.model);
        return Ok(());
    }

    for sensor in &sensors {
        println!("{} (instance {})", sensor.name, sensor.instance_id);
        if sensor.properties.is_empty() {
            println!("  (no addressable properties)");
        }
        for property in &sensor.properties {
            println!("  {} [{} items]", property.urn, property.item_count);
        }
    }
    Ok(())
}
