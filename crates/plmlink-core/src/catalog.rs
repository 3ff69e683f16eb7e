//! Sensor discovery and resolution.
//!
//! Discovery issues one catalog search per connector construction and
//! turns the response into typed [`Sensor`] records via `plmlink-types`.
//! Resolution then locates the configured signal by exact name and pins
//! down the `(instance_id, urn)` pair every subsequent fetch addresses.

use tracing::debug;

use plmlink_types::Sensor;
use plmlink_types::catalog::{decode_catalog, select_sensors};

use crate::auth::Token;
use crate::config::ConnectorConfig;
use crate::endpoints;
use crate::error::{Error, Result};
use crate::transport::{SEARCH_TIMEOUT, Transport};

/// The sensor a connector polls, resolved once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSensor {
    /// The configured signal name, as matched in the catalog.
    pub name: String,
    /// Backend instance identifier of the sensor node.
    pub instance_id: String,
    /// Urn of the sensor's first selected property.
    pub urn: String,
}

/// Query the catalog and return the discovered sensors in backend order.
///
/// Fails with [`Error::Discovery`] on transport or decode failure; there
/// is no partial catalog.
pub async fn discover_sensors(
    transport: &dyn Transport,
    config: &ConnectorConfig,
    token: &Token,
) -> Result<Vec<Sensor>> {
    let url = endpoints::search_url(config, token.as_str());
    let body = transport
        .get(&url, Some(token.as_str()), SEARCH_TIMEOUT)
        .await
        .map_err(|e| Error::discovery(e.to_string()))?;

    let nodes = decode_catalog(&body).map_err(|e| Error::discovery(e.to_string()))?;
    let sensors = select_sensors(nodes);
    debug!(
        model = %config.model,
        count = sensors.len(),
        "discovered sensors"
    );
    Ok(sensors)
}

/// Locate `signal_name` in the catalog.
///
/// Takes the first exact name match in catalog order; duplicate names are
/// not deduplicated. A missing signal or a match without any selected
/// property is a configuration problem, not a crash: the fetch URL cannot
/// be formed and the connector refuses to start.
pub fn resolve(catalog: &[Sensor], signal_name: &str) -> Result<ResolvedSensor> {
    let sensor = catalog
        .iter()
        .find(|s| s.name == signal_name)
        .ok_or_else(|| {
            Error::configuration(format!("signal '{signal_name}' not found in catalog"))
        })?;

    let property = sensor.properties.first().ok_or_else(|| {
        Error::configuration(format!("signal '{signal_name}' has no usable property"))
    })?;

    Ok(ResolvedSensor {
        name: sensor.name.clone(),
        instance_id: sensor.instance_id.clone(),
        urn: property.urn.clone(),
    })
}

#[cfg(test)]
mod tests {
    use plmlink_types::{Sensor, SensorProperty};

    use super::*;

    fn sensor(name: &str, id: &str, urns: &[&str]) -> Sensor {
        Sensor {
            name: name.to_string(),
            instance_id: id.to_string(),
            properties: urns
                .iter()
                .enumerate()
                .map(|(i, urn)| SensorProperty {
                    urn: urn.to_string(),
                    item_count: i as u64 + 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_resolve_exact_match() {
        let catalog = vec![
            sensor("Pressure", "3", &["urn:plm:press"]),
            sensor("Temp", "5", &["urn:plm:temp", "urn:plm:temp2"]),
        ];
        let resolved = resolve(&catalog, "Temp").unwrap();
        assert_eq!(resolved.instance_id, "5");
        assert_eq!(resolved.urn, "urn:plm:temp");
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let catalog = vec![
            sensor("Temp", "1", &["urn:first"]),
            sensor("Temp", "2", &["urn:second"]),
        ];
        let resolved = resolve(&catalog, "Temp").unwrap();
        assert_eq!(resolved.instance_id, "1");
        assert_eq!(resolved.urn, "urn:first");
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let catalog = vec![sensor("Temp", "5", &["urn:plm:temp"])];
        let err = resolve(&catalog, "temp").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_resolve_empty_catalog() {
        let err = resolve(&[], "Temp").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_resolve_sensor_without_properties() {
        let catalog = vec![sensor("Temp", "5", &[])];
        let err = resolve(&catalog, "Temp").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("no usable property"));
    }
}
