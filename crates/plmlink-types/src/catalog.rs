//! Catalog wire shapes and sensor selection.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// One node of the catalog search response, as returned by the backend.
///
/// The backend wraps every node in a `bkdn_elem_info` envelope; fields the
/// connector does not use are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogNode {
    /// Element info envelope.
    pub bkdn_elem_info: ElementInfo,
}

/// Element info block of a catalog node.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementInfo {
    /// Display name of the node.
    pub name: String,
    /// Backend-assigned instance identifier.
    pub instance_id: String,
    /// Raw properties attached to the node, in backend order.
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

/// A raw property of a catalog node.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    /// The property urn (backend property identifier).
    pub name: String,
    /// Textual property value, e.g. `"3 items"`.
    #[serde(default)]
    pub val: String,
}

/// A measurement property selected from a catalog node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorProperty {
    /// The urn used to address this measurement in fetch queries.
    pub urn: String,
    /// Number of items the backend reports for this property.
    pub item_count: u64,
}

/// A discovered sensor: a catalog node that exposes more than one raw
/// property, with its selected measurement properties.
///
/// `properties` may be empty when none of the node's raw properties passed
/// the `"<count> items"` filter; such entries are kept so that catalog
/// order and name lookup stay faithful to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    /// Display name, matched exactly against the configured signal name.
    pub name: String,
    /// Backend-assigned instance identifier.
    pub instance_id: String,
    /// Selected measurement properties, in backend order.
    pub properties: Vec<SensorProperty>,
}

impl Sensor {
    /// Build a sensor from a raw catalog node.
    ///
    /// Returns `None` for nodes with one or zero raw properties; those are
    /// identifiers or labels, not addressable sensors.
    #[must_use]
    pub fn from_node(node: CatalogNode) -> Option<Self> {
        let info = node.bkdn_elem_info;
        if info.properties.len() <= 1 {
            return None;
        }

        let properties = info
            .properties
            .iter()
            .filter_map(|p| {
                parse_item_count(&p.val).map(|item_count| SensorProperty {
                    urn: p.name.clone(),
                    item_count,
                })
            })
            .collect();

        Some(Self {
            name: info.name,
            instance_id: info.instance_id,
            properties,
        })
    }
}

/// Parse a property value of the exact form `"<count> items"`.
///
/// The value must split on single spaces into exactly two tokens, the
/// second must be the literal `items` (case-sensitive), and the first must
/// be plain decimal digits: no sign, no decimal point, no surrounding
/// whitespace.
#[must_use]
pub fn parse_item_count(val: &str) -> Option<u64> {
    let mut parts = val.split(' ');
    let count = parts.next()?;
    let unit = parts.next()?;
    if parts.next().is_some() || unit != "items" {
        return None;
    }
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    count.parse().ok()
}

/// Decode a catalog search response body into raw nodes.
pub fn decode_catalog(body: &str) -> ParseResult<Vec<CatalogNode>> {
    serde_json::from_str(body).map_err(|e| ParseError::InvalidDocument(e.to_string()))
}

/// Turn raw catalog nodes into sensors, preserving backend order.
///
/// No sorting and no deduplication by name: duplicate names are resolved
/// downstream by first exact match.
#[must_use]
pub fn select_sensors(nodes: Vec<CatalogNode>) -> Vec<Sensor> {
    nodes.into_iter().filter_map(Sensor::from_node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, id: &str, props: &[(&str, &str)]) -> CatalogNode {
        CatalogNode {
            bkdn_elem_info: ElementInfo {
                name: name.to_string(),
                instance_id: id.to_string(),
                properties: props
                    .iter()
                    .map(|(n, v)| RawProperty {
                        name: n.to_string(),
                        val: v.to_string(),
                    })
                    .collect(),
            },
        }
    }

    // --- parse_item_count ---

    #[test]
    fn test_parse_item_count_valid() {
        assert_eq!(parse_item_count("3 items"), Some(3));
        assert_eq!(parse_item_count("0 items"), Some(0));
        assert_eq!(parse_item_count("40210 items"), Some(40210));
    }

    #[test]
    fn test_parse_item_count_rejects_wrong_unit() {
        assert_eq!(parse_item_count("3 item"), None);
        assert_eq!(parse_item_count("3 Items"), None);
        assert_eq!(parse_item_count("3 ITEMS"), None);
    }

    #[test]
    fn test_parse_item_count_rejects_non_digits() {
        assert_eq!(parse_item_count("+3 items"), None);
        assert_eq!(parse_item_count("-3 items"), None);
        assert_eq!(parse_item_count("3.5 items"), None);
        assert_eq!(parse_item_count("three items"), None);
        assert_eq!(parse_item_count(" items"), None);
    }

    #[test]
    fn test_parse_item_count_rejects_wrong_token_count() {
        assert_eq!(parse_item_count("items"), None);
        assert_eq!(parse_item_count("3"), None);
        assert_eq!(parse_item_count("3 items extra"), None);
        assert_eq!(parse_item_count("3  items"), None); // double space -> three tokens
        assert_eq!(parse_item_count(""), None);
    }

    // --- Sensor::from_node / select_sensors ---

    #[test]
    fn test_single_property_node_excluded() {
        let nodes = vec![node("Label", "1", &[("urn:a", "3 items")])];
        assert!(select_sensors(nodes).is_empty());
    }

    #[test]
    fn test_empty_property_node_excluded() {
        let nodes = vec![node("Empty", "1", &[])];
        assert!(select_sensors(nodes).is_empty());
    }

    #[test]
    fn test_non_matching_property_dropped_node_kept() {
        let nodes = vec![node(
            "Temp",
            "5",
            &[("urn:a", "3 items"), ("urn:b", "external probe")],
        )];
        let sensors = select_sensors(nodes);
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].name, "Temp");
        assert_eq!(sensors[0].instance_id, "5");
        assert_eq!(
            sensors[0].properties,
            vec![SensorProperty {
                urn: "urn:a".to_string(),
                item_count: 3,
            }]
        );
    }

    #[test]
    fn test_zero_selected_properties_node_retained() {
        let nodes = vec![node("Labels", "7", &[("urn:a", "foo"), ("urn:b", "bar")])];
        let sensors = select_sensors(nodes);
        assert_eq!(sensors.len(), 1);
        assert!(sensors[0].properties.is_empty());
    }

    #[test]
    fn test_catalog_order_preserved_no_dedup() {
        let nodes = vec![
            node("A", "1", &[("urn:x", "1 items"), ("urn:y", "2 items")]),
            node("A", "2", &[("urn:z", "3 items"), ("urn:w", "4 items")]),
        ];
        let sensors = select_sensors(nodes);
        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].instance_id, "1");
        assert_eq!(sensors[1].instance_id, "2");
    }

    // --- decode_catalog ---

    #[test]
    fn test_decode_catalog() {
        let json = r#"[
            {"bkdn_elem_info": {"name": "Temp", "instance_id": "5", "properties": [
                {"name": "urn:plm:temp", "val": "3 items"},
                {"name": "urn:plm:label", "val": "bad"}
            ]}},
            {"bkdn_elem_info": {"name": "Id", "instance_id": "6", "properties": [
                {"name": "urn:plm:id", "val": "1 items"}
            ]}}
        ]"#;

        let sensors = select_sensors(decode_catalog(json).unwrap());
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].name, "Temp");
        assert_eq!(sensors[0].properties[0].urn, "urn:plm:temp");
    }

    #[test]
    fn test_decode_catalog_ignores_unknown_fields() {
        let json = r#"[{"bkdn_elem_info": {
            "name": "Temp", "instance_id": "5", "type": "PROPERTY",
            "properties": [{"name": "a", "val": "1 items", "unit": "C"},
                           {"name": "b", "val": "2 items"}]
        }, "path": "/root/Temp"}]"#;

        let nodes = decode_catalog(json).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].bkdn_elem_info.properties.len(), 2);
    }

    #[test]
    fn test_decode_catalog_missing_properties_defaults_empty() {
        let json = r#"[{"bkdn_elem_info": {"name": "Bare", "instance_id": "9"}}]"#;
        let nodes = decode_catalog(json).unwrap();
        assert!(nodes[0].bkdn_elem_info.properties.is_empty());
    }

    #[test]
    fn test_decode_catalog_invalid_json() {
        let err = decode_catalog("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid catalog document"));
    }
}
