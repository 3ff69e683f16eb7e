//! Catalog data model for TruePLM sensor connectors.
//!
//! This crate provides the typed view of a PLM backend's property catalog:
//! the raw wire shapes returned by the catalog search endpoint, and the
//! selection rules that turn them into addressable sensors.
//!
//! # Selection rules
//!
//! A catalog node becomes a [`Sensor`] only when it exposes more than one
//! raw property (single-property nodes are identifiers or labels, not
//! measurement signals). Within a kept node, a property is selected when
//! its textual value is exactly `"<count> items"` with a plain decimal
//! count. Nodes whose properties all fail that filter are still kept, with
//! an empty property list, so that catalog order is preserved.
//!
//! # Example
//!
//! ```
//! use plmlink_types::catalog;
//!
//! let json = r#"[{"bkdn_elem_info": {
//!     "name": "Temp",
//!     "instance_id": "5",
//!     "properties": [
//!         {"name": "urn:plm:temp", "val": "3 items"},
//!         {"name": "urn:plm:label", "val": "external probe"}
//!     ]
//! }}]"#;
//!
//! let sensors = catalog::select_sensors(catalog::decode_catalog(json).unwrap());
//! assert_eq!(sensors.len(), 1);
//! assert_eq!(sensors[0].properties[0].item_count, 3);
//! ```

pub mod catalog;
pub mod error;

pub use catalog::{CatalogNode, ElementInfo, RawProperty, Sensor, SensorProperty};
pub use error::{ParseError, ParseResult};
