//! Polling connector engine for TruePLM sensor data.
//!
//! This crate connects to a PLM backend, discovers the measurement
//! properties ("sensors") a model exposes, and repeatedly fetches
//! aggregate readings for one configured signal, handing each raw byte
//! batch to the caller. Event parsing and scheduling stay outside; the
//! engine owns authentication, catalog resolution, and the sliding time
//! window.
//!
//! # Startup and polling
//!
//! Construction performs the whole handshake (token, catalog search,
//! signal resolution) and fails fast on any problem. After that, each
//! [`Connector::poll`] yields one [`PollOutcome`]: a batch of raw bytes,
//! or the terminal signal that the configured window is used up.
//!
//! # Fetch modes
//!
//! - [`FetchMode::Windowed`]: slides a 30-minute `[from, to)` window
//!   across the configured range, minting a fresh single-use token for
//!   every fetch.
//! - [`FetchMode::Snapshot`]: fetches the whole aggregate series each
//!   poll, reusing one token until a fetch failure drops it.
//!
//! # Example
//!
//! ```no_run
//! use plmlink_core::{Connector, ConnectorConfig, PollOutcome};
//!
//! # async fn example(config: ConnectorConfig) -> plmlink_core::Result<()> {
//! let mut connector = Connector::connect(config).await?;
//!
//! loop {
//!     match connector.poll().await? {
//!         PollOutcome::Batch(bytes) => println!("{} bytes", bytes.len()),
//!         PollOutcome::Exhausted => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod connector;
pub mod endpoints;
pub mod error;
pub mod mock;
pub mod transport;
pub mod window;

pub use auth::Token;
pub use catalog::ResolvedSensor;
pub use config::{ConfigError, ConnectorConfig, FetchMode, WindowConfig};
pub use connector::{Connector, PollOutcome};
pub use error::{Error, Result};
pub use mock::MockTransport;
pub use transport::{HttpTransport, Transport, TransportError};
pub use window::{TimeWindow, WindowBound};
