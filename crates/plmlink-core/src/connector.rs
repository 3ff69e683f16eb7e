//! The poll orchestrator.
//!
//! A [`Connector`] owns everything one adapter instance needs: the
//! configuration, the transport, the sensor resolved at construction, the
//! held token, and the window position. It is built once and then polled
//! by a single caller; polls run strictly one at a time (the type is not
//! `Clone` and `poll` takes `&mut self`, so the compiler enforces this).
//!
//! Each poll walks the same path: ensure a token, compute the next window
//! slice, build the fetch URL, GET the bytes. Nothing is retried in here;
//! the caller owns cadence and retry policy.

use bytes::Bytes;
use tracing::{debug, info};

use crate::auth::{self, Token};
use crate::catalog::{self, ResolvedSensor};
use crate::config::{ConnectorConfig, FetchMode};
use crate::endpoints;
use crate::error::{Error, Result};
use crate::transport::{FETCH_TIMEOUT, HttpTransport, Transport};
use crate::window::{TimeWindow, epoch_millis};

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// One raw event batch, to be parsed downstream.
    Batch(Bytes),
    /// The configured window is used up; no request was made. Terminal:
    /// every further poll returns this again.
    Exhausted,
}

/// A polling connector bound to one backend sensor.
pub struct Connector {
    config: ConnectorConfig,
    transport: Box<dyn Transport>,
    sensor: ResolvedSensor,
    token: Option<Token>,
    window: Option<TimeWindow>,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("sensor", &self.sensor)
            .field("mode", &self.config.mode)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl Connector {
    /// Build a connector against the live backend.
    ///
    /// Construction performs the full startup handshake: validate the
    /// configuration, mint a token, discover the catalog, and resolve the
    /// configured signal. Any failure aborts construction; there is no
    /// partially initialized connector.
    pub async fn connect(config: ConnectorConfig) -> Result<Self> {
        let transport =
            HttpTransport::new().map_err(|e| Error::configuration(e.to_string()))?;
        Self::with_transport(config, Box::new(transport)).await
    }

    /// Build a connector over a caller-supplied transport.
    pub async fn with_transport(
        config: ConnectorConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::configuration(e.to_string()))?;

        let token = auth::authenticate(&*transport, &config).await?;
        let sensors = catalog::discover_sensors(&*transport, &config, &token).await?;
        let sensor = catalog::resolve(&sensors, &config.signal_name)?;

        let window = match config.mode {
            FetchMode::Windowed => {
                let bounds = config.window.as_ref().ok_or_else(|| {
                    Error::configuration("windowed mode requires window bounds")
                })?;
                Some(TimeWindow::from_config(bounds)?)
            }
            FetchMode::Snapshot => None,
        };

        info!(
            signal = %sensor.name,
            instance_id = %sensor.instance_id,
            urn = %sensor.urn,
            mode = ?config.mode,
            "connector ready"
        );

        Ok(Self {
            config,
            transport,
            sensor,
            token: Some(token),
            window,
        })
    }

    /// The sensor this connector polls.
    pub fn sensor(&self) -> &ResolvedSensor {
        &self.sensor
    }

    /// The connector's configuration.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Current window position, when running windowed.
    pub fn window(&self) -> Option<&TimeWindow> {
        self.window.as_ref()
    }

    /// How many sample events downstream schema inference should request.
    pub fn schema_sample_size(&self) -> usize {
        match self.config.mode {
            FetchMode::Windowed => 2,
            FetchMode::Snapshot => 8,
        }
    }

    /// Run one poll.
    ///
    /// Returns [`PollOutcome::Exhausted`] without any network traffic once
    /// the window is used up. On a fetch failure the window position is
    /// rolled back and the token is dropped, so the next poll
    /// re-authenticates and retries the same slice.
    pub async fn poll(&mut self) -> Result<PollOutcome> {
        if let Some(window) = &self.window {
            if window.is_exhausted() {
                debug!(signal = %self.sensor.name, "window exhausted, no more data");
                return Ok(PollOutcome::Exhausted);
            }
        }

        let token = match self.token.take() {
            Some(token) => token,
            None => auth::authenticate(&*self.transport, &self.config).await?,
        };

        let saved_window = self.window.clone();
        let url = match &mut self.window {
            Some(window) => {
                // advance_from mutates the position peek_to reads, so the
                // order of these two calls is load-bearing.
                let from = window.advance_from();
                let to = window.peek_to();
                endpoints::windowed_fetch_url(
                    &self.config,
                    &self.sensor.instance_id,
                    &self.sensor.urn,
                    token.as_str(),
                    epoch_millis(from),
                    epoch_millis(to),
                )
            }
            None => endpoints::snapshot_fetch_url(
                &self.config,
                &self.sensor.instance_id,
                &self.sensor.urn,
                token.as_str(),
            ),
        };

        debug!(signal = %self.sensor.name, %url, "fetching batch");
        match self
            .transport
            .get_bytes(&url, Some(token.as_str()), FETCH_TIMEOUT)
            .await
        {
            Ok(bytes) => {
                // Windowed tokens are single-use; drop this one so the
                // next poll mints a fresh one. Snapshot mode keeps it.
                if self.config.mode == FetchMode::Snapshot {
                    self.token = Some(token);
                }
                debug!(signal = %self.sensor.name, len = bytes.len(), "batch received");
                Ok(PollOutcome::Batch(bytes))
            }
            Err(e) => {
                // A failed fetch must not consume the window slice; the
                // token stays dropped so the next poll authenticates
                // afresh.
                self.window = saved_window;
                Err(Error::fetch(url, e.to_string()))
            }
        }
    }
}
