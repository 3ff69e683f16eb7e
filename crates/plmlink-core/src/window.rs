//! Sliding time-window state.
//!
//! Each poll asks the backend for one `[from, to)` slice of the configured
//! range. The window owns the moving `lowest` bound and hands out the pair
//! for the next poll:
//!
//! - [`TimeWindow::advance_from`] moves `lowest` forward by one step and
//!   returns it as `from`. The very first call backs up by one step before
//!   moving forward, so the first poll starts at the configured `lowest`
//!   instead of one step past it.
//! - [`TimeWindow::peek_to`] returns `lowest + step` as `to` without
//!   touching any state.
//!
//! `advance_from` must be called before `peek_to` within one poll.
//!
//! Once `lowest` has reached a concrete `highest`, the window is exhausted:
//! both accessors return the same clamped bounds forever, and the caller
//! stops fetching. A `highest` of "now" never exhausts.
//!
//! All timestamps are interpreted as UTC.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::config::WindowConfig;
use crate::error::{Error, Result};

/// The backend's date shape, `yyyy-MM-dd HH:mm:ss`.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// How far each poll advances the window.
pub const STEP: Duration = Duration::minutes(30);

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp.
pub fn parse_datetime(input: &str) -> Result<PrimitiveDateTime> {
    PrimitiveDateTime::parse(input, DATE_FORMAT).map_err(|_| Error::invalid_date(input))
}

/// Format a timestamp back into the backend's date shape.
pub fn format_datetime(dt: PrimitiveDateTime) -> String {
    // The format description only contains infallible components.
    dt.format(DATE_FORMAT)
        .unwrap_or_else(|_| dt.to_string())
}

/// Convert a timestamp to epoch milliseconds (UTC).
pub fn epoch_millis(dt: PrimitiveDateTime) -> i64 {
    (dt.assume_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Upper bound of a polled range: a concrete timestamp, or the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// A fixed end; the window exhausts when `lowest` reaches it.
    At(PrimitiveDateTime),
    /// Open-ended; the window never exhausts.
    Now,
}

impl WindowBound {
    /// Parse a configured bound: a timestamp, or the literal `now`.
    pub fn parse(input: &str) -> Result<Self> {
        if input.eq_ignore_ascii_case("now") {
            Ok(Self::Now)
        } else {
            parse_datetime(input).map(Self::At)
        }
    }

    /// Resolve the bound to a concrete timestamp. `Now` resolves to the
    /// wall clock at the moment of the call.
    pub fn resolve(&self) -> PrimitiveDateTime {
        match self {
            Self::At(dt) => *dt,
            Self::Now => {
                let now = OffsetDateTime::now_utc();
                PrimitiveDateTime::new(now.date(), now.time())
            }
        }
    }
}

impl std::fmt::Display for WindowBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::At(dt) => write!(f, "{}", format_datetime(*dt)),
            Self::Now => write!(f, "now"),
        }
    }
}

/// The sliding window over the configured date range.
#[derive(Debug, Clone)]
pub struct TimeWindow {
    lowest: PrimitiveDateTime,
    highest: WindowBound,
    step: Duration,
    warmup_done: bool,
}

impl TimeWindow {
    /// Create a window over `[lowest, highest)` with the standard step.
    pub fn new(lowest: PrimitiveDateTime, highest: WindowBound) -> Self {
        Self {
            lowest,
            highest,
            step: STEP,
            warmup_done: false,
        }
    }

    /// Build a window from configured bounds.
    pub fn from_config(config: &WindowConfig) -> Result<Self> {
        let lowest = parse_datetime(&config.lowest)?;
        let highest = WindowBound::parse(&config.highest)?;
        Ok(Self::new(lowest, highest))
    }

    /// Current position of the moving bound.
    pub fn lowest(&self) -> PrimitiveDateTime {
        self.lowest
    }

    /// Configured end of the range.
    pub fn highest(&self) -> WindowBound {
        self.highest
    }

    /// Whether the range is used up. Only a concrete `highest` can
    /// exhaust; "now" keeps the window open indefinitely.
    pub fn is_exhausted(&self) -> bool {
        match self.highest {
            WindowBound::At(h) => self.lowest >= h,
            WindowBound::Now => false,
        }
    }

    /// Advance `lowest` by one step and return it as the `from` bound.
    ///
    /// The first call backs up one step before advancing, which cancels
    /// out and yields the configured `lowest` unchanged. Once exhausted,
    /// `lowest` is returned as-is forever.
    pub fn advance_from(&mut self) -> PrimitiveDateTime {
        if self.is_exhausted() {
            return self.lowest;
        }
        if !self.warmup_done {
            self.lowest -= self.step;
            self.warmup_done = true;
        }
        self.lowest += self.step;
        self.lowest
    }

    /// Look ahead to the `to` bound without mutating the window. Once
    /// exhausted, returns the concrete `highest` instead.
    pub fn peek_to(&self) -> PrimitiveDateTime {
        match self.highest {
            WindowBound::At(h) if self.lowest >= h => h,
            _ => self.lowest + self.step,
        }
    }
}
