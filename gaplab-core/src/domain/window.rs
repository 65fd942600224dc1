//! A bounded time and price range.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Time range plus price range covered by a set of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceWindow {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub min_price: f64,
    pub max_price: f64,
    /// Number of observations the window was built from.
    pub observations: usize,
}

impl PriceWindow {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// A window built from a single instant.
    pub fn is_point(&self) -> bool {
        self.start_time == self.end_time
    }

    /// True if the two time ranges share at least one instant.
    pub fn overlaps(&self, other: &PriceWindow) -> bool {
        self.start_time <= other.end_time && other.start_time <= self.end_time
    }

    /// `HH:MM-HH:MM @ $lo-$hi`, the form used in reports and CSV cells.
    pub fn describe(&self) -> String {
        format!(
            "{}-{} @ ${:.2}-${:.2}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.min_price,
            self.max_price
        )
    }
}
