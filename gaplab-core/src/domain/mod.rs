//! Domain types for the EOD analyzer

pub mod observation;
pub mod opportunity;
pub mod trajectory;
pub mod window;

pub use observation::Observation;
pub use opportunity::{CatchableOpportunity, Rejection, RejectionReason};
pub use trajectory::{OpenSource, Trajectory};
pub use window::PriceWindow;

/// Ticker type alias
pub type Ticker = String;
