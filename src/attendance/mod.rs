pub mod ledger;
pub mod state;
pub mod ticker;
pub mod tracker;

pub use state::{AttendanceSnapshot, PunchState, can_punch_in, can_punch_out};
pub use ticker::ElapsedTicker;
pub use tracker::AttendanceTracker;
