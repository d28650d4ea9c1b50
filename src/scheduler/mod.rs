mod assignment;
mod session;
mod staffing;
mod types;

pub use assignment::assign_round_robin;
pub use session::SchedulingSession;
pub use staffing::StaffingChecker;
pub use types::{Proposal, SchedError, Shortfall};
