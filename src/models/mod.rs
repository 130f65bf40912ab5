//! Data models for Bukutamu

pub mod enums;
pub mod ticket;
pub mod visitor;

// Re-export commonly used types
pub use enums::{ExportPeriod, VisitPurpose};
pub use ticket::Ticket;
pub use visitor::{CheckInRequest, CheckInResponse, VisitorRecord};
