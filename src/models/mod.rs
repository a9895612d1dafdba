//! Data models for the Labloan client

pub mod borrowing;
pub mod enums;
pub mod equipment;
pub mod unit;

// Re-export commonly used types
pub use borrowing::{BookingItem, BookingRequest, BorrowingDetail, BorrowingItem, BorrowingSummary, ReturnRequest};
pub use enums::{BorrowingStatus, UnitStatus};
pub use equipment::{Category, Equipment};
pub use unit::BorrowedUnit;
