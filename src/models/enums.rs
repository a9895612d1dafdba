//! Shared domain enums
//!
//! The backend reports lifecycle states as free-form strings with a mixed
//! Indonesian/English vocabulary. Both enums normalize that vocabulary at
//! the deserialization edge (trimmed, case-insensitive) and preserve any
//! string they do not recognize instead of guessing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BorrowingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a borrowing transaction
///
/// The client never derives a status locally; it only overwrites its cached
/// value with whatever the backend last reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BorrowingStatus {
    /// Pickup booked, awaiting staff confirmation ("booked")
    Booked,
    /// Being prepared by staff ("diproses")
    Processing,
    /// Picked up and currently out ("dipinjam")
    Borrowed,
    /// Returned and closed ("selesai")
    Completed,
    /// Cancelled by the borrower ("dibatalkan")
    Cancelled,
    /// Rejected by staff ("ditolak")
    Rejected,
    /// Unrecognized vocabulary, kept verbatim
    Unknown(String),
}

impl BorrowingStatus {
    /// Parse the backend's status string, case/whitespace-insensitive
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "booked" => BorrowingStatus::Booked,
            "diproses" => BorrowingStatus::Processing,
            "dipinjam" => BorrowingStatus::Borrowed,
            "selesai" => BorrowingStatus::Completed,
            "dibatalkan" => BorrowingStatus::Cancelled,
            "ditolak" => BorrowingStatus::Rejected,
            _ => BorrowingStatus::Unknown(s.trim().to_string()),
        }
    }

    /// A terminal status ends the transaction lifecycle; polling stops here
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BorrowingStatus::Completed | BorrowingStatus::Cancelled | BorrowingStatus::Rejected
        )
    }

    /// Wire representation (the backend's own vocabulary)
    pub fn as_wire(&self) -> &str {
        match self {
            BorrowingStatus::Booked => "booked",
            BorrowingStatus::Processing => "diproses",
            BorrowingStatus::Borrowed => "dipinjam",
            BorrowingStatus::Completed => "selesai",
            BorrowingStatus::Cancelled => "dibatalkan",
            BorrowingStatus::Rejected => "ditolak",
            BorrowingStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for BorrowingStatus {
    fn from(s: String) -> Self {
        BorrowingStatus::parse(&s)
    }
}

impl From<BorrowingStatus> for String {
    fn from(s: BorrowingStatus) -> Self {
        s.as_wire().to_string()
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowingStatus::Booked => "Booked",
            BorrowingStatus::Processing => "Processing",
            BorrowingStatus::Borrowed => "Borrowed",
            BorrowingStatus::Completed => "Completed",
            BorrowingStatus::Cancelled => "Cancelled",
            BorrowingStatus::Rejected => "Rejected",
            BorrowingStatus::Unknown(s) => s,
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// UnitStatus
// ---------------------------------------------------------------------------

/// Status of one physically tracked borrowed unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitStatus {
    /// Currently out ("dipinjam"); the only returnable state
    Borrowed,
    /// Already returned ("dikembalikan")
    Returned,
    /// Unrecognized vocabulary, kept verbatim
    Other(String),
}

impl UnitStatus {
    /// Parse the backend's status string, case/whitespace-insensitive
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dipinjam" => UnitStatus::Borrowed,
            "dikembalikan" => UnitStatus::Returned,
            _ => UnitStatus::Other(s.trim().to_string()),
        }
    }

    /// Only units still out may be grouped for return
    pub fn is_returnable(&self) -> bool {
        matches!(self, UnitStatus::Borrowed)
    }
}

impl From<String> for UnitStatus {
    fn from(s: String) -> Self {
        UnitStatus::parse(&s)
    }
}

impl From<UnitStatus> for String {
    fn from(s: UnitStatus) -> Self {
        match s {
            UnitStatus::Borrowed => "dipinjam".to_string(),
            UnitStatus::Returned => "dikembalikan".to_string(),
            UnitStatus::Other(v) => v,
        }
    }
}
