//! services/portal/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the portal and the remote
//! visitor directory. The HTTP adapter and the development server share them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use visitor_portal_core::domain::VisitorEntry;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Body of `POST /visitors`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct RecordVisitorRequest {
    pub username: String,
}

/// Body of the password-protected log operations.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct PasswordRequest {
    pub password: String,
}

//=========================================================================================
// Response Payloads
//=========================================================================================

/// One visitor entry on the wire. The timestamp is nanoseconds since the epoch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct VisitorEntryRecord {
    pub username: String,
    pub timestamp: u64,
}

impl VisitorEntryRecord {
    pub fn to_domain(self) -> VisitorEntry {
        VisitorEntry {
            username: self.username,
            timestamp: self.timestamp,
        }
    }
}

impl From<VisitorEntry> for VisitorEntryRecord {
    fn from(entry: VisitorEntry) -> Self {
        Self {
            username: entry.username,
            timestamp: entry.timestamp,
        }
    }
}

/// Response of `POST /visitor-log/clear`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ClearLogResponse {
    pub cleared: bool,
}
