use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod contact;
pub mod settings;

pub use contact::{
    Contact, ContactChange, ContactQuery, ContactStatus, GoodFit, ImportContactsResponse,
    NewContact, ReferralType, Temperature,
};
pub use settings::{LoginRequest, Preferences, Theme};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
