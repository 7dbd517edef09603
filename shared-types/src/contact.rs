use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

/// Pipeline stage of a contact
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display,
    EnumString, EnumIter, AsRefStr,
)]
#[ts(export)]
pub enum ContactStatus {
    #[default]
    Prospect,
    #[serde(rename = "Signed On")]
    #[strum(serialize = "Signed On")]
    SignedOn,
    Archived,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[ts(export)]
pub enum Temperature {
    Hot,
    Warm,
    Lukewarm,
    Cold,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[ts(export)]
pub enum ReferralType {
    Organic,
    #[serde(rename = "BNI")]
    #[strum(serialize = "BNI")]
    Bni,
    Client,
    Family,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[ts(export)]
pub enum GoodFit {
    Yes,
    No,
    Maybe,
}

/// Rows written before status became required may still carry `null`;
/// those read back as the default stage.
fn status_or_default<'de, D>(deserializer: D) -> Result<ContactStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ContactStatus>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub created_at: String,
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: ContactStatus,
    pub name: String,
    pub initial_touchpoint: Option<String>,
    pub last_touchpoint: Option<String>,
    pub next_follow_up: Option<String>,
    pub temperature: Option<Temperature>,
    #[serde(default)]
    pub proposal_sent: bool,
    pub brief: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub referral_source: Option<String>,
    pub referral_type: Option<ReferralType>,
    pub good_fit: Option<GoodFit>,
    pub notes: Option<String>,
}

/// Insert payload, also used for a full-form save.
///
/// There is deliberately no `id` or `created_at`: both are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: ContactStatus,
    #[serde(default)]
    pub initial_touchpoint: Option<String>,
    #[serde(default)]
    pub last_touchpoint: Option<String>,
    #[serde(default)]
    pub next_follow_up: Option<String>,
    #[serde(default)]
    pub temperature: Option<Temperature>,
    #[serde(default)]
    pub proposal_sent: bool,
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub referral_source: Option<String>,
    #[serde(default)]
    pub referral_type: Option<ReferralType>,
    #[serde(default)]
    pub good_fit: Option<GoodFit>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewContact {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A single-field edit, as issued by inline editing in the table.
///
/// Serialized as `{"field": "temperature", "value": "Hot"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ContactChange {
    Name(String),
    Status(ContactStatus),
    InitialTouchpoint(Option<String>),
    LastTouchpoint(Option<String>),
    NextFollowUp(Option<String>),
    Temperature(Option<Temperature>),
    ProposalSent(bool),
    Brief(Option<String>),
    Phone(Option<String>),
    Email(Option<String>),
    ReferralSource(Option<String>),
    ReferralType(Option<ReferralType>),
    GoodFit(Option<GoodFit>),
    Notes(Option<String>),
}

impl ContactChange {
    /// Column name of the field this change touches.
    pub fn column(&self) -> &'static str {
        match self {
            ContactChange::Name(_) => "name",
            ContactChange::Status(_) => "status",
            ContactChange::InitialTouchpoint(_) => "initial_touchpoint",
            ContactChange::LastTouchpoint(_) => "last_touchpoint",
            ContactChange::NextFollowUp(_) => "next_follow_up",
            ContactChange::Temperature(_) => "temperature",
            ContactChange::ProposalSent(_) => "proposal_sent",
            ContactChange::Brief(_) => "brief",
            ContactChange::Phone(_) => "phone",
            ContactChange::Email(_) => "email",
            ContactChange::ReferralSource(_) => "referral_source",
            ContactChange::ReferralType(_) => "referral_type",
            ContactChange::GoodFit(_) => "good_fit",
            ContactChange::Notes(_) => "notes",
        }
    }

    pub fn apply_to(&self, contact: &mut Contact) {
        match self {
            ContactChange::Name(v) => contact.name = v.clone(),
            ContactChange::Status(v) => contact.status = *v,
            ContactChange::InitialTouchpoint(v) => contact.initial_touchpoint = v.clone(),
            ContactChange::LastTouchpoint(v) => contact.last_touchpoint = v.clone(),
            ContactChange::NextFollowUp(v) => contact.next_follow_up = v.clone(),
            ContactChange::Temperature(v) => contact.temperature = *v,
            ContactChange::ProposalSent(v) => contact.proposal_sent = *v,
            ContactChange::Brief(v) => contact.brief = v.clone(),
            ContactChange::Phone(v) => contact.phone = v.clone(),
            ContactChange::Email(v) => contact.email = v.clone(),
            ContactChange::ReferralSource(v) => contact.referral_source = v.clone(),
            ContactChange::ReferralType(v) => contact.referral_type = *v,
            ContactChange::GoodFit(v) => contact.good_fit = *v,
            ContactChange::Notes(v) => contact.notes = v.clone(),
        }
    }
}

/// Server-side list filters for `GET /api/contacts`.
///
/// Every field is optional; absent fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactQuery {
    pub status: Option<ContactStatus>,
    pub temperature: Option<Temperature>,
    pub proposal_sent: Option<bool>,
    pub referral_type: Option<ReferralType>,
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportContactsResponse {
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
    pub contacts: Vec<Contact>,
}
