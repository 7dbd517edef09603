//! In-memory filtering of the contact list shown in the dashboard.

use serde::{Deserialize, Serialize};
use shared_types::{Contact, ContactStatus, ReferralType, Temperature};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Status tab selected in the dashboard
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
pub enum StatusTab {
    #[default]
    Prospect,
    #[serde(rename = "Signed On")]
    #[strum(serialize = "Signed On")]
    SignedOn,
    Archived,
    All,
}

impl StatusTab {
    pub fn matches(&self, status: ContactStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Prospect => status == ContactStatus::Prospect,
            StatusTab::SignedOn => status == ContactStatus::SignedOn,
            StatusTab::Archived => status == ContactStatus::Archived,
        }
    }
}

/// `all`, or one specific enum member. A null field never matches a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter<T> {
    All,
    Only(T),
}

impl<T> Default for FieldFilter<T> {
    fn default() -> Self {
        FieldFilter::All
    }
}

impl<T: PartialEq> FieldFilter<T> {
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: FromStr> FromStr for FieldFilter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(FieldFilter::All)
        } else {
            T::from_str(s).map(FieldFilter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFilter::All => write!(f, "all"),
            FieldFilter::Only(value) => write!(f, "{}", value),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProposalFilter {
    #[default]
    All,
    Yes,
    No,
}

impl ProposalFilter {
    pub fn matches(&self, proposal_sent: bool) -> bool {
        match self {
            ProposalFilter::All => true,
            ProposalFilter::Yes => proposal_sent,
            ProposalFilter::No => !proposal_sent,
        }
    }
}

/// Everything the dashboard filters on; all predicates must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    pub tab: StatusTab,
    pub search: String,
    pub temperature: FieldFilter<Temperature>,
    pub proposal: ProposalFilter,
    pub referral_type: FieldFilter<ReferralType>,
}

impl ContactFilter {
    pub fn for_tab(tab: StatusTab) -> Self {
        Self {
            tab,
            ..Self::default()
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        self.tab.matches(contact.status)
            && self.matches_search(&contact.name)
            && self.temperature.matches(contact.temperature.as_ref())
            && self.proposal.matches(contact.proposal_sent)
            && self.referral_type.matches(contact.referral_type.as_ref())
    }

    fn matches_search(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// Stable filter: survivors keep their relative order.
pub fn filter_contacts<'a>(contacts: &'a [Contact], filter: &ContactFilter) -> Vec<&'a Contact> {
    contacts.iter().filter(|c| filter.matches(c)).collect()
}

/// Badge counts shown on each tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub prospect: usize,
    pub signed_on: usize,
    pub archived: usize,
    pub all: usize,
}

pub fn tab_counts(contacts: &[Contact]) -> TabCounts {
    contacts.iter().fold(TabCounts::default(), |mut counts, c| {
        match c.status {
            ContactStatus::Prospect => counts.prospect += 1,
            ContactStatus::SignedOn => counts.signed_on += 1,
            ContactStatus::Archived => counts.archived += 1,
        }
        counts.all += 1;
        counts
    })
}
