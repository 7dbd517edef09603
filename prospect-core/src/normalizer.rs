//! Turns loosely-typed records (pasted JSON, old exports) into insertable contacts.

use serde_json::{Map, Value};
use shared_types::{ContactStatus, GoodFit, NewContact, ReferralType, Temperature};
use std::str::FromStr;

/// Normalize one untyped record.
///
/// Returns `None` when the record has no usable name; such records are skipped,
/// not treated as errors. Unknown fields (including `id` and `created_at`) are
/// ignored.
pub fn normalize_contact(record: &Value) -> Option<NewContact> {
    let fields = record.as_object()?;
    let name = text_field(fields, "name")?;

    Some(NewContact {
        name,
        status: enum_field::<ContactStatus>(fields, "status").unwrap_or_default(),
        initial_touchpoint: text_field(fields, "initial_touchpoint"),
        last_touchpoint: text_field(fields, "last_touchpoint"),
        next_follow_up: text_field(fields, "next_follow_up"),
        temperature: enum_field::<Temperature>(fields, "temperature"),
        proposal_sent: fields.get("proposal_sent").map(is_truthy).unwrap_or(false),
        brief: text_field(fields, "brief"),
        phone: text_field(fields, "phone"),
        email: text_field(fields, "email"),
        referral_source: text_field(fields, "referral_source"),
        referral_type: enum_field::<ReferralType>(fields, "referral_type"),
        good_fit: enum_field::<GoodFit>(fields, "good_fit"),
        notes: text_field(fields, "notes"),
    })
}

/// Text form of a JSON value, trimmed. Empty results become `None`.
pub fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `true`, `"true"`, `1` and `"1"` are true; everything else is false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(value_to_text)
}

/// Exact, case-sensitive match against the enum's wire names.
fn enum_field<T: FromStr>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = match fields.get(key)? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    T::from_str(&raw).ok()
}
