use crate::database::AsyncDbConnection;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use prospect_core::{ContactStore, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use shared_types::{Contact, ContactChange, ContactQuery, ContactStatus, NewContact};
use std::str::FromStr;

const CONTACT_COLUMNS: &str = "id, created_at, status, name, initial_touchpoint, last_touchpoint,
    next_follow_up, temperature, proposal_sent, brief, phone, email,
    referral_source, referral_type, good_fit, notes";

/// `ContactStore` backed by the local SQLite `contacts` table
#[derive(Clone)]
pub struct SqliteContactStore {
    conn: AsyncDbConnection,
}

impl SqliteContactStore {
    pub fn new(conn: AsyncDbConnection) -> Self {
        Self { conn }
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_enum<T: FromStr>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        T::from_str(&s).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                format!("unexpected value {s:?}").into(),
            )
        })
    })
    .transpose()
}

fn contact_from_row(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        created_at: row.get(1)?,
        status: parse_enum::<ContactStatus>(row, 2)?.unwrap_or_default(),
        name: row.get(3)?,
        initial_touchpoint: row.get(4)?,
        last_touchpoint: row.get(5)?,
        next_follow_up: row.get(6)?,
        temperature: parse_enum(row, 7)?,
        proposal_sent: row.get(8)?,
        brief: row.get(9)?,
        phone: row.get(10)?,
        email: row.get(11)?,
        referral_source: row.get(12)?,
        referral_type: parse_enum(row, 13)?,
        good_fit: parse_enum(row, 14)?,
        notes: row.get(15)?,
    })
}

fn text<T: AsRef<str>>(value: Option<T>) -> Value {
    match value {
        Some(v) => Value::Text(v.as_ref().to_string()),
        None => Value::Null,
    }
}

fn change_value(change: &ContactChange) -> Value {
    match change {
        ContactChange::Name(v) => Value::Text(v.clone()),
        ContactChange::Status(v) => Value::Text(v.to_string()),
        ContactChange::ProposalSent(v) => Value::Integer(i64::from(*v)),
        ContactChange::Temperature(v) => text(v.as_ref()),
        ContactChange::ReferralType(v) => text(v.as_ref()),
        ContactChange::GoodFit(v) => text(v.as_ref()),
        ContactChange::InitialTouchpoint(v)
        | ContactChange::LastTouchpoint(v)
        | ContactChange::NextFollowUp(v)
        | ContactChange::Brief(v)
        | ContactChange::Phone(v)
        | ContactChange::Email(v)
        | ContactChange::ReferralSource(v)
        | ContactChange::Notes(v) => text(v.as_ref()),
    }
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn select_contacts(conn: &Connection, query: &ContactQuery) -> anyhow::Result<Vec<Contact>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(status) = query.status {
        clauses.push("status = ?");
        values.push(Value::Text(status.to_string()));
    }
    if let Some(temperature) = query.temperature {
        clauses.push("temperature = ?");
        values.push(Value::Text(temperature.to_string()));
    }
    if let Some(proposal_sent) = query.proposal_sent {
        clauses.push("proposal_sent = ?");
        values.push(Value::Integer(i64::from(proposal_sent)));
    }
    if let Some(referral_type) = query.referral_type {
        clauses.push("referral_type = ?");
        values.push(Value::Text(referral_type.to_string()));
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        clauses.push("unicode_lower(name) LIKE ? ESCAPE '\\'");
        values.push(Value::Text(like_pattern(&search.to_lowercase())));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts {where_clause}
         ORDER BY created_at DESC, rowid DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), contact_from_row)?;

    let mut contacts = Vec::new();
    for row in rows {
        contacts.push(row?);
    }
    Ok(contacts)
}

fn select_contact(conn: &Connection, id: &str) -> anyhow::Result<Option<Contact>> {
    let contact = conn
        .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"),
            [id],
            contact_from_row,
        )
        .optional()?;
    Ok(contact)
}

fn insert_row(conn: &Connection, contact: &NewContact) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO contacts
         (id, created_at, status, name, initial_touchpoint, last_touchpoint,
          next_follow_up, temperature, proposal_sent, brief, phone, email,
          referral_source, referral_type, good_fit, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            &id,
            now_timestamp(),
            contact.status.to_string(),
            &contact.name,
            contact.initial_touchpoint.as_ref(),
            contact.last_touchpoint.as_ref(),
            contact.next_follow_up.as_ref(),
            contact.temperature.map(|t| t.to_string()),
            contact.proposal_sent,
            contact.brief.as_ref(),
            contact.phone.as_ref(),
            contact.email.as_ref(),
            contact.referral_source.as_ref(),
            contact.referral_type.map(|r| r.to_string()),
            contact.good_fit.map(|g| g.to_string()),
            contact.notes.as_ref(),
        ],
    )?;

    Ok(id)
}

fn fetch_existing(conn: &Connection, id: &str) -> StoreResult<Contact> {
    select_contact(conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn list(&self, query: &ContactQuery) -> StoreResult<Vec<Contact>> {
        let conn = self.conn.lock().await?;
        Ok(select_contacts(&conn, query)?)
    }

    async fn get(&self, id: &str) -> StoreResult<Contact> {
        let conn = self.conn.lock().await?;
        fetch_existing(&conn, id)
    }

    async fn insert(&self, contact: NewContact) -> StoreResult<Contact> {
        let conn = self.conn.lock().await?;
        let id = insert_row(&conn, &contact)?;
        fetch_existing(&conn, &id)
    }

    async fn insert_many(&self, contacts: Vec<NewContact>) -> StoreResult<Vec<Contact>> {
        let mut conn = self.conn.lock().await?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut ids = Vec::with_capacity(contacts.len());
        for contact in &contacts {
            ids.push(insert_row(&tx, contact)?);
        }

        let mut inserted = Vec::with_capacity(ids.len());
        for id in &ids {
            inserted.push(fetch_existing(&tx, id)?);
        }

        tx.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(inserted)
    }

    async fn update(&self, id: &str, contact: NewContact) -> StoreResult<Contact> {
        let conn = self.conn.lock().await?;

        let updated = conn
            .execute(
                "UPDATE contacts SET
                    status = ?, name = ?, initial_touchpoint = ?, last_touchpoint = ?,
                    next_follow_up = ?, temperature = ?, proposal_sent = ?, brief = ?,
                    phone = ?, email = ?, referral_source = ?, referral_type = ?,
                    good_fit = ?, notes = ?
                 WHERE id = ?",
                params![
                    contact.status.to_string(),
                    &contact.name,
                    contact.initial_touchpoint.as_ref(),
                    contact.last_touchpoint.as_ref(),
                    contact.next_follow_up.as_ref(),
                    contact.temperature.map(|t| t.to_string()),
                    contact.proposal_sent,
                    contact.brief.as_ref(),
                    contact.phone.as_ref(),
                    contact.email.as_ref(),
                    contact.referral_source.as_ref(),
                    contact.referral_type.map(|r| r.to_string()),
                    contact.good_fit.map(|g| g.to_string()),
                    contact.notes.as_ref(),
                    id,
                ],
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        fetch_existing(&conn, id)
    }

    async fn update_field(&self, id: &str, change: ContactChange) -> StoreResult<Contact> {
        let conn = self.conn.lock().await?;

        // column() only ever yields fixed column names
        let sql = format!("UPDATE contacts SET {} = ? WHERE id = ?", change.column());
        let updated = conn
            .execute(&sql, params![change_value(&change), id])
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        fetch_existing(&conn, id)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await?;

        let deleted = conn
            .execute("DELETE FROM contacts WHERE id = ?", [id])
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use shared_types::{GoodFit, ReferralType, Temperature};

    fn open_store() -> (tempfile::TempDir, SqliteContactStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("contacts.db")).unwrap();
        (dir, db.contact_store())
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let (_dir, store) = open_store();

        let created = store.insert(NewContact::named("Ada")).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());
        assert_eq!(created.status, ContactStatus::Prospect);
        assert!(!created.proposal_sent);

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (_dir, store) = open_store();

        store.insert(NewContact::named("First")).await.unwrap();
        store.insert(NewContact::named("Second")).await.unwrap();
        store.insert(NewContact::named("Third")).await.unwrap();

        let names: Vec<String> = store
            .list(&ContactQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (_dir, store) = open_store();

        let mut john = NewContact::named("John Smith");
        john.temperature = Some(Temperature::Hot);
        john.proposal_sent = true;
        john.referral_type = Some(ReferralType::Bni);
        store.insert(john).await.unwrap();

        let mut amy = NewContact::named("Amy 100%");
        amy.status = ContactStatus::SignedOn;
        store.insert(amy).await.unwrap();

        let query = ContactQuery {
            search: Some("JOHN".to_string()),
            ..ContactQuery::default()
        };
        let found = store.list(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "John Smith");

        let query = ContactQuery {
            status: Some(ContactStatus::SignedOn),
            ..ContactQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap()[0].name, "Amy 100%");

        let query = ContactQuery {
            proposal_sent: Some(false),
            ..ContactQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap()[0].name, "Amy 100%");

        let query = ContactQuery {
            temperature: Some(Temperature::Hot),
            referral_type: Some(ReferralType::Bni),
            ..ContactQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap()[0].name, "John Smith");

        // `%` is matched literally
        let query = ContactQuery {
            search: Some("0%".to_string()),
            ..ContactQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 1);
        let query = ContactQuery {
            search: Some("%Smith".to_string()),
            ..ContactQuery::default()
        };
        assert!(store.list(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let (_dir, store) = open_store();
        store.insert(NewContact::named("Émile Zola")).await.unwrap();
        store.insert(NewContact::named("Zoë ÅSTRÖM")).await.unwrap();

        for search in ["émile", "ÉMILE", "ZOLA"] {
            let query = ContactQuery {
                search: Some(search.to_string()),
                ..ContactQuery::default()
            };
            let found = store.list(&query).await.unwrap();
            assert_eq!(found.len(), 1, "search {search:?}");
            assert_eq!(found[0].name, "Émile Zola");
        }

        let query = ContactQuery {
            search: Some("åström".to_string()),
            ..ContactQuery::default()
        };
        assert_eq!(store.list(&query).await.unwrap()[0].name, "Zoë ÅSTRÖM");
    }

    #[tokio::test]
    async fn test_insert_many_is_atomic() {
        let (_dir, store) = open_store();

        let inserted = store
            .insert_many(vec![NewContact::named("A"), NewContact::named("B")])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);

        // Blank name violates the CHECK constraint and rolls back the whole batch
        let result = store
            .insert_many(vec![NewContact::named("C"), NewContact::named("  ")])
            .await;
        assert!(matches!(result, Err(StoreError::Backend(_))));

        let all = store.list(&ContactQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_update_field() {
        let (_dir, store) = open_store();
        let created = store.insert(NewContact::named("Ada")).await.unwrap();

        let mut form = NewContact::named("Ada Lovelace");
        form.phone = Some("(555) 123-4567".to_string());
        form.good_fit = Some(GoodFit::Maybe);
        let saved = store.update(&created.id, form).await.unwrap();
        assert_eq!(saved.name, "Ada Lovelace");
        assert_eq!(saved.good_fit, Some(GoodFit::Maybe));
        assert_eq!(saved.created_at, created.created_at);

        let patched = store
            .update_field(&created.id, ContactChange::Temperature(Some(Temperature::Warm)))
            .await
            .unwrap();
        assert_eq!(patched.temperature, Some(Temperature::Warm));

        let patched = store
            .update_field(&created.id, ContactChange::ProposalSent(true))
            .await
            .unwrap();
        assert!(patched.proposal_sent);

        let cleared = store
            .update_field(&created.id, ContactChange::Phone(None))
            .await
            .unwrap();
        assert_eq!(cleared.phone, None);
        assert_eq!(cleared.temperature, Some(Temperature::Warm));
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let (_dir, store) = open_store();

        assert!(matches!(
            store.get("missing").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update("missing", NewContact::named("X")).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store
                .update_field("missing", ContactChange::Status(ContactStatus::Archived))
                .await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (_dir, store) = open_store();
        let created = store.insert(NewContact::named("Gone")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(store.list(&ContactQuery::default()).await.unwrap().is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jo"), "%jo%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
