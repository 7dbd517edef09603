use crate::database::AsyncDbConnection;
use anyhow::Result;
use shared_types::Preferences;

/// Each top-level preference is one row; the value column holds its JSON.
pub async fn get_preferences(conn: AsyncDbConnection) -> Result<Preferences> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut map = serde_json::Map::new();
    for row in rows {
        let (key, raw) = row?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                map.insert(key, value);
            }
            Err(e) => tracing::warn!("Ignoring unreadable preference {}: {}", key, e),
        }
    }

    Ok(serde_json::from_value(serde_json::Value::Object(map))?)
}

pub async fn save_preferences(conn: AsyncDbConnection, preferences: &Preferences) -> Result<()> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let serde_json::Value::Object(entries) = serde_json::to_value(preferences)? else {
        anyhow::bail!("Preferences did not serialize to an object");
    };

    let tx = conn.transaction()?;
    for (key, value) in entries {
        tx.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value.to_string(), now],
        )?;
    }
    tx.commit()?;

    Ok(())
}
