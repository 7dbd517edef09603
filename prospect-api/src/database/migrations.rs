use rusqlite::Connection;
use tracing::info;

/// Create tables and indexes; safe to run on every start
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id VARCHAR PRIMARY KEY,
            created_at VARCHAR NOT NULL,
            status VARCHAR NOT NULL DEFAULT 'Prospect'
                CHECK (status IN ('Prospect', 'Signed On', 'Archived')),
            name VARCHAR NOT NULL CHECK (length(trim(name)) > 0),
            initial_touchpoint VARCHAR,
            last_touchpoint VARCHAR,
            next_follow_up VARCHAR,
            temperature VARCHAR
                CHECK (temperature IS NULL OR temperature IN ('Hot', 'Warm', 'Lukewarm', 'Cold')),
            proposal_sent BOOLEAN NOT NULL DEFAULT false,
            brief VARCHAR,
            phone VARCHAR,
            email VARCHAR,
            referral_source VARCHAR,
            referral_type VARCHAR
                CHECK (referral_type IS NULL OR referral_type IN ('Organic', 'BNI', 'Client', 'Family', 'Other')),
            good_fit VARCHAR
                CHECK (good_fit IS NULL OR good_fit IN ('Yes', 'No', 'Maybe')),
            notes VARCHAR
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_created_at
            ON contacts(created_at DESC)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_status
            ON contacts(status)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            key VARCHAR PRIMARY KEY,
            value VARCHAR NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    backfill_null_status(conn)?;

    Ok(())
}

/// Tables created before `status` was NOT NULL may still hold NULLs.
fn backfill_null_status(conn: &Connection) -> anyhow::Result<()> {
    let updated = conn.execute(
        "UPDATE contacts SET status = 'Prospect' WHERE status IS NULL",
        [],
    )?;

    if updated > 0 {
        info!("Backfilled status on {} contacts", updated);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('contacts', 'preferences')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_backfills_legacy_null_status() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE contacts (
                id VARCHAR PRIMARY KEY,
                created_at VARCHAR NOT NULL,
                status VARCHAR,
                name VARCHAR NOT NULL,
                initial_touchpoint VARCHAR,
                last_touchpoint VARCHAR,
                next_follow_up VARCHAR,
                temperature VARCHAR,
                proposal_sent BOOLEAN NOT NULL DEFAULT false,
                brief VARCHAR,
                phone VARCHAR,
                email VARCHAR,
                referral_source VARCHAR,
                referral_type VARCHAR,
                good_fit VARCHAR,
                notes VARCHAR
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO contacts (id, created_at, status, name) VALUES ('a', '2024-01-01', NULL, 'Legacy')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let status: String = conn
            .query_row("SELECT status FROM contacts WHERE id = 'a'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "Prospect");
    }

    #[test]
    fn test_rejects_values_outside_enums() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO contacts (id, created_at, name, temperature) VALUES ('x', '2024-01-01', 'X', 'Scorching')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO contacts (id, created_at, name) VALUES ('y', '2024-01-01', '   ')",
            [],
        );
        assert!(result.is_err());
    }
}
