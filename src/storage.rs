// 🗄️ Persistence Collaborator
// SQLite key-value slot + JSON interchange
//
// The portfolio survives sessions as one pretty-printed JSON array of
// accounts stored under a single fixed key. Import replaces the whole
// collection; export reproduces the import shape byte-for-byte.

use crate::account::Account;
use crate::schema::validate_portfolio;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;

/// Fixed key the portfolio document lives under.
pub const STORAGE_KEY: &str = "portfolio_matrix_data";

// ============================================================================
// STORE
// ============================================================================

/// Open (or create) the backing store and ensure the key-value table
/// exists. Uses WAL mode like every other store in this toolchain.
pub fn open_store<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())
        .with_context(|| format!("Failed to open store: {:?}", path.as_ref()))?;

    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to initialize store schema")?;

    Ok(conn)
}

/// Load the persisted collection. A missing key is an empty portfolio,
/// not an error.
pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let document: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to read portfolio from store")?;

    match document {
        Some(json) => import_json(&json),
        None => Ok(Vec::new()),
    }
}

/// Persist the collection under the fixed key. Whole-document write;
/// there is no partial update.
pub fn save_accounts(conn: &Connection, accounts: &[Account]) -> Result<()> {
    let json = export_json(accounts)?;
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![STORAGE_KEY, json],
    )
    .context("Failed to write portfolio to store")?;
    Ok(())
}

// ============================================================================
// JSON INTERCHANGE
// ============================================================================

/// Serialize to the interchange format: a pretty-printed JSON array of
/// accounts.
pub fn export_json(accounts: &[Account]) -> Result<String> {
    serde_json::to_string_pretty(accounts).context("Failed to serialize portfolio")
}

/// Parse an interchange document.
///
/// The top-level value must be an array; elements are validated before
/// they are accepted so malformed data never reaches the scoring
/// engine. The parsed collection is meant to replace the current one.
pub fn import_json(json: &str) -> Result<Vec<Account>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse portfolio JSON")?;

    if !value.is_array() {
        bail!("Invalid format: expected an array of accounts");
    }

    let accounts: Vec<Account> =
        serde_json::from_value(value).context("Failed to parse account entries")?;

    if let Err(errors) = validate_portfolio(&accounts) {
        let summary = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        bail!("Rejected import: {}", summary);
    }

    Ok(accounts)
}

/// Read and parse an interchange file.
pub fn import_file<P: AsRef<Path>>(path: P) -> Result<Vec<Account>> {
    let json = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read portfolio file: {:?}", path.as_ref()))?;
    import_json(&json)
}

/// Write the collection to an interchange file.
pub fn export_file<P: AsRef<Path>>(path: P, accounts: &[Account]) -> Result<()> {
    let json = export_json(accounts)?;
    fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write portfolio file: {:?}", path.as_ref()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountInput;

    fn sample_accounts() -> Vec<Account> {
        vec![
            Account::new(AccountInput {
                name: "Acme Corp".to_string(),
                arr: 120000.0,
                logins_per_month: 42,
                session_duration: 1.5,
                notes: "Renewal due in Q3".to_string(),
                expansion_probability: 80.0,
                stakeholder_probability: 60.0,
            }),
            Account::new(AccountInput {
                name: "Globex".to_string(),
                arr: 45000.0,
                logins_per_month: 7,
                session_duration: 0.5,
                notes: String::new(),
                expansion_probability: 20.0,
                stakeholder_probability: 10.0,
            }),
        ]
    }

    #[test]
    fn test_export_import_round_trip_preserves_order() {
        let accounts = sample_accounts();

        let json = export_json(&accounts).unwrap();
        let restored = import_json(&json).unwrap();

        assert_eq!(restored, accounts);
        assert_eq!(restored[0].name, "Acme Corp");
        assert_eq!(restored[1].name, "Globex");
    }

    #[test]
    fn test_export_is_pretty_printed_array() {
        let json = export_json(&sample_accounts()).unwrap();
        assert!(json.starts_with("[\n"));
        assert!(json.contains("\"loginsPerMonth\""));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_import_rejects_non_array_top_level() {
        let err = import_json("{\"accounts\": []}").unwrap_err();
        assert!(err.to_string().contains("expected an array"));

        assert!(import_json("42").is_err());
        assert!(import_json("not json at all").is_err());
    }

    #[test]
    fn test_import_empty_array_is_valid() {
        let accounts = import_json("[]").unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_import_rejects_missing_fields() {
        let err = import_json("[{\"id\": \"x\", \"name\": \"Incomplete\"}]").unwrap_err();
        assert!(err.to_string().contains("Failed to parse account entries"));
    }

    #[test]
    fn test_import_rejects_out_of_range_probability() {
        let mut accounts = sample_accounts();
        accounts[1].expansion_probability = 400.0;
        let json = export_json(&accounts).unwrap();

        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("Rejected import"));
        assert!(err.to_string().contains("expansionProbability"));
    }

    #[test]
    fn test_store_round_trip() {
        let conn = open_store(":memory:").unwrap();

        // Fresh store holds an empty portfolio
        assert!(load_accounts(&conn).unwrap().is_empty());

        let accounts = sample_accounts();
        save_accounts(&conn, &accounts).unwrap();
        assert_eq!(load_accounts(&conn).unwrap(), accounts);
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let conn = open_store(":memory:").unwrap();

        save_accounts(&conn, &sample_accounts()).unwrap();
        let replacement = vec![sample_accounts().remove(0)];
        save_accounts(&conn, &replacement).unwrap();

        let loaded = load_accounts(&conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Acme Corp");
    }
}
