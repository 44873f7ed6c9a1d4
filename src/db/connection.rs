use std::path::Path;

use rusqlite::Connection;

use crate::errors::Error;

/// Key-value surface over the local SQLite database. Values are opaque
/// serialized blobs; callers decide what lives under each key.
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    pub fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;

        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

pub fn establish_connection(path: &Path) -> Result<KvStore, Error> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(KvStore { conn })
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<KvStore, Error> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(KvStore { conn })
}

fn create_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let kv = establish_test_connection().unwrap();
        assert_eq!(kv.get("transactions").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let kv = establish_test_connection().unwrap();
        kv.set("transactions", "[]").unwrap();
        assert_eq!(kv.get("transactions").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let kv = establish_test_connection().unwrap();
        kv.set("transactions", "[]").unwrap();
        kv.set("transactions", "[1]").unwrap();
        assert_eq!(kv.get("transactions").unwrap(), Some("[1]".to_string()));
    }
}
