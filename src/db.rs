use std::path::Path;

use rusqlite::Connection;

use crate::error::ExtractError;

/// External identifiers excluded from every run. Each entry shadows another
/// node carrying the same thesis.
const DUPLICATE_UUIDS: &[&str] = &[
    // Duplicate of a4c09901-eb02-4746-995d-343fb23111cd
    "50892e3d-aa3e-4722-b2a0-012accb0c52a",
];

pub fn connect(path: &Path) -> Result<Connection, ExtractError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Snapshot schema. The assembler only reads; this exists for snapshot
/// preparation and for tests that build an in-memory store.
pub fn init_schema(conn: &Connection) -> Result<(), ExtractError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS node (
            nid    INTEGER PRIMARY KEY,
            uuid   TEXT UNIQUE NOT NULL,
            type   TEXT NOT NULL,
            title  TEXT NOT NULL,
            status INTEGER NOT NULL CHECK(status IN (0, 1))
        );

        -- One row per attached value: the entity-attribute-value shape the
        -- legacy field_data_* tables flatten into. value2 carries the second
        -- column of two-part fields (contributor role/name, degree name/abbr).
        CREATE TABLE IF NOT EXISTS field_values (
            id        INTEGER PRIMARY KEY,
            entity_id INTEGER NOT NULL REFERENCES node(nid),
            field     TEXT NOT NULL,
            delta     INTEGER NOT NULL DEFAULT 0,
            value     TEXT NOT NULL,
            value2    TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_field_values_lookup
            ON field_values(entity_id, field, delta);

        CREATE TABLE IF NOT EXISTS file_refs (
            id        INTEGER PRIMARY KEY,
            entity_id INTEGER NOT NULL REFERENCES node(nid),
            field     TEXT NOT NULL,
            fid       INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_file_refs_lookup ON file_refs(entity_id, field);

        CREATE TABLE IF NOT EXISTS file_managed (
            fid INTEGER PRIMARY KEY,
            uri TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS filehash (
            fid INTEGER PRIMARY KEY,
            md5 TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS signature_agreements (
            id           INTEGER PRIMARY KEY,
            entity_id    INTEGER NOT NULL REFERENCES node(nid),
            agreement_id INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_agreements_entity
            ON signature_agreements(entity_id);
        ",
    )?;
    Ok(())
}

// ── Entities ──

#[derive(Debug, Clone)]
pub struct Etd {
    pub nid: i64,
    pub source_identifier: String,
    pub title: String,
    pub visibility: String,
}

pub fn fetch_etds(conn: &Connection) -> Result<Vec<Etd>, ExtractError> {
    let placeholders = vec!["?"; DUPLICATE_UUIDS.len()].join(", ");
    let sql = format!(
        "SELECT nid, uuid,
                title,
                CASE status WHEN 0 THEN 'restricted' WHEN 1 THEN 'open' END
         FROM node
         WHERE type = 'etd' AND uuid NOT IN ({})
         ORDER BY nid",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(DUPLICATE_UUIDS), |row| {
            Ok(Etd {
                nid: row.get(0)?,
                source_identifier: row.get(1)?,
                title: row.get(2)?,
                visibility: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Field values ──

#[derive(Debug, Clone)]
pub struct RawValue {
    pub delta: i64,
    pub value: String,
    pub value2: Option<String>,
}

/// All values attached to one entity for one field, delta order.
pub fn fetch_field_values(
    conn: &Connection,
    entity_id: i64,
    field: &str,
) -> Result<Vec<RawValue>, ExtractError> {
    let mut stmt = conn.prepare(
        "SELECT delta, value, value2 FROM field_values
         WHERE entity_id = ?1 AND field = ?2
         ORDER BY delta",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![entity_id, field], |row| {
            Ok(RawValue {
                delta: row.get(0)?,
                value: row.get(1)?,
                value2: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Attachments ──

#[derive(Debug, Clone)]
pub struct AttachmentRef {
    pub uri: String,
    pub md5: String,
}

pub fn fetch_attachments(
    conn: &Connection,
    entity_id: i64,
    field: &str,
) -> Result<Vec<AttachmentRef>, ExtractError> {
    let mut stmt = conn.prepare(
        "SELECT fm.uri, fh.md5
         FROM file_refs fr
         JOIN file_managed fm ON fm.fid = fr.fid
         JOIN filehash fh ON fh.fid = fr.fid
         WHERE fr.entity_id = ?1 AND fr.field = ?2
         ORDER BY fr.id",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![entity_id, field], |row| {
            Ok(AttachmentRef {
                uri: row.get(0)?,
                md5: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Agreements ──

pub fn fetch_agreement_ids(conn: &Connection, entity_id: i64) -> Result<Vec<i64>, ExtractError> {
    let mut stmt = conn.prepare(
        "SELECT agreement_id FROM signature_agreements
         WHERE entity_id = ?1
         ORDER BY id",
    )?;
    let rows = stmt
        .query_map([entity_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub open: usize,
    pub restricted: usize,
    pub field_values: usize,
    pub attachments: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats, ExtractError> {
    let total: usize =
        conn.query_row("SELECT COUNT(*) FROM node WHERE type = 'etd'", [], |r| r.get(0))?;
    let open: usize = conn.query_row(
        "SELECT COUNT(*) FROM node WHERE type = 'etd' AND status = 1",
        [],
        |r| r.get(0),
    )?;
    let field_values: usize =
        conn.query_row("SELECT COUNT(*) FROM field_values", [], |r| r.get(0))?;
    let attachments: usize = conn.query_row("SELECT COUNT(*) FROM file_refs", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        open,
        restricted: total - open,
        field_values,
        attachments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn etd_enumeration_skips_duplicates() {
        let conn = memory_store();
        conn.execute_batch(
            "INSERT INTO node (nid, uuid, type, title, status) VALUES
             (1, 'a4c09901-eb02-4746-995d-343fb23111cd', 'etd', 'Kept', 1),
             (2, '50892e3d-aa3e-4722-b2a0-012accb0c52a', 'etd', 'Duplicate', 1),
             (3, 'c0ffee00-0000-0000-0000-000000000001', 'page', 'Not a thesis', 1);",
        )
        .unwrap();
        let etds = fetch_etds(&conn).unwrap();
        assert_eq!(etds.len(), 1);
        assert_eq!(etds[0].title, "Kept");
        assert_eq!(etds[0].visibility, "open");
    }

    #[test]
    fn visibility_decodes_status_zero() {
        let conn = memory_store();
        conn.execute(
            "INSERT INTO node (nid, uuid, type, title, status)
             VALUES (1, 'u-1', 'etd', 'Embargoed', 0)",
            [],
        )
        .unwrap();
        let etds = fetch_etds(&conn).unwrap();
        assert_eq!(etds[0].visibility, "restricted");
    }

    #[test]
    fn field_values_come_back_in_delta_order() {
        let conn = memory_store();
        conn.execute_batch(
            "INSERT INTO node (nid, uuid, type, title, status)
             VALUES (1, 'u-1', 'etd', 'T', 1);
             INSERT INTO field_values (entity_id, field, delta, value) VALUES
             (1, 'subject', 2, 'Third'),
             (1, 'subject', 0, 'First'),
             (1, 'subject', 1, 'Second');",
        )
        .unwrap();
        let values = fetch_field_values(&conn, 1, "subject").unwrap();
        let flat: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(flat, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn attachment_join_pairs_uri_and_hash() {
        let conn = memory_store();
        conn.execute_batch(
            "INSERT INTO node (nid, uuid, type, title, status)
             VALUES (1, 'u-1', 'etd', 'T', 1);
             INSERT INTO file_managed (fid, uri) VALUES (7, 'private://thesis.pdf');
             INSERT INTO filehash (fid, md5) VALUES (7, 'abc123');
             INSERT INTO file_refs (entity_id, field, fid) VALUES (1, 'pdf', 7);",
        )
        .unwrap();
        let refs = fetch_attachments(&conn, 1, "pdf").unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].uri, "private://thesis.pdf");
        assert_eq!(refs[0].md5, "abc123");
        assert!(fetch_attachments(&conn, 1, "supplemental").unwrap().is_empty());
    }
}
