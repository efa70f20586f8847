use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use tracing::debug;

use crate::db::{self, Etd};
use crate::error::{EntityRef, ExtractError};
use crate::fields::{self, Cardinality};
use crate::logs::SubjectLogs;
use crate::subjects::{self, vocab::Vocabulary};
use crate::transfer;

/// Delimiter for every multi-valued output field.
pub const SPLIT_PATTERN: &str = "|||";

pub const MODEL: &str = "Etd";
pub const RESOURCE_TYPE: &str = "Thesis";

/// Only DOIs minted under the university prefix are carried over.
const DOI_PREFIX: &str = "https://doi.org/10.22215";

const ACCESS_NOTE: &str = "This work is available on request. You can request a copy at \
     https://library.carleton.ca/forms/request-pdf-copy-thesis";

const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("English", "eng"),
    ("French", "fra"),
    ("Spanish", "spa"),
    ("German", "deu"),
];

const DEGREE_LEVELS: &[(&str, &str)] = &[("Master's", "1"), ("Doctoral", "2")];

/// Signature-agreement ids to their deposited copies in the target
/// repository.
const AGREEMENT_URLS: &[(i64, &str)] = &[
    (11, "https://digital.library.carleton.ca/concern/works/pc289j04q"),
    (12, "https://digital.library.carleton.ca/concern/works/j9602065z"),
    (13, "https://digital.library.carleton.ca/concern/works/tt44pm84n"),
    (14, "https://digital.library.carleton.ca/concern/works/nv9352841"),
    (15, "https://digital.library.carleton.ca/concern/works/zc77sq08x"),
    (16, "https://digital.library.carleton.ca/concern/works/ng451h485"),
    (17, "https://digital.library.carleton.ca/concern/works/4t64gn18r"),
];

/// Notes added by hand during metadata review, keyed by nid. Merged after
/// whatever the source record carries.
const MANUAL_NOTES: &[(i64, &[&str])] = &[
    (1489, &["Supplemental data DVD held in storage; not digitized."]),
    (2210, &["Title page corrected at author request, 2013-02-12."]),
];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static MULTISPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Filesystem context for one run.
pub struct RunPaths<'a> {
    pub storage_root: &'a Path,
    pub destination: &'a Path,
}

/// The flattened result for one entity. Built once by `assemble`, read-only
/// afterwards.
#[derive(Debug)]
pub struct EtdRecord {
    pub source_identifier: String,
    pub title: String,
    pub creator: String,
    pub identifier: String,
    pub subject: String,
    pub abstract_text: String,
    pub publisher: String,
    pub contributor: String,
    pub date_created: String,
    pub language: String,
    pub internal_note: String,
    pub degree: String,
    pub degree_discipline: String,
    pub degree_level: String,
    pub files: String,
    pub rights_notes: String,
    pub visibility: String,
    pub agreement: String,
    pub access_right: String,
}

impl EtdRecord {
    /// Column values in the sink's header order.
    pub fn to_row(&self, parent_collection_id: &str) -> Vec<String> {
        vec![
            self.source_identifier.clone(),
            MODEL.to_string(),
            self.title.clone(),
            self.creator.clone(),
            self.identifier.clone(),
            self.subject.clone(),
            self.abstract_text.clone(),
            self.publisher.clone(),
            self.contributor.clone(),
            self.date_created.clone(),
            self.language.clone(),
            self.internal_note.clone(),
            self.degree.clone(),
            self.degree_discipline.clone(),
            self.degree_level.clone(),
            RESOURCE_TYPE.to_string(),
            parent_collection_id.to_string(),
            self.files.clone(),
            self.rights_notes.clone(),
            self.visibility.clone(),
            self.agreement.clone(),
            self.access_right.clone(),
        ]
    }
}

/// Assemble one entity. Every helper returns a value and the record is
/// merged once at the end; any fatal error propagates and aborts the run.
pub fn assemble(
    conn: &Connection,
    vocab: &Vocabulary,
    logs: &mut SubjectLogs,
    etd: &Etd,
    paths: &RunPaths,
) -> Result<EtdRecord, ExtractError> {
    let entity = EntityRef {
        nid: etd.nid,
        title: etd.title.clone(),
    };

    let creator = resolve_creator(conn, &entity)?;
    let identifier = resolve_identifier(conn, &entity)?;
    let subject = resolve_subjects(conn, vocab, logs, etd, &entity, &identifier, &creator)?;
    let abstract_text = resolve_abstract(conn, &entity)?;
    let publisher = resolve_publisher(conn, &entity)?;
    let contributor = resolve_contributors(conn, &entity)?;
    let date_created = resolve_date(conn, &entity)?;
    let rights_notes = rights_statement(&date_created);
    let language = resolve_language(conn, &entity)?;
    let internal_note = resolve_internal_notes(conn, &entity)?;
    let degree = resolve_degree(conn, &entity)?;
    let degree_discipline = resolve_degree_discipline(conn, &entity)?;
    let degree_level = resolve_degree_level(conn, &entity)?;
    let (files, access_right) = resolve_files(conn, &entity, paths)?;
    let agreement = resolve_agreement(conn, &entity)?;

    Ok(EtdRecord {
        source_identifier: etd.source_identifier.clone(),
        title: etd.title.clone(),
        creator,
        identifier,
        subject,
        abstract_text,
        publisher,
        contributor,
        date_created,
        language,
        internal_note,
        degree,
        degree_discipline,
        degree_level,
        files,
        rights_notes,
        visibility: etd.visibility.clone(),
        agreement,
        access_right,
    })
}

/// The subjects-only audit pass: identifier and creator feed the audit log,
/// nothing else is resolved. Returns the joined subject field.
pub fn subjects_only(
    conn: &Connection,
    vocab: &Vocabulary,
    logs: &mut SubjectLogs,
    etd: &Etd,
) -> Result<String, ExtractError> {
    let entity = EntityRef {
        nid: etd.nid,
        title: etd.title.clone(),
    };
    let identifier = resolve_identifier(conn, &entity)?;
    let creator = resolve_creator(conn, &entity)?;
    resolve_subjects(conn, vocab, logs, etd, &entity, &identifier, &creator)
}

// ── Per-field resolution ──

fn resolve_creator(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "creator", Cardinality::ExactlyOne)?;
    Ok(v.map(|v| v.value).unwrap_or_default())
}

fn resolve_identifier(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let values = fields::resolve(conn, entity, "identifier", Cardinality::Any)?;
    Ok(values
        .iter()
        .find(|v| v.value.starts_with(DOI_PREFIX))
        .map(|v| format!("DOI: {}", v.value))
        .unwrap_or_default())
}

fn resolve_subjects(
    conn: &Connection,
    vocab: &Vocabulary,
    logs: &mut SubjectLogs,
    etd: &Etd,
    entity: &EntityRef,
    identifier: &str,
    creator: &str,
) -> Result<String, ExtractError> {
    let values = fields::resolve(conn, entity, "subject", Cardinality::Any)?;
    if values.is_empty() {
        logs.no_subjects(etd, identifier, creator)?;
        return Ok(String::new());
    }

    let raw: Vec<String> = values.into_iter().map(|v| v.value).collect();
    let normalized = subjects::normalize(vocab, &raw);
    for (raw_value, decision) in &normalized.decisions {
        logs.decision(etd, identifier, creator, decision, raw_value)?;
    }
    // Rejections degrade the field; the record proceeds.
    for r in &normalized.rejections {
        debug!(
            "nid {}: no LC match for {:?} (raw {:?})",
            entity.nid, r.normalized, r.raw
        );
    }
    Ok(normalized
        .terms
        .into_iter()
        .collect::<Vec<_>>()
        .join(SPLIT_PATTERN))
}

fn resolve_abstract(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "abstract", Cardinality::AtMostOne)?;
    Ok(v.map(|v| clean_abstract(&v.value)).unwrap_or_default())
}

/// The source stores abstracts as HTML fragments with hard line wrapping.
fn clean_abstract(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "");
    let text = text.replace('\r', "").replace('\n', " ");
    MULTISPACE_RE.replace_all(&text, " ").trim().to_string()
}

fn resolve_publisher(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "publisher", Cardinality::ExactlyOne)?;
    Ok(v.map(|v| v.value).unwrap_or_default())
}

fn resolve_contributors(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let values = fields::resolve(conn, entity, "contributor", Cardinality::Any)?;
    let formatted: Vec<String> = values
        .into_iter()
        .map(|v| {
            let role = v.value2.unwrap_or_default();
            if role.is_empty() {
                v.value
            } else {
                format!("{} ({})", v.value, uppercase_first(&role))
            }
        })
        .collect();
    Ok(formatted.join(SPLIT_PATTERN))
}

fn resolve_date(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "date", Cardinality::ExactlyOne)?;
    // Year only; source dates are YYYY-MM-DD.
    Ok(v.map(|v| v.value.chars().take(4).collect()).unwrap_or_default())
}

fn rights_statement(year: &str) -> String {
    format!(
        "Copyright © {} the author(s). Theses may be used for non-commercial \
         research, educational, or related academic purposes only. Such uses \
         include personal study, distribution to students, research and \
         scholarship. Theses may only be shared by linking to Carleton \
         University Digital Library and no part may be copied without proper \
         attribution to the author; no part may be used for commercial \
         purposes directly or indirectly via a for-profit platform; no \
         adaptation or derivative works are permitted without consent from \
         the copyright owner.",
        year
    )
}

fn resolve_language(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "language", Cardinality::ExactlyOne)?;
    let name = v.map(|v| v.value).unwrap_or_default();
    LANGUAGE_CODES
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, code)| code.to_string())
        .ok_or_else(|| ExtractError::UnrecognizedEnum {
            entity: entity.clone(),
            field: "language",
            value: name,
        })
}

fn resolve_internal_notes(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let mut notes: Vec<String> = fields::resolve(conn, entity, "internal_note", Cardinality::Any)?
        .into_iter()
        .map(|v| v.value)
        .collect();
    if let Some((_, manual)) = MANUAL_NOTES.iter().find(|(nid, _)| *nid == entity.nid) {
        notes.extend(manual.iter().map(|n| n.to_string()));
    }
    Ok(notes.join(SPLIT_PATTERN))
}

fn resolve_degree(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "degree", Cardinality::ExactlyOne)?;
    Ok(v.map(|v| {
        let abbr = v.value2.unwrap_or_default();
        format!("{} ({})", v.value, abbr)
    })
    .unwrap_or_default())
}

fn resolve_degree_discipline(
    conn: &Connection,
    entity: &EntityRef,
) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "degree_discipline", Cardinality::AtMostOne)?;
    Ok(v.map(|v| v.value).unwrap_or_default())
}

fn resolve_degree_level(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let v = fields::resolve_single(conn, entity, "degree_level", Cardinality::ExactlyOne)?;
    let level = v.map(|v| v.value).unwrap_or_default();
    DEGREE_LEVELS
        .iter()
        .find(|(label, _)| *label == level)
        .map(|(_, code)| code.to_string())
        .ok_or_else(|| ExtractError::UnrecognizedEnum {
            entity: entity.clone(),
            field: "degree_level",
            value: level,
        })
}

/// PDF plus optional supplemental attachment. A record without a PDF gets
/// the availability note instead.
fn resolve_files(
    conn: &Connection,
    entity: &EntityRef,
    paths: &RunPaths,
) -> Result<(String, String), ExtractError> {
    let pdfs = db::fetch_attachments(conn, entity.nid, "pdf")?;
    if pdfs.len() > 1 {
        return Err(ExtractError::Cardinality {
            entity: entity.clone(),
            field: "pdf",
            expected: "at most one",
            found: pdfs.len(),
        });
    }
    let (mut files, access_right) = match pdfs.first() {
        Some(a) => (
            transfer::transfer(paths.storage_root, &a.uri, paths.destination, &a.md5)?,
            String::new(),
        ),
        None => (String::new(), ACCESS_NOTE.to_string()),
    };

    let supplemental = db::fetch_attachments(conn, entity.nid, "supplemental")?;
    if supplemental.len() > 1 {
        return Err(ExtractError::Cardinality {
            entity: entity.clone(),
            field: "supplemental",
            expected: "at most one",
            found: supplemental.len(),
        });
    }
    if let Some(a) = supplemental.first() {
        let name = transfer::transfer(paths.storage_root, &a.uri, paths.destination, &a.md5)?;
        if files.is_empty() {
            files = name;
        } else {
            files = format!("{}{}{}", files, SPLIT_PATTERN, name);
        }
    }
    Ok((files, access_right))
}

fn resolve_agreement(conn: &Connection, entity: &EntityRef) -> Result<String, ExtractError> {
    let ids = db::fetch_agreement_ids(conn, entity.nid)?;
    let mut urls = Vec::with_capacity(ids.len());
    for id in ids {
        let url = AGREEMENT_URLS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, url)| url.to_string())
            .ok_or_else(|| ExtractError::UnrecognizedEnum {
                entity: entity.clone(),
                field: "agreement",
                value: id.to_string(),
            })?;
        urls.push(url);
    }
    Ok(urls.join(SPLIT_PATTERN))
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md5::{Digest, Md5};
    use std::fs;

    struct Fixture {
        conn: Connection,
        storage: tempfile::TempDir,
        destination: tempfile::TempDir,
        logs_dir: tempfile::TempDir,
    }

    impl Fixture {
        fn paths(&self) -> RunPaths<'_> {
            RunPaths {
                storage_root: self.storage.path(),
                destination: self.destination.path(),
            }
        }

        fn logs(&self) -> SubjectLogs {
            SubjectLogs::create(
                &self.logs_dir.path().join("audit.csv"),
                &self.logs_dir.path().join("rejected.log"),
            )
            .unwrap()
        }

        fn add_value(&self, field: &str, delta: i64, value: &str, value2: Option<&str>) {
            self.conn
                .execute(
                    "INSERT INTO field_values (entity_id, field, delta, value, value2)
                     VALUES (1, ?1, ?2, ?3, ?4)",
                    rusqlite::params![field, delta, value, value2],
                )
                .unwrap();
        }

        fn add_file(&self, fid: i64, field: &str, uri: &str, bytes: &[u8]) -> String {
            let rel = uri.strip_prefix("private://").unwrap();
            let dir = self.storage.path().join("sites/default/files/private");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(rel), bytes).unwrap();
            let mut hasher = Md5::new();
            hasher.update(bytes);
            let md5 = format!("{:x}", hasher.finalize());
            self.conn
                .execute(
                    "INSERT INTO file_managed (fid, uri) VALUES (?1, ?2)",
                    rusqlite::params![fid, uri],
                )
                .unwrap();
            self.conn
                .execute(
                    "INSERT INTO filehash (fid, md5) VALUES (?1, ?2)",
                    rusqlite::params![fid, md5],
                )
                .unwrap();
            self.conn
                .execute(
                    "INSERT INTO file_refs (entity_id, field, fid) VALUES (1, ?1, ?2)",
                    rusqlite::params![field, fid],
                )
                .unwrap();
            md5
        }
    }

    fn fixture() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO node (nid, uuid, type, title, status)
             VALUES (1, 'e4b1c0aa-0001-4000-8000-000000000001', 'etd', 'A Study of Things', 1)",
            [],
        )
        .unwrap();
        let f = Fixture {
            conn,
            storage: tempfile::tempdir().unwrap(),
            destination: tempfile::tempdir().unwrap(),
            logs_dir: tempfile::tempdir().unwrap(),
        };
        // Minimum fields every record must carry.
        f.add_value("creator", 0, "Author, Ann", None);
        f.add_value("publisher", 0, "Carleton University", None);
        f.add_value("date", 0, "2019-06-10", None);
        f.add_value("language", 0, "English", None);
        f.add_value("degree", 0, "Master of Arts", Some("M.A."));
        f.add_value("degree_level", 0, "Master's", None);
        f
    }

    fn etd() -> Etd {
        Etd {
            nid: 1,
            source_identifier: "e4b1c0aa-0001-4000-8000-000000000001".to_string(),
            title: "A Study of Things".to_string(),
            visibility: "open".to_string(),
        }
    }

    #[test]
    fn end_to_end_record() {
        let f = fixture();
        f.add_value("subject", 0, "World war -- Canada", None);
        f.add_file(10, "pdf", "private://study.pdf", b"%PDF-1.4 body");
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();

        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(record.subject, "World War--Canada");
        assert_eq!(record.files, "study.pdf");
        assert_eq!(record.access_right, "");
        assert_eq!(record.creator, "Author, Ann");
        assert_eq!(record.date_created, "2019");
        assert_eq!(record.language, "eng");
        assert_eq!(record.degree, "Master of Arts (M.A.)");
        assert_eq!(record.degree_level, "1");
        assert!(record.rights_notes.starts_with("Copyright © 2019"));
        assert!(f.destination.path().join("study.pdf").exists());
    }

    #[test]
    fn row_matches_header_contract() {
        let f = fixture();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        let row = record.to_row("col-123");
        assert_eq!(row.len(), crate::export::HEADER.len());
        assert_eq!(row[1], "Etd");
        assert_eq!(row[15], "Thesis");
        assert_eq!(row[16], "col-123");
    }

    #[test]
    fn two_creators_abort() {
        let f = fixture();
        f.add_value("creator", 1, "Author, Bob", None);
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let err = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap_err();
        assert!(
            matches!(err, ExtractError::Cardinality { field: "creator", found: 2, .. }),
            "got {:?}",
            err
        );
    }

    #[test]
    fn unknown_language_aborts() {
        let f = fixture();
        f.conn
            .execute(
                "UPDATE field_values SET value = 'Klingon' WHERE field = 'language'",
                [],
            )
            .unwrap();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let err = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnrecognizedEnum { field: "language", .. }
        ));
    }

    #[test]
    fn unknown_degree_level_aborts() {
        let f = fixture();
        f.conn
            .execute(
                "UPDATE field_values SET value = 'Bachelor''s' WHERE field = 'degree_level'",
                [],
            )
            .unwrap();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let err = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnrecognizedEnum { field: "degree_level", .. }
        ));
    }

    #[test]
    fn missing_pdf_gets_access_note() {
        let f = fixture();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(record.files, "");
        assert!(record.access_right.contains("available on request"));
        // No subjects either: the field degrades, the record survives.
        assert_eq!(record.subject, "");
    }

    #[test]
    fn supplemental_appends_with_delimiter() {
        let f = fixture();
        f.add_file(10, "pdf", "private://study.pdf", b"%PDF-1.4 body");
        f.add_file(11, "supplemental", "private://data.zip", b"PK data");
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(record.files, "study.pdf|||data.zip");
    }

    #[test]
    fn doi_identifier_selected_from_many() {
        let f = fixture();
        f.add_value("identifier", 0, "https://example.org/handle/1", None);
        f.add_value("identifier", 1, "https://doi.org/10.22215/etd/2019-1", None);
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(record.identifier, "DOI: https://doi.org/10.22215/etd/2019-1");
    }

    #[test]
    fn contributors_format_with_role() {
        let f = fixture();
        f.add_value("contributor", 0, "Supervisor, Sam", Some("thesis advisor"));
        f.add_value("contributor", 1, "Examiner, Eve", None);
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(
            record.contributor,
            "Supervisor, Sam (Thesis advisor)|||Examiner, Eve"
        );
    }

    #[test]
    fn abstract_html_is_stripped() {
        let f = fixture();
        f.add_value(
            "abstract",
            0,
            "<p>This thesis\r\nexamines  <em>things</em>.</p>",
            None,
        );
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(record.abstract_text, "This thesis examines things.");
    }

    #[test]
    fn manual_notes_merge_after_source_notes() {
        let f = fixture();
        // nid 1 has no manual note; repoint the node at one that does.
        // Defer foreign-key checks so the node and its field values can be
        // renumbered together.
        f.conn
            .execute_batch(
                "BEGIN;
                 PRAGMA defer_foreign_keys = ON;
                 UPDATE node SET nid = 1489 WHERE nid = 1;
                 UPDATE field_values SET entity_id = 1489;
                 COMMIT;",
            )
            .unwrap();
        f.conn
            .execute(
                "INSERT INTO field_values (entity_id, field, delta, value)
                 VALUES (1489, 'internal_note', 0, 'Source note')",
                [],
            )
            .unwrap();
        let mut etd = etd();
        etd.nid = 1489;
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd, &f.paths()).unwrap();
        assert_eq!(
            record.internal_note,
            "Source note|||Supplemental data DVD held in storage; not digitized."
        );
    }

    #[test]
    fn unknown_agreement_id_aborts() {
        let f = fixture();
        f.conn
            .execute(
                "INSERT INTO signature_agreements (entity_id, agreement_id) VALUES (1, 99)",
                [],
            )
            .unwrap();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let err = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnrecognizedEnum { field: "agreement", .. }
        ));
    }

    #[test]
    fn agreement_ids_map_to_urls() {
        let f = fixture();
        f.conn
            .execute(
                "INSERT INTO signature_agreements (entity_id, agreement_id) VALUES (1, 11), (1, 13)",
                [],
            )
            .unwrap();
        let vocab = Vocabulary::builtin();
        let mut logs = f.logs();
        let record = assemble(&f.conn, &vocab, &mut logs, &etd(), &f.paths()).unwrap();
        assert_eq!(
            record.agreement,
            "https://digital.library.carleton.ca/concern/works/pc289j04q|||\
             https://digital.library.carleton.ca/concern/works/tt44pm84n"
        );
    }
}
