use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::db::Etd;
use crate::error::ExtractError;
use crate::subjects::Decision;

/// Base URL for source-record links in the audit log.
const SOURCE_LINK_BASE: &str = "https://curve.carleton.ca/node";

/// The two append-only run logs: a CSV audit trail of every subject-mapping
/// decision, and a plain rejected-subjects file for the manual review pass.
pub struct SubjectLogs {
    audit: csv::Writer<File>,
    rejected: BufWriter<File>,
}

impl SubjectLogs {
    pub fn create(audit_path: &Path, rejected_path: &Path) -> Result<Self, ExtractError> {
        let mut audit = csv::Writer::from_path(audit_path)?;
        audit.write_record(["title", "link", "doi", "creator", "action", "subject"])?;
        let rejected = BufWriter::new(File::create(rejected_path)?);
        Ok(SubjectLogs { audit, rejected })
    }

    /// One audit row per raw subject value.
    pub fn decision(
        &mut self,
        etd: &Etd,
        doi: &str,
        creator: &str,
        decision: &Decision,
        raw: &str,
    ) -> Result<(), ExtractError> {
        let action = match decision {
            Decision::MappedFromLegacy(terms) => {
                format!("Mapped from ProQuest to LC {}", terms.join("|"))
            }
            Decision::ExactMatch(_) => "Exact LC match found".to_string(),
            Decision::Normalized(term) => format!("LC match '{}' found", term),
            Decision::Rejected { .. } => "No LC match".to_string(),
        };
        self.audit_row(etd, doi, creator, &action, raw)?;
        if let Decision::Rejected { normalized } = decision {
            writeln!(self.rejected, "{}\t(raw: {})", normalized, raw)?;
        }
        Ok(())
    }

    /// Records with no subject values at all get their own audit row.
    pub fn no_subjects(&mut self, etd: &Etd, doi: &str, creator: &str) -> Result<(), ExtractError> {
        self.audit_row(etd, doi, creator, "Source record has no subjects", "")
    }

    fn audit_row(
        &mut self,
        etd: &Etd,
        doi: &str,
        creator: &str,
        action: &str,
        raw: &str,
    ) -> Result<(), ExtractError> {
        self.audit.write_record([
            etd.title.as_str(),
            &format!("{}/{}", SOURCE_LINK_BASE, etd.nid),
            doi,
            creator,
            action,
            raw,
        ])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ExtractError> {
        self.audit.flush()?;
        self.rejected.flush()?;
        Ok(())
    }
}
