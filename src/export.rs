use std::path::Path;

use crate::assemble::EtdRecord;
use crate::error::ExtractError;

/// Header contract with the target repository's bulk importer. Order is
/// load-bearing.
pub const HEADER: [&str; 22] = [
    "source_identifier",
    "model",
    "title",
    "creator",
    "identifier",
    "subject",
    "abstract",
    "publisher",
    "contributor",
    "date_created",
    "language",
    "internal_note",
    "degree",
    "degree_discipline",
    "degree_level",
    "resource_type",
    "parents",
    "files",
    "rights_notes",
    "visibility",
    "agreement",
    "access_right",
];

/// Serialize the assembled records. Called only after the whole entity loop
/// has succeeded, so a failed run never leaves a partial export behind.
pub fn write_csv(
    path: &Path,
    records: &[EtdRecord],
    parent_collection_id: &str,
) -> Result<(), ExtractError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(record.to_row(parent_collection_id))?;
    }
    writer.flush()?;
    Ok(())
}
