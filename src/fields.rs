use rusqlite::Connection;

use crate::db::{self, RawValue};
use crate::error::{EntityRef, ExtractError};

/// Declared value count for one metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    AtMostOne,
    Any,
}

impl Cardinality {
    fn label(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "exactly one",
            Cardinality::AtMostOne => "at most one",
            Cardinality::Any => "any",
        }
    }
}

/// Fetch all values for `field` on one entity and enforce the declared
/// cardinality. Values come back delta-ordered with surrounding whitespace
/// trimmed on both columns. Read-only; no other side effects.
pub fn resolve(
    conn: &Connection,
    entity: &EntityRef,
    field: &'static str,
    cardinality: Cardinality,
) -> Result<Vec<RawValue>, ExtractError> {
    let mut values = db::fetch_field_values(conn, entity.nid, field)?;

    let ok = match cardinality {
        Cardinality::ExactlyOne => values.len() == 1,
        Cardinality::AtMostOne => values.len() <= 1,
        Cardinality::Any => true,
    };
    if !ok {
        return Err(ExtractError::Cardinality {
            entity: entity.clone(),
            field,
            expected: cardinality.label(),
            found: values.len(),
        });
    }

    for v in &mut values {
        v.value = v.value.trim().to_string();
        if let Some(second) = &v.value2 {
            v.value2 = Some(second.trim().to_string());
        }
    }
    Ok(values)
}

/// Convenience for the common single-value case: the one trimmed value, or
/// `None` under `AtMostOne` when the field is absent.
pub fn resolve_single(
    conn: &Connection,
    entity: &EntityRef,
    field: &'static str,
    cardinality: Cardinality,
) -> Result<Option<RawValue>, ExtractError> {
    Ok(resolve(conn, entity, field, cardinality)?.into_iter().next())
}
