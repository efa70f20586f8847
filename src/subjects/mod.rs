pub mod tables;
pub mod vocab;

use std::collections::BTreeSet;

use self::vocab::Vocabulary;

/// Outcome for one raw subject value. Every variant is surfaced to the audit
/// log; only `Rejected` also feeds the rejected-subjects log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Raw value hit the legacy ProQuest mapping (case-folded).
    MappedFromLegacy(Vec<String>),
    /// Raw value is already a vocabulary term, byte for byte.
    ExactMatch(String),
    /// Canonicalization pipeline produced a vocabulary term.
    Normalized(String),
    /// Nothing matched; carries the post-pipeline string.
    Rejected { normalized: String },
}

#[derive(Debug, Clone)]
pub struct Rejection {
    pub raw: String,
    pub normalized: String,
}

/// Deduplicated canonical terms for one entity, plus whatever could not be
/// mapped. An empty `terms` set is a data-quality signal, never an error.
/// `decisions` keeps the per-value outcomes in input order for the audit log.
#[derive(Debug, Default)]
pub struct NormalizedSubjects {
    pub terms: BTreeSet<String>,
    pub rejections: Vec<Rejection>,
    pub decisions: Vec<(String, Decision)>,
}

/// Classify one raw subject value. The legacy mapping is consulted first and
/// wins even when the raw string is itself a vocabulary term.
pub fn classify(vocab: &Vocabulary, raw: &str) -> Decision {
    if let Some(mapped) = vocab.lookup_legacy(raw) {
        return Decision::MappedFromLegacy(mapped.iter().map(|t| t.to_string()).collect());
    }
    if vocab.contains(raw) {
        return Decision::ExactMatch(raw.to_string());
    }
    let candidate = vocab.apply_rules(&canonicalize(raw));
    if vocab.contains(&candidate) {
        Decision::Normalized(candidate)
    } else {
        Decision::Rejected {
            normalized: candidate,
        }
    }
}

/// Normalize all raw values for one entity into a sorted, deduplicated term
/// set.
pub fn normalize(vocab: &Vocabulary, raw_values: &[String]) -> NormalizedSubjects {
    let mut out = NormalizedSubjects::default();
    for raw in raw_values {
        let decision = classify(vocab, raw);
        match &decision {
            Decision::MappedFromLegacy(terms) => out.terms.extend(terms.iter().cloned()),
            Decision::ExactMatch(term) | Decision::Normalized(term) => {
                out.terms.insert(term.clone());
            }
            Decision::Rejected { normalized } => out.rejections.push(Rejection {
                raw: raw.clone(),
                normalized: normalized.clone(),
            }),
        }
        out.decisions.push((raw.clone(), decision));
    }
    out
}

/// The fixed-order canonicalization pipeline, applied before the rule table.
pub fn canonicalize(raw: &str) -> String {
    // LC standard, no spaces around the double dash.
    let s = raw
        .replace(" -- ", "--")
        .replace("-- ", "--")
        .replace(" --", "--");
    // Drop trailing periods.
    let s = s.trim_end_matches('.');
    let s = capitalize_chunks(s);
    let s = capitalize_after(&s, |prev, _| prev == Some('('));
    capitalize_after(&s, |prev, prev2| prev == Some(' ') && prev2 == Some(','))
}

/// Uppercase only the first character of each `--`-separated chunk.
fn capitalize_chunks(s: &str) -> String {
    s.split("--")
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join("--")
}

fn capitalize_first(chunk: &str) -> String {
    let mut chars = chunk.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase every character whose two predecessors satisfy `trigger`.
fn capitalize_after(s: &str, trigger: impl Fn(Option<char>, Option<char>) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = None;
    let mut prev2 = None;
    for c in s.chars() {
        if trigger(prev, prev2) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev2 = prev;
        prev = Some(c);
    }
    out
}
