use std::collections::{HashMap, HashSet};

use crate::error::ExtractError;
use crate::subjects::tables::{Rule, RuleKind, LC_TERMS, LEGACY_MAP, REWRITE_RULES};

/// The static vocabulary tables, loaded once at startup and passed explicitly
/// to everything that normalizes subjects.
pub struct Vocabulary {
    terms: HashSet<&'static str>,
    legacy: HashMap<String, &'static [&'static str]>,
    rules: &'static [Rule],
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Self::new(LC_TERMS, LEGACY_MAP, REWRITE_RULES)
    }

    pub fn new(
        terms: &'static [&'static str],
        legacy: &'static [(&'static str, &'static [&'static str])],
        rules: &'static [Rule],
    ) -> Self {
        Vocabulary {
            terms: terms.iter().copied().collect(),
            legacy: legacy
                .iter()
                .map(|(k, v)| (k.to_lowercase(), *v))
                .collect(),
            rules,
        }
    }

    /// Table consistency check, run once at startup rather than per record:
    /// every legacy-mapped term and every whole-string replacement must
    /// itself be a vocabulary term.
    pub fn verify(&self) -> Result<(), ExtractError> {
        for (key, targets) in &self.legacy {
            for target in *targets {
                if !self.terms.contains(target) {
                    return Err(ExtractError::Vocab(format!(
                        "legacy mapping '{}' points at unknown term '{}'",
                        key, target
                    )));
                }
            }
        }
        for rule in self.rules {
            if rule.kind == RuleKind::WholeString && !self.terms.contains(rule.replacement) {
                return Err(ExtractError::Vocab(format!(
                    "override '{}' points at unknown term '{}'",
                    rule.pattern, rule.replacement
                )));
            }
        }
        Ok(())
    }

    /// Exact membership; case- and punctuation-sensitive.
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.terms.iter().copied()
    }

    /// Case-folded lookup in the legacy source-vocabulary mapping.
    pub fn lookup_legacy(&self, raw: &str) -> Option<&'static [&'static str]> {
        self.legacy.get(&raw.to_lowercase()).copied()
    }

    /// The single generic rule-application loop: each entry is a literal
    /// replace, in table order.
    pub fn apply_rules(&self, s: &str) -> String {
        let mut out = s.to_string();
        for rule in self.rules {
            match rule.kind {
                RuleKind::Substring => out = out.replace(rule.pattern, rule.replacement),
                RuleKind::WholeString => {
                    if out == rule.pattern {
                        out = rule.replacement.to_string();
                    }
                }
            }
        }
        out
    }
}
