//! Hand-maintained vocabulary data. The rule table is ordered: substring
//! fixes run first, whole-string overrides last so a byte-exact special case
//! wins over whatever the general fixes produced.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Literal substring replace over the whole string.
    Substring,
    /// Fires only on an exact whole-string match.
    WholeString,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub kind: RuleKind,
}

/// Controlled vocabulary: Library of Congress subject headings seen in the
/// legacy records, double-dash subdivision form.
pub const LC_TERMS: &[&str] = &[
    "Aeronautics",
    "Agriculture--Economic aspects",
    "Anthropology",
    "Artificial intelligence",
    "Biochemistry",
    "Business enterprises--Finance",
    "Canada--History",
    "Canada--Politics and government",
    "City planning",
    "Civil engineering",
    "Climatic changes",
    "Cognition",
    "Communication",
    "Computer science",
    "Dissertations, Academic",
    "DNA repair",
    "Economics",
    "Economics--Canada",
    "Education, Higher",
    "Electrical engineering",
    "Environmental protection",
    "Feminism",
    "Geographic information systems",
    "Great Britain--Politics and government",
    "HIV infections",
    "Human-computer interaction",
    "Indigenous peoples--Canada",
    "Information technology",
    "International relations",
    "Inuit",
    "Linguistics",
    "Mass media--Political aspects",
    "Mathematics",
    "Mechanical engineering",
    "Neurosciences",
    "Nursing",
    "Oral history",
    "Philosophy",
    "Physics",
    "Psychology",
    "Public administration",
    "Religion",
    "Sex role",
    "Sociology",
    "Sustainable development",
    "United States--Foreign relations",
    "Women's studies",
    "World politics",
    "World War--Canada",
    "World War, 1939-1945--Canada",
];

/// Legacy ProQuest subject terms (case-folded) to their LC equivalents. A
/// single ProQuest term may fan out to several headings.
///
/// Some keys ("communication", "international relations", ...) case-fold to
/// a vocabulary term. The mapping is consulted first regardless, so every
/// such entry must list the shadowed term among its targets.
pub const LEGACY_MAP: &[(&str, &[&str])] = &[
    ("artificial intelligence", &["Artificial intelligence"]),
    ("biochemistry", &["Biochemistry"]),
    ("canadian history", &["Canada--History"]),
    ("cognitive psychology", &["Cognition", "Psychology"]),
    ("communication", &["Communication", "Mass media--Political aspects"]),
    ("computer science", &["Computer science"]),
    ("gender studies", &["Sex role", "Women's studies"]),
    ("higher education", &["Education, Higher"]),
    ("information science", &["Information technology"]),
    ("international relations", &["International relations", "World politics"]),
    ("neurosciences", &["Neurosciences"]),
    ("public administration", &["Public administration"]),
    ("urban and regional planning", &["City planning"]),
    ("womens studies", &["Women's studies"]),
];

/// Ordered rewrite table applied after the generic pipeline steps. Later
/// rules may re-match text produced by earlier ones, so order is load-bearing.
pub const REWRITE_RULES: &[Rule] = &[
    // Typo corrections seen in the source data.
    Rule {
        pattern: "Enviromental",
        replacement: "Environmental",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "Goverment",
        replacement: "Government",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "Tecnology",
        replacement: "Technology",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "Womens",
        replacement: "Women's",
        kind: RuleKind::Substring,
    },
    // Fixed-phrase capitalization the chunk rule cannot produce.
    Rule {
        pattern: "United states",
        replacement: "United States",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "Great britain",
        replacement: "Great Britain",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "World war",
        replacement: "World War",
        kind: RuleKind::Substring,
    },
    // Acronym casing.
    Rule {
        pattern: "Dna",
        replacement: "DNA",
        kind: RuleKind::Substring,
    },
    Rule {
        pattern: "Hiv infections",
        replacement: "HIV infections",
        kind: RuleKind::Substring,
    },
    // Byte-exact special cases the general rules mis-normalize.
    Rule {
        pattern: "Ph.d. theses",
        replacement: "Dissertations, Academic",
        kind: RuleKind::WholeString,
    },
    Rule {
        pattern: "Eskimos",
        replacement: "Inuit",
        kind: RuleKind::WholeString,
    },
    Rule {
        pattern: "Native peoples--Canada",
        replacement: "Indigenous peoples--Canada",
        kind: RuleKind::WholeString,
    },
];
