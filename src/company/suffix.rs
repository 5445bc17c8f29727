use std::collections::BTreeSet;

use super::tokens::{tokenize, Token};

/// Legal-entity suffixes recognised when no override is configured.
pub const DEFAULT_SUFFIXES: &[&str] = &[
    "Inc",
    "Ltd",
    "LLC",
    "PLC",
    "GmbH",
    "Industries",
    "AG",
    "Corp",
    "Corporation",
    "Co",
    "Pvt",
    "Limited",
    "Group",
    "S.A.",
    "S.A.S.",
    "S.L.",
    "S.L.U.",
];

/// Ordered suffix vocabulary, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixList {
    suffixes: Vec<String>,
}

impl Default for SuffixList {
    fn default() -> Self {
        Self::from_list(DEFAULT_SUFFIXES)
    }
}

impl SuffixList {
    pub fn from_list<S: AsRef<str>>(suffixes: &[S]) -> Self {
        let mut seen = std::collections::HashSet::new();
        let suffixes = suffixes
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { suffixes }
    }

    /// `COMPANY_SUFFIXES` as a comma-separated list, or the defaults.
    pub fn from_env() -> Self {
        match dotenv::var("COMPANY_SUFFIXES") {
            Ok(raw) => {
                let parsed: Vec<&str> = raw.split(',').collect();
                let list = Self::from_list(&parsed);
                if list.is_empty() {
                    Self::default()
                } else {
                    list
                }
            }
            Err(_) => Self::default(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.suffixes.iter().any(|s| s == token)
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Capitalized phrases closed by a legal-entity suffix, e.g. `Acme Holdings Ltd`.
///
/// A run of adjacent capitalized tokens is scanned for suffix tokens; the
/// phrase ends at the last suffix in the run, so `Acme Group Ltd` yields one
/// mention rather than `Acme Group` and `Acme Group Ltd`. At least one name
/// token must precede the suffix.
pub fn suffix_phrases(text: &str, suffixes: &SuffixList) -> BTreeSet<String> {
    let tokens = tokenize(text);
    let mut found = BTreeSet::new();

    // (start byte, end byte) of the phrase being grown, plus the run start.
    let mut run_start: Option<usize> = None;
    let mut best: Option<(usize, usize)> = None;

    let mut flush = |best: &mut Option<(usize, usize)>| {
        if let Some((s, e)) = best.take() {
            found.insert(text[s..e].to_string());
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        let continues = token.adjacent && run_start.is_some();
        if !continues {
            flush(&mut best);
            run_start = None;
        }

        if is_suffix(token, suffixes) {
            if let Some(start) = run_start {
                if start < i {
                    best = Some((tokens[start].start, token.trimmed_end));
                }
            }
        }

        if token.is_capitalized() {
            run_start.get_or_insert(i);
        } else {
            flush(&mut best);
            run_start = None;
        }
    }
    flush(&mut best);

    found
}

fn is_suffix(token: &Token<'_>, suffixes: &SuffixList) -> bool {
    suffixes.contains(token.trimmed()) || suffixes.contains(token.text)
}
