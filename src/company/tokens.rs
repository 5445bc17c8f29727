use std::sync::LazyLock;

use regex::Regex;

/// Letters, digits and the punctuation that shows up inside company names.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}&.'\-]+").expect("token regex is valid"));

/// A word-ish token with byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    /// End of the token once trailing sentence punctuation is dropped.
    pub trimmed_end: usize,
    /// Only whitespace separates this token from the previous one, and the
    /// previous token did not end in trimmed punctuation.
    pub adjacent: bool,
}

impl<'a> Token<'a> {
    /// Token text without trailing punctuation (`Tesla.` -> `Tesla`, `S.A.` stays).
    pub fn trimmed(&self) -> &'a str {
        &self.text[..self.trimmed_end - self.start]
    }

    /// Starts with an uppercase letter and holds only letters and `& . ' -`.
    pub fn is_capitalized(&self) -> bool {
        let mut chars = self.text.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_uppercase() && chars.all(is_name_char)
    }

    fn ends_clause(&self) -> bool {
        self.start + self.text.len() != self.trimmed_end
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '&' | '.' | '\'' | '-')
}

/// Length of `token` after dropping trailing `' - &`, and a trailing `.` when
/// it is the only dot (a full stop rather than an abbreviation).
fn trimmed_len(token: &str) -> usize {
    let mut s = token.trim_end_matches(['\'', '-', '&']);
    if s.ends_with('.') {
        let body = s.trim_end_matches('.');
        if !body.contains('.') {
            s = body;
        }
    }
    s.len()
}

/// Split text into tokens, tracking which ones may join into a phrase.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut prev_end = 0usize;

    for m in TOKEN_RE.find_iter(text) {
        let adjacent = match tokens.last() {
            Some(prev) => {
                !prev.ends_clause() && text[prev_end..m.start()].chars().all(char::is_whitespace)
            }
            None => false,
        };
        tokens.push(Token {
            text: m.as_str(),
            start: m.start(),
            trimmed_end: m.start() + trimmed_len(m.as_str()),
            adjacent,
        });
        prev_end = m.end();
    }

    tokens
}

/// Maximal runs of adjacent capitalized tokens, as index ranges into `tokens`.
pub fn capitalized_runs(tokens: &[Token<'_>]) -> Vec<std::ops::Range<usize>> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        let usable = token.is_capitalized() && token.trimmed_end > token.start;
        match (start, usable) {
            (Some(s), true) if !token.adjacent => {
                runs.push(s..i);
                start = Some(i);
            }
            (Some(_), true) => {}
            (None, true) => start = Some(i),
            (Some(s), false) => {
                runs.push(s..i);
                start = None;
            }
            (None, false) => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..tokens.len());
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.trimmed()).collect()
    }

    #[test]
    fn test_tokenize_trims_full_stop() {
        let tokens = tokenize("Tesla. Ford Inc. Acme S.A. done");
        assert_eq!(texts(&tokens), vec!["Tesla", "Ford", "Inc", "Acme", "S.A.", "done"]);
        assert!(!tokens[1].adjacent, "full stop breaks adjacency");
        assert!(tokens[2].adjacent);
    }

    #[test]
    fn test_punctuation_breaks_adjacency() {
        let tokens = tokenize("Apple, Google");
        assert_eq!(tokens.len(), 2);
        assert!(!tokens[1].adjacent);
    }

    #[test]
    fn test_capitalized_requires_letters() {
        let tokens = tokenize("3M Ford o'Neil O'Neil");
        let caps: Vec<bool> = tokens.iter().map(|t| t.is_capitalized()).collect();
        assert_eq!(caps, vec![false, true, false, true]);
    }

    #[test]
    fn test_runs_split_on_lowercase_and_breaks() {
        let tokens = tokenize("Compare Tesla Inc and Ford Motor Company. Nothing");
        let runs = capitalized_runs(&tokens);
        assert_eq!(runs, vec![0..3, 4..7, 7..8]);
    }

    #[test]
    fn test_unicode_names() {
        let tokens = tokenize("Société Générale");
        assert_eq!(capitalized_runs(&tokens), vec![0..2]);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }
}
