use std::collections::BTreeSet;

use super::tokens::{capitalized_runs, tokenize};

/// Longest phrase the capitalized recognizer emits, in tokens.
pub const MAX_PHRASE_TOKENS: usize = 4;

/// Every run of capitalized tokens, chunked left to right into phrases of at
/// most four tokens. Over-matches on purpose: sentence-initial words and
/// proper nouns that are not companies all come back.
pub fn capitalized_phrases(text: &str) -> BTreeSet<String> {
    let tokens = tokenize(text);
    let mut found = BTreeSet::new();

    for run in capitalized_runs(&tokens) {
        let run = &tokens[run];
        for chunk in run.chunks(MAX_PHRASE_TOKENS) {
            let (Some(first), Some(last)) = (chunk.first(), chunk.last()) else {
                continue;
            };
            found.insert(text[first.start..last.trimmed_end].to_string());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(text: &str) -> Vec<String> {
        capitalized_phrases(text).into_iter().collect()
    }

    #[test]
    fn test_lowercase_text_has_no_phrases() {
        assert!(phrases("the quick brown fox").is_empty());
    }

    #[test]
    fn test_single_word() {
        assert_eq!(phrases("Tesla"), vec!["Tesla"]);
        assert_eq!(phrases("tell me about Tesla."), vec!["Tesla"]);
    }

    #[test]
    fn test_multiple_runs() {
        assert_eq!(
            phrases("Compare Tesla Inc and Ford Motor Company"),
            vec!["Compare Tesla Inc", "Ford Motor Company"]
        );
    }

    #[test]
    fn test_long_run_is_chunked() {
        assert_eq!(
            phrases("Alpha Beta Gamma Delta Epsilon Zeta"),
            vec!["Alpha Beta Gamma Delta", "Epsilon Zeta"]
        );
    }

    #[test]
    fn test_name_punctuation_allowed() {
        assert_eq!(phrases("what about AT&T and McDonald's"), vec!["AT&T", "McDonald's"]);
        // A bare `&` does not start with a capital, so it splits the run.
        assert_eq!(phrases("Procter & Gamble"), vec!["Gamble", "Procter"]);
    }

    #[test]
    fn test_digits_break_phrases() {
        assert_eq!(phrases("3M Company"), vec!["Company"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(phrases("Tesla, Tesla, Tesla"), vec!["Tesla"]);
    }
}
