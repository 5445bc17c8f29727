mod config;
mod history;
mod report;

use crate::state::Context;

/// Discord's hard limit is 2000; leave room for formatting.
const CHUNK_LIMIT: usize = 1990;

/// CustomerBrief - company intelligence reports
#[poise::command(
    slash_command,
    subcommands(
        "report::company",
        "report::mentions",
        "history::history",
        "history::view",
        "history::download",
        "history::share",
        "history::delete",
        "history::clear",
        "config::config"
    )
)]
pub async fn brief(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks.
/// Every chunk goes through ctx.say() so follow-ups use the interaction
/// webhook and need no Send Messages permission.
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_chunks(text, CHUNK_LIMIT) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Split at the last newline (else space) before `max` bytes, never inside a char.
fn split_chunks(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        if remaining.len() <= max {
            chunks.push(remaining);
            break;
        }
        let mut limit = max;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }
        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|i| i + 1)
            .unwrap_or(limit);
        // A single char wider than `max`: emit it whole.
        let split_at = if split_at == 0 {
            remaining.chars().next().map(char::len_utf8).unwrap_or(1)
        } else {
            split_at
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(split_chunks("hello", 10), vec!["hello"]);
        assert!(split_chunks("", 10).is_empty());
    }

    #[test]
    fn test_splits_on_newline_then_space() {
        assert_eq!(split_chunks("aaaa\nbbbb cccc", 8), vec!["aaaa\n", "bbbb ", "cccc"]);
    }

    #[test]
    fn test_hard_split_without_whitespace() {
        assert_eq!(split_chunks("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_respects_char_boundaries() {
        let chunks = split_chunks("éééé", 3);
        assert_eq!(chunks, vec!["é", "é", "é", "é"]);
        assert_eq!(chunks.concat(), "éééé");
    }
}
