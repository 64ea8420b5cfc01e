//! Packing of retrieved snippets into a bounded prompt block

use super::RetrievedSnippet;

pub const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";

/// Concatenate snippets in rank order, separated by [`SNIPPET_SEPARATOR`],
/// without exceeding `char_limit` characters.
///
/// Snippets that fit are copied unchanged. The first snippet that would
/// overflow is cut to the remaining budget and packing stops there.
pub fn pack_snippets(snippets: &[RetrievedSnippet], char_limit: usize) -> String {
    let separator_len = SNIPPET_SEPARATOR.chars().count();
    let mut packed = String::new();
    let mut used = 0usize;

    for (index, snippet) in snippets.iter().enumerate() {
        let separator = if index == 0 { 0 } else { separator_len };
        let remaining = char_limit.saturating_sub(used);
        if remaining <= separator {
            break;
        }
        let available = remaining - separator;

        if index > 0 {
            packed.push_str(SNIPPET_SEPARATOR);
            used += separator;
        }

        let text = snippet.text.as_str();
        match text.char_indices().nth(available) {
            Some((cut, _)) => {
                packed.push_str(&text[..cut]);
                break;
            }
            None => {
                packed.push_str(text);
                used += text.chars().count();
            }
        }
    }

    packed
}
