//! Hard character cap for generated markdown.

/// Appended whenever text is cut.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated for length]";

const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_chars` characters plus the marker.
///
/// Preference order for the cut point:
/// 1. the last blank line, if it lies past 80% of the budget
/// 2. the last `". "`, if it lies past 80% of the budget (period kept)
/// 3. the last whitespace in the final 20% before `max_chars - 3`, or that
///    position itself, followed by `...`
///
/// Text within budget is returned unchanged.
pub fn hard_cap(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let window = &text[..byte_offset(text, max_chars)];
    let floor = byte_offset(text, max_chars * 4 / 5);

    if let Some(pos) = window.rfind("\n\n").filter(|&pos| pos >= floor) {
        return format!("{}{}", window[..pos].trim_end(), TRUNCATION_MARKER);
    }

    if let Some(pos) = window.rfind(". ").filter(|&pos| pos >= floor) {
        return format!("{}{}", &window[..=pos], TRUNCATION_MARKER);
    }

    let ellipsis = if max_chars >= ELLIPSIS.len() { ELLIPSIS } else { "" };
    let mut cut = &text[..byte_offset(text, max_chars - ellipsis.len())];
    if let Some(pos) = cut.rfind(char::is_whitespace).filter(|&pos| pos >= floor) {
        cut = &cut[..pos];
    }

    format!("{}{}{}", cut.trim_end(), ellipsis, TRUNCATION_MARKER)
}

/// Byte offset of the `chars`-th character, or the end of `text`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(capped: &str) -> &str {
        let body = capped.strip_suffix(TRUNCATION_MARKER).unwrap();
        body.strip_suffix(ELLIPSIS).unwrap_or(body)
    }

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(hard_cap("## Overview\nFine.", 100), "## Overview\nFine.");
        assert_eq!(hard_cap("exact", 5), "exact");
    }

    #[test]
    fn prefers_paragraph_boundary() {
        let text = format!("{}\n\n{}", "a".repeat(90), "b".repeat(50));

        let capped = hard_cap(&text, 100);

        assert_eq!(capped, format!("{}{}", "a".repeat(90), TRUNCATION_MARKER));
    }

    #[test]
    fn falls_back_to_sentence_boundary() {
        let text = format!("{}. {}", "a".repeat(85), "b".repeat(50));

        let capped = hard_cap(&text, 100);

        assert_eq!(capped, format!("{}.{}", "a".repeat(85), TRUNCATION_MARKER));
    }

    #[test]
    fn ignores_early_paragraph_boundary() {
        let text = format!("{}\n\n{}", "a".repeat(10), "word ".repeat(40));

        let capped = hard_cap(&text, 100);

        assert!(capped.ends_with(&format!("{}{}", ELLIPSIS, TRUNCATION_MARKER)));
        assert!(text.starts_with(body(&capped)));
        assert!(body(&capped).ends_with("word"));
    }

    #[test]
    fn hard_cut_when_no_boundary() {
        let text = "x".repeat(200);

        let capped = hard_cap(&text, 100);

        assert_eq!(capped, format!("{}...{}", "x".repeat(97), TRUNCATION_MARKER));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(50);

        let capped = hard_cap(&text, 20);

        assert_eq!(capped, format!("{}...{}", "é".repeat(17), TRUNCATION_MARKER));
    }

    proptest! {
        #[test]
        fn capped_text_is_bounded_prefix_with_marker(
            text in "[a-zé .\n]{0,400}",
            budget in 1usize..300,
        ) {
            prop_assume!(text.chars().count() > budget);

            let capped = hard_cap(&text, budget);

            prop_assert!(capped.ends_with(TRUNCATION_MARKER));
            prop_assert!(
                capped.chars().count() <= budget + TRUNCATION_MARKER.chars().count()
            );
            prop_assert!(text.starts_with(body(&capped)));
        }
    }
}
