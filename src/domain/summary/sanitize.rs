//! Keeps LLM output to markdown prose.
//!
//! Models sometimes answer a "markdown only" prompt with a fenced JSON dump
//! or a bare object. Both are removed before the text is used.
//!
//! A bare literal is one that opens at the start of a line (after
//! indentation), closes at the end of a line, and parses as JSON. It may span
//! blank lines and may follow prose without a paragraph break.

use serde_json::Value;

/// Removes fenced code blocks and bare JSON literals, then trims.
///
/// Blocks are separated by blank lines and come back joined by exactly one
/// blank line. An unterminated fence drops everything after it.
pub fn sanitize_markdown(text: &str) -> String {
    let unfenced = strip_fenced_blocks(text);
    let prose = strip_bare_json(&unfenced);

    paragraph_blocks(&prose).join("\n\n").trim().to_string()
}

fn strip_fenced_blocks(text: &str) -> String {
    let mut open_fence: Option<&str> = None;
    let mut kept = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        let marker = ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m));

        match (open_fence, marker) {
            (None, Some(m)) => open_fence = Some(m),
            (Some(open), Some(m)) if open == m => open_fence = None,
            (Some(_), _) => {}
            (None, None) => kept.push(line),
        }
    }

    kept.join("\n")
}

fn paragraph_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

fn strip_bare_json(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut kept = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        match json_literal_lines(&lines[i..]) {
            Some(covered) => i += covered,
            None => {
                kept.push(lines[i]);
                i += 1;
            }
        }
    }

    kept.join("\n")
}

/// Number of lines taken by a JSON literal opening the first line, if one does.
///
/// Brackets are balanced outside string literals only. The closing bracket
/// must end its line, so `[label](link)` never qualifies.
fn json_literal_lines(lines: &[&str]) -> Option<usize> {
    let first = lines.first()?.trim_start();
    if !first.starts_with(['{', '[']) {
        return None;
    }

    let mut literal = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (n, line) in lines.iter().enumerate() {
        let line = if n == 0 { first } else { line };

        for (pos, c) in line.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            match c {
                '"' => in_string = true,
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth -= 1;
                    if depth == 0 {
                        let (head, tail) = line.split_at(pos + 1);
                        if !tail.trim().is_empty() {
                            return None;
                        }
                        literal.push_str(head);
                        return serde_json::from_str::<Value>(&literal)
                            .is_ok()
                            .then_some(n + 1);
                    }
                }
                _ => {}
            }
        }

        literal.push_str(line);
        literal.push('\n');
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_markdown_is_untouched() {
        let text = "## Overview\nThree bids received.\n\n## Risks\n- Schedule";
        assert_eq!(sanitize_markdown(text), text);
    }

    #[test]
    fn removes_fenced_blocks() {
        let text = "## Overview\nIntro.\n\n```json\n{\"a\": 1}\n```\n\nAfter.";
        assert_eq!(sanitize_markdown(text), "## Overview\nIntro.\n\nAfter.");
    }

    #[test]
    fn removes_tilde_fences() {
        let text = "Before.\n~~~\ncode\n~~~\nAfter.";
        assert_eq!(sanitize_markdown(text), "Before.\nAfter.");
    }

    #[test]
    fn unterminated_fence_drops_the_rest() {
        let text = "Kept.\n\n```\nleaked: true\nmore";
        assert_eq!(sanitize_markdown(text), "Kept.");
    }

    #[test]
    fn backtick_fence_is_not_closed_by_tildes() {
        let text = "A\n```\n~~~\nstill code\n```\nB";
        assert_eq!(sanitize_markdown(text), "A\nB");
    }

    #[test]
    fn removes_bare_json_paragraphs() {
        let text = "## Summary\nGood.\n\n{\"csi_divisions\": {}}\n\n[1, 2, 3]\n\nDone.";
        assert_eq!(sanitize_markdown(text), "## Summary\nGood.\n\nDone.");
    }

    #[test]
    fn keeps_bracketed_prose() {
        let text = "[See attached bid](https://example.com)\n\n{not json at all}";
        assert_eq!(sanitize_markdown(text), text);
    }

    #[test]
    fn collapses_extra_blank_lines_and_trims() {
        let text = "\n\n  First.\n\n\n\nSecond.\n\n";
        assert_eq!(sanitize_markdown(text), "  First.\n\nSecond.".trim());
    }

    #[test]
    fn removes_pretty_printed_json_spanning_blank_lines() {
        let text = "## Overview\nGood.\n\n{\n  \"csi_divisions\": {\"03\": 1},\n\n  \"total\": 5\n}";
        assert_eq!(sanitize_markdown(text), "## Overview\nGood.");
    }

    #[test]
    fn removes_json_following_prose_in_one_paragraph() {
        assert_eq!(sanitize_markdown("Here is the data:\n{\"total\": 5}"), "Here is the data:");
        assert_eq!(
            sanitize_markdown("Totals:\n  [\n    1,\n    2\n  ]\nThat is all."),
            "Totals:\nThat is all."
        );
    }

    #[test]
    fn brackets_inside_strings_do_not_end_the_literal() {
        let text = "Intro.\n{\"note\": \"closing } and \\\" quote\",\n \"n\": [1]}\nOutro.";
        assert_eq!(sanitize_markdown(text), "Intro.\nOutro.");
    }

    #[test]
    fn unclosed_brace_is_kept_as_prose() {
        let text = "{ draft\nstill writing";
        assert_eq!(sanitize_markdown(text), text);
    }

    #[test]
    fn json_only_reply_becomes_empty() {
        assert_eq!(sanitize_markdown("```json\n{}\n```"), "");
        assert_eq!(sanitize_markdown("{\"summary\": \"x\"}"), "");
    }
}
