//! Prompt text for per-chunk summaries and the merge pass.

/// Sections requested when the caller names none.
pub const DEFAULT_SECTIONS: [&str; 6] = [
    "overview",
    "bid_comparison",
    "cost_breakdown",
    "scope_gaps",
    "risks",
    "recommendations",
];

pub fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect()
}

/// `"bid_comparison"` -> `"Bid Comparison"`.
pub fn section_title(section: &str) -> String {
    section
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn section_list(sections: &[String]) -> String {
    sections
        .iter()
        .map(|s| format!("- ## {}", section_title(s)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn chunk_system_prompt(sections: &[String], budget_chars: usize, part: usize, parts: usize) -> String {
    format!(
        "You are a construction estimator reviewing subcontractor bids.\n\
         You are given part {part} of {parts} of a structured bid analysis as JSON.\n\
         Write a markdown summary of this part using only these sections, in order, \
         skipping any with nothing to report:\n{sections}\n\n\
         Rules:\n\
         - Respond with markdown only. Do not include JSON or code blocks.\n\
         - Stay under {budget_chars} characters.\n\
         - Quote amounts exactly as they appear in the data.",
        sections = section_list(sections),
    )
}

pub fn chunk_user_prompt(chunk_json: &str) -> String {
    format!("Bid analysis data:\n\n{}", chunk_json)
}

pub fn merge_system_prompt(sections: &[String], max_chars: usize) -> String {
    format!(
        "You are a construction estimator preparing one bid summary for a project owner.\n\
         You are given partial summaries, each covering different cost divisions of the same bids.\n\
         Merge them into one cohesive markdown document with these sections, in order:\n{sections}\n\n\
         Rules:\n\
         - Combine overlapping points instead of repeating them.\n\
         - Respond with markdown only. Do not include JSON or code blocks.\n\
         - Stay under {max_chars} characters.",
        sections = section_list(sections),
    )
}

pub fn merge_user_prompt(pieces: &[String]) -> String {
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| format!("### Partial summary {}\n\n{}", i + 1, piece))
        .collect::<Vec<_>>()
        .join("\n\n")
}
