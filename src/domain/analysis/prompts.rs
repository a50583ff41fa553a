//! Prompt text for structured bid extraction.

pub const EXTRACTION_SYSTEM_PROMPT: &str = "You extract structured cost data from construction bid documents.\n\
Respond with a single JSON object and nothing else. Required shape:\n\
{\n\
  \"contractor\": string,\n\
  \"project\": string | null,\n\
  \"total\": number | null,\n\
  \"csi_divisions\": {\n\
    \"<two-digit CSI code> - <division name>\": {\n\
      \"subtotal\": number | null,\n\
      \"items\": [{\"description\": string, \"amount\": number | null}],\n\
      \"notes\": string | null\n\
    }\n\
  },\n\
  \"exclusions\": [string],\n\
  \"inclusions\": [string],\n\
  \"alternates\": [{\"description\": string, \"amount\": number | null}]\n\
}\n\
Use null for anything the document does not state. Keep divisions in the order they appear.";

pub fn extraction_user_prompt(file_name: Option<&str>, document_text: &str) -> String {
    match file_name {
        Some(name) => format!("Bid document \"{}\":\n\n{}", name, document_text),
        None => format!("Bid document:\n\n{}", document_text),
    }
}
