//! Strict parsing of the extraction model's JSON reply.

use serde_json::Value;

use super::AnalysisResult;

/// Result of reading an extraction reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnalysis {
    Parsed(AnalysisResult),
    /// The reply did not have the expected shape; the reason says how.
    Malformed(String),
}

impl ParsedAnalysis {
    /// Parses a model reply.
    ///
    /// The reply must contain exactly one JSON object, optionally inside a
    /// fenced block, with a `csi_divisions` object whose entries are
    /// objects. Text around the object is ignored.
    pub fn from_reply(reply: &str) -> Self {
        let Some(candidate) = extract_object(reply) else {
            return Self::Malformed("reply contains no JSON object".to_string());
        };

        let value: Value = match serde_json::from_str(candidate) {
            Ok(value) => value,
            Err(e) => return Self::Malformed(format!("invalid JSON: {}", e)),
        };

        let Value::Object(object) = value else {
            return Self::Malformed("top-level value is not an object".to_string());
        };

        match object.get("csi_divisions") {
            Some(Value::Object(divisions)) => {
                if let Some((key, _)) = divisions.iter().find(|(_, entry)| !entry.is_object()) {
                    return Self::Malformed(format!("division '{}' is not an object", key));
                }
            }
            Some(_) => return Self::Malformed("csi_divisions is not an object".to_string()),
            None => return Self::Malformed("missing csi_divisions".to_string()),
        }

        match serde_json::from_value(Value::Object(object)) {
            Ok(analysis) => Self::Parsed(analysis),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

fn extract_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_object() {
        let parsed = ParsedAnalysis::from_reply(
            r#"{"contractor":"Acme","csi_divisions":{"03":{"subtotal":10}}}"#,
        );
        match parsed {
            ParsedAnalysis::Parsed(analysis) => {
                assert_eq!(analysis.division_count(), 1);
                assert_eq!(analysis.rest["contractor"], "Acme");
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn tolerates_fences_and_prose() {
        let reply = "Here is the analysis:\n```json\n{\"csi_divisions\":{}}\n```\nLet me know.";
        assert!(ParsedAnalysis::from_reply(reply).is_parsed());
    }

    #[test]
    fn reports_missing_divisions() {
        assert_eq!(
            ParsedAnalysis::from_reply(r#"{"contractor":"Acme"}"#),
            ParsedAnalysis::Malformed("missing csi_divisions".to_string())
        );
    }

    #[test]
    fn reports_non_object_division() {
        assert_eq!(
            ParsedAnalysis::from_reply(r#"{"csi_divisions":{"03":"concrete"}}"#),
            ParsedAnalysis::Malformed("division '03' is not an object".to_string())
        );
    }

    #[test]
    fn reports_prose_only_reply() {
        assert!(matches!(
            ParsedAnalysis::from_reply("I could not read this document."),
            ParsedAnalysis::Malformed(_)
        ));
    }

    #[test]
    fn reports_broken_json() {
        assert!(matches!(
            ParsedAnalysis::from_reply(r#"{"csi_divisions": {"03": {}}"#),
            ParsedAnalysis::Malformed(reason) if reason.starts_with("invalid JSON")
        ));
    }
}
