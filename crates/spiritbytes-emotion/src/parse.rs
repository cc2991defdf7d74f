// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant decoding of inference response bodies.

use spiritbytes_core::EmotionAnalysis;
use tracing::warn;

/// Decode an inference body. Never fails.
///
/// Tries a strict parse, then one parse of the sanitized text. A body that
/// still does not parse yields an unsuccessful analysis with no emotions.
pub fn parse_analysis(body: &str) -> EmotionAnalysis {
    if let Ok(analysis) = serde_json::from_str::<EmotionAnalysis>(body) {
        return analysis;
    }

    let cleaned = sanitize(body);
    match serde_json::from_str::<EmotionAnalysis>(&cleaned) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(error = %e, len = body.len(), "inference response unparseable");
            EmotionAnalysis {
                success: false,
                message: "parse failed".into(),
                emotions: Vec::new(),
                image_url: None,
            }
        }
    }
}

/// Escape stray backslashes and drop control characters.
///
/// A backslash is kept when it starts a valid JSON escape (`\"`, `\\`, `\/`,
/// `\b`, `\f`, `\n`, `\r`, `\t`, `\uXXXX`); any other is doubled.
pub(crate) fn sanitize(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            match chars.get(i + 1) {
                Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                    out.push(c);
                    out.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                Some('u') if is_unicode_escape(&chars[i + 2..]) => {
                    out.push(c);
                }
                _ => out.push_str("\\\\"),
            }
        } else if !c.is_control() {
            out.push(c);
        }
        i += 1;
    }
    out
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(char::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_parses() {
        let analysis = parse_analysis(
            r#"{"success":true,"message":"Emotions detected","emotions":[{"type":"HAPPY","confidence":97.1}]}"#,
        );
        assert!(analysis.success);
        assert_eq!(analysis.emotions[0].label, "HAPPY");
    }

    #[test]
    fn empty_emotions_is_success_not_failure() {
        let analysis = parse_analysis(r#"{"success":true,"emotions":[]}"#);
        assert!(analysis.success);
        assert!(analysis.is_empty());
    }

    #[test]
    fn control_characters_and_bad_escapes_are_repaired() {
        let body = "{\"success\":true,\"message\":\"C:\\path\u{0007}\",\"emotions\":[]}";
        let analysis = parse_analysis(body);
        assert!(analysis.success);
        assert_eq!(analysis.message, "C:\\path");
    }

    #[test]
    fn valid_escapes_survive_sanitizing() {
        assert_eq!(sanitize(r#""a\n\u00e9\q""#), r#""a\n\u00e9\\q""#);
    }

    #[test]
    fn garbage_becomes_unsuccessful_analysis() {
        let analysis = parse_analysis("<html>502 Bad Gateway</html>");
        assert!(!analysis.success);
        assert_eq!(analysis.message, "parse failed");
        assert!(analysis.emotions.is_empty());
    }
}
