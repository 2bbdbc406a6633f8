//! Share Summary
//!
//! Plain-text summary of a result, suitable for a clipboard or a message.

use serde_json::Value;

use trustscope_core::{Payload, ToolKind};

/// Look up `key` on the payload, then inside a nested `results` object.
fn field<'a>(payload: &'a Payload, key: &str) -> Option<&'a Value> {
    payload
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| {
            payload
                .get("results")
                .and_then(|r| r.get(key))
                .filter(|v| !v.is_null())
        })
}

fn text_field(payload: &Payload, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| field(payload, k))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Build the share text for a result.
pub fn share_text(tool: ToolKind, payload: &Payload) -> String {
    let mut lines = vec![format!("TrustScope {} result", tool.label())];

    if let Some(score) = field(payload, "trust_score").and_then(Value::as_f64) {
        lines.push(format!("Trust score: {}/100", score.round() as i64));
    }
    if let Some(verdict) = text_field(payload, &["verdict", "classification"]) {
        lines.push(format!("Verdict: {}", verdict));
    }
    if let Some(summary) = text_field(payload, &["summary", "explanation"]) {
        lines.push(summary);
    }

    lines.join("\n")
}
