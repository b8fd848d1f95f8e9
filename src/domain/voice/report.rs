//! Markdown rendering of assistant error bodies.

use serde_json::Value;

const UNKNOWN_ERROR: &str = "Erreur inconnue";

/// Renders a failed assistant response as markdown for display.
///
/// JSON bodies are summarised field by field; other bodies are shown verbatim,
/// fenced when they look like markup or code.
pub fn render_error_body(status: u16, body: &str) -> String {
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(json) => render_json(&json),
        Err(_) if body.contains("<html") || body.contains('{') => {
            format!("```\n{}\n```", body)
        }
        Err(_) => body.to_string(),
    };
    format!("### ❌ Erreur {}\n\n{}", status, detail)
}

fn render_json(json: &Value) -> String {
    let own_message = json.get("message").filter(|v| is_truthy(v));
    let nested_message = json
        .get("error")
        .and_then(|e| e.get("message"))
        .filter(|v| is_truthy(v));

    let message = own_message
        .or(nested_message)
        .map(display)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    let mut out = format!("**Message :** {}\n\n", message);

    if let Some(details) = json.get("details").filter(|v| is_truthy(v)) {
        let details = match details {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        };
        out.push_str(&format!("**Détails :**\n```\n{}\n```\n", details));
    }

    if let Some(code) = json.get("code").filter(|v| is_truthy(v)) {
        out.push_str(&format!("**Code :** `{}`\n", display(code)));
    }

    if own_message.is_none() && nested_message.is_none() {
        let raw = serde_json::to_string_pretty(json).unwrap_or_default();
        out.push_str(&format!("**Réponse brute :**\n```json\n{}\n```", raw));
    }

    out
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_with_all_fields() {
        let body = r#"{"message":"Workflow failed","details":{"node":"Transcribe"},"code":"E42"}"#;
        let rendered = render_error_body(500, body);

        assert!(rendered.starts_with("### ❌ Erreur 500\n\n"));
        assert!(rendered.contains("**Message :** Workflow failed\n\n"));
        assert!(rendered.contains("**Détails :**\n```\n{\n  \"node\": \"Transcribe\"\n}\n```\n"));
        assert!(rendered.contains("**Code :** `E42`\n"));
        assert!(!rendered.contains("Réponse brute"));
    }

    #[test]
    fn nested_error_message_is_used() {
        let rendered = render_error_body(400, r#"{"error":{"message":"Bad audio"}}"#);
        assert!(rendered.contains("**Message :** Bad audio"));
        assert!(!rendered.contains("Réponse brute"));
    }

    #[test]
    fn json_without_message_shows_raw_body() {
        let rendered = render_error_body(502, r#"{"status":"down"}"#);
        assert!(rendered.contains("**Message :** Erreur inconnue"));
        assert!(rendered.contains("**Réponse brute :**\n```json\n{\n  \"status\": \"down\"\n}\n```"));
    }

    #[test]
    fn string_details_are_not_quoted() {
        let rendered = render_error_body(500, r#"{"message":"x","details":"timeout"}"#);
        assert!(rendered.contains("```\ntimeout\n```"));
    }

    #[test]
    fn html_body_is_fenced() {
        let rendered = render_error_body(503, "<html><body>Bad gateway</body></html>");
        assert!(rendered.ends_with("```\n<html><body>Bad gateway</body></html>\n```"));
    }

    #[test]
    fn plain_text_is_verbatim() {
        assert_eq!(
            render_error_body(404, "Not found"),
            "### ❌ Erreur 404\n\nNot found"
        );
    }
}
