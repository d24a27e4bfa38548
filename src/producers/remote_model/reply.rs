//! Parsing of the model's JSON verdicts.
//!
//! The model is asked for a bare JSON array of
//! `{"code", "confidence", "reasoning"}` objects, but replies often arrive
//! wrapped in markdown fences or prose.

use serde_json::Value;

use crate::errors::RemoteModelError;

/// One code the model judged relevant.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVerdict {
    pub code: String,
    pub confidence: f64,
    pub reasoning: String,
}

/// Parsed reply: usable verdicts plus the items that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    pub verdicts: Vec<ModelVerdict>,
    pub skipped: Vec<String>,
}

/// Pull the JSON array out of a reply that may carry fences or prose.
pub fn extract_json_array(text: &str) -> &str {
    let mut text = text.trim();

    if let Some((_, rest)) = text.split_once("```json") {
        text = rest.split("```").next().unwrap_or(rest).trim();
    } else if let Some((_, rest)) = text.split_once("```") {
        text = rest.split("```").next().unwrap_or(rest).trim();
    }

    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse the model reply into verdicts. A reply that is not a JSON array is malformed;
/// individual bad items are skipped.
pub fn parse_reply(content: &str) -> Result<ParsedReply, RemoteModelError> {
    let json = extract_json_array(content);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| RemoteModelError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(RemoteModelError::MalformedResponse(format!(
                "expected JSON array, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut reply = ParsedReply::default();
    for (i, item) in items.iter().enumerate() {
        match parse_item(item) {
            Ok(v) => reply.verdicts.push(v),
            Err(reason) => reply.skipped.push(format!("item {i}: {reason}")),
        }
    }
    Ok(reply)
}

fn parse_item(item: &Value) -> Result<ModelVerdict, String> {
    let code = match item.get("code") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(format!("code has type {}", kind_of(other))),
        None => return Err("missing code".to_string()),
    };
    if code.is_empty() {
        return Err("empty code".to_string());
    }

    let confidence = match item.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().ok_or("confidence not representable")?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("confidence '{s}' is not a number"))?,
        Some(other) => return Err(format!("confidence has type {}", kind_of(other))),
        None => return Err("missing confidence".to_string()),
    };
    if !confidence.is_finite() {
        return Err("confidence is not finite".to_string());
    }

    let reasoning = match item.get("reasoning") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => return Err("missing reasoning".to_string()),
        Some(other) => other.to_string(),
    };

    Ok(ModelVerdict {
        code,
        confidence,
        reasoning,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
