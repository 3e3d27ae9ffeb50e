use serde::{Deserialize, Serialize};

use crate::form::Attachment;

/// ========================================
/// Gemini generateContent wire protocol
/// ========================================

pub const THINKING_BUDGET: u32 = 24_576;
pub const MAX_OUTPUT_TOKENS: u32 = 8_192;
pub const TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

impl From<&Attachment> for InlineData {
    fn from(a: &Attachment) -> Self {
        Self { mime_type: a.mime_type.clone(), data: a.data.clone() }
    }
}

/// Variant order matters for untagged decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Part::Text { text: s.into(), thought: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// The two request shapes: text only, or an attachment followed by text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    TextOnly { text: String },
    WithAttachment { attachment: InlineData, text: String },
}

impl Payload {
    pub fn new(text: String, attachment: Option<&Attachment>) -> Self {
        match attachment {
            Some(a) => Payload::WithAttachment { attachment: a.into(), text },
            None => Payload::TextOnly { text },
        }
    }

    pub fn into_parts(self) -> Vec<Part> {
        match self {
            Payload::TextOnly { text } => vec![Part::text(text)],
            Payload::WithAttachment { attachment, text } => vec![
                Part::InlineData { inline_data: attachment },
                Part::text(text),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub thinking_config: ThinkingConfig,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationConfig {
    pub fn fixed() -> Self {
        Self {
            thinking_config: ThinkingConfig { thinking_budget: THINKING_BUDGET },
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    pub fn new(payload: Payload) -> Self {
        Self {
            contents: vec![Content { role: Some("user".into()), parts: payload.into_parts() }],
            generation_config: GenerationConfig::fixed(),
        }
    }

    /// Copy with inline data replaced by its length, for debug output.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        for c in &mut out.contents {
            for p in &mut c.parts {
                if let Part::InlineData { inline_data } = p {
                    inline_data.data = format!("<{} base64 chars>", inline_data.data.len());
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    /// Joined non-thought text of the first candidate; empty when there is none.
    pub fn text(&self) -> String {
        let Some(content) = self.candidates.first().and_then(|c| c.content.as_ref()) else {
            return String::new();
        };
        content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text, thought } if *thought != Some(true) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn attachment() -> Attachment {
        Attachment {
            file_name: "bai1.pdf".into(),
            mime_type: "application/pdf".into(),
            data: "JVBERi0=".into(),
        }
    }

    #[test]
    fn text_only_request_shape() {
        let req = GenerateRequest::new(Payload::new("hello".into(), None));
        let v: Value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "generationConfig": {
                    "thinkingConfig": { "thinkingBudget": 24576 },
                    "maxOutputTokens": 8192,
                    "temperature": 0.5
                }
            })
        );
    }

    #[test]
    fn attachment_part_comes_first() {
        let payload = Payload::new("prompt".into(), Some(&attachment()));
        assert!(matches!(payload, Payload::WithAttachment { .. }));

        let v = serde_json::to_value(GenerateRequest::new(payload)).unwrap();
        let parts = &v["contents"][0]["parts"];
        assert_eq!(parts.as_array().unwrap().len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0=");
        assert_eq!(parts[1]["text"], "prompt");
    }

    #[test]
    fn response_text_skips_thoughts() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "planning...", "thought": true },
                    { "text": "# KẾ HOẠCH" },
                    { "text": " BÀI DẠY" }
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(resp.text(), "# KẾ HOẠCH BÀI DẠY");
    }

    #[test]
    fn missing_candidates_or_content_is_empty_text() {
        let resp: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.text(), "");
        let resp: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert_eq!(resp.text(), "");
    }

    #[test]
    fn redaction_hides_base64() {
        let req = GenerateRequest::new(Payload::new("p".into(), Some(&attachment())));
        let shown = serde_json::to_string(&req.redacted()).unwrap();
        assert!(!shown.contains("JVBERi0="));
        assert!(shown.contains("<8 base64 chars>"));
    }
}
