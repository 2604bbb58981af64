//! AI character descriptions through the Gemini `generateContent` API.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::net::{http_client, join_url, send_checked};
use crate::types::Character;

/// Shown when a description is requested without an API key.
pub const MISSING_KEY_MESSAGE: &str =
    "No Gemini API key found. Set GEMINI_API_KEY in your environment or .env file.";

/// Produces free-form prose for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError>;
}

/// Prompt sent for a character. Answers must be Spanish prose only.
pub fn description_prompt(c: &Character) -> String {
    format!(
        "Responde siempre en español: Genera una descripción para el personaje de Dragon Ball \
         llamado {name}. Ya tengo la siguiente información: Raza: {race}, Ki: {ki}, \
         Género: {gender}, Afiliación: {affiliation}. Proporciona detalles sobre su historia, \
         personalidad o habilidades. IMPORTANTE: Tu respuesta debe ser solo la descripción, \
         sin saludos, sin encabezados y sin repetir la información que te di.",
        name = c.name,
        race = c.race,
        ki = c.ki,
        gender = c.gender,
        affiliation = c.affiliation,
    )
}

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    timeout_ms: u64,
}

impl GeminiClient {
    /// `None` when no key is configured; the feature stays disabled.
    pub fn from_key(
        api_key: Option<&str>,
        base_url: &str,
        model: &str,
        timeout_ms: u64,
    ) -> Option<Self> {
        let key = api_key?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: key.to_string(),
            timeout_ms,
        })
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError> {
        let url = join_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        log::info!("[gemini] generateContent model={}", self.model);
        let rb = http_client()
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let res = send_checked(rb, "Gemini request failed", self.timeout_ms)
            .await
            .map_err(|e| FetchError::ExternalService(format!("{e}. Check your API key.")))?;
        let data: Value = res
            .json()
            .await
            .map_err(|e| FetchError::ExternalService(format!("Invalid Gemini response: {e}")))?;

        extract_text(&data)
    }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(data: &Value) -> Result<String, FetchError> {
    let text: String = data
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        let reason = data
            .pointer("/promptFeedback/blockReason")
            .and_then(|r| r.as_str())
            .unwrap_or("no text in response");
        return Err(FetchError::ExternalService(format!(
            "Gemini returned no description ({reason})"
        )));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goku() -> Character {
        serde_json::from_value(json!({
            "id": 1, "name": "Goku", "race": "Saiyan", "ki": "60.000.000",
            "gender": "Male", "affiliation": "Z Fighter"
        }))
        .unwrap()
    }

    #[test]
    fn prompt_embeds_character_facts() {
        let p = description_prompt(&goku());
        assert!(p.starts_with("Responde siempre en español"));
        for fact in ["Goku", "Saiyan", "60.000.000", "Male", "Z Fighter"] {
            assert!(p.contains(fact), "prompt is missing {fact}");
        }
        assert!(p.contains("sin saludos"));
    }

    #[test]
    fn extracts_and_joins_parts() {
        let data = json!({
            "candidates": [{
                "content": { "parts": [{"text": "Goku es "}, {"text": "un guerrero."}] }
            }]
        });
        assert_eq!(extract_text(&data).unwrap(), "Goku es un guerrero.");
    }

    #[test]
    fn blocked_or_empty_response_is_an_external_error() {
        let data = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        match extract_text(&data) {
            Err(FetchError::ExternalService(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_key_disables_client() {
        assert!(GeminiClient::from_key(None, "https://x.test", "m", 1000).is_none());
        assert!(GeminiClient::from_key(Some(" "), "https://x.test", "m", 1000).is_none());
        assert!(GeminiClient::from_key(Some("k"), "https://x.test", "m", 1000).is_some());
    }
}
