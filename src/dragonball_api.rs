use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::net::{http_client, join_url, send_checked};
use crate::types::{Character, CharacterId, CharacterPage, CharacterSummary};

/// Read access to the character database.
#[async_trait]
pub trait CharacterApi: Send + Sync {
    /// One page of up to `limit` summaries. Never returns an empty list.
    async fn list_characters(&self, limit: u32) -> Result<Vec<CharacterSummary>, FetchError>;

    /// Full record, including transformations.
    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError>;
}

/// `dragonball-api.com` over HTTPS.
#[derive(Clone, Debug)]
pub struct HttpCharacterApi {
    base_url: String,
    timeout_ms: u64,
}

impl HttpCharacterApi {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms,
        }
    }
}

#[async_trait]
impl CharacterApi for HttpCharacterApi {
    async fn list_characters(&self, limit: u32) -> Result<Vec<CharacterSummary>, FetchError> {
        let url = join_url(&self.base_url, "characters");
        log::info!("[api] GET {url}?limit={limit}");

        let rb = http_client().get(&url).query(&[("limit", limit)]);
        let res = send_checked(rb, "Character search failed", self.timeout_ms).await?;
        let body: Value = res
            .json()
            .await
            .map_err(|e| FetchError::network("Character search returned invalid JSON", e))?;

        let items = parse_page(body)?;
        log::info!("[api] page has {} characters", items.len());
        Ok(items)
    }

    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError> {
        let url = join_url(
            &self.base_url,
            &format!("characters/{}", urlencoding::encode(&id.to_string())),
        );
        log::info!("[api] GET {url}");

        let res = send_checked(http_client().get(&url), "Character lookup failed", self.timeout_ms)
            .await?;
        let body: Value = res
            .json()
            .await
            .map_err(|e| FetchError::network("Character lookup returned invalid JSON", e))?;

        parse_character(body)
    }
}

/// Decode a list body. Missing or empty `items` is an [`FetchError::EmptyResult`].
pub fn parse_page(body: Value) -> Result<Vec<CharacterSummary>, FetchError> {
    let page: CharacterPage = serde_json::from_value(body)
        .map_err(|e| FetchError::network("Unexpected character page format", e))?;

    match page.items {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(FetchError::EmptyResult(
            "No characters were returned by the API.".to_string(),
        )),
    }
}

/// Decode a detail body.
pub fn parse_character(body: Value) -> Result<Character, FetchError> {
    // The API answers unknown ids with 200 and an error object on some deployments
    if let Some(msg) = body.get("message").and_then(|m| m.as_str()) {
        if body.get("id").is_none() {
            return Err(FetchError::EmptyResult(msg.to_string()));
        }
    }
    serde_json::from_value(body).map_err(|e| FetchError::network("Unexpected character format", e))
}

/// Case-insensitive substring match on the name, keeping page order.
pub fn filter_by_name(items: &[CharacterSummary], term: &str) -> Vec<CharacterSummary> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(id: u32, name: &str) -> CharacterSummary {
        serde_json::from_value(json!({"id": id, "name": name, "race": "Saiyan"})).unwrap()
    }

    #[test]
    fn empty_or_missing_items_is_an_empty_result() {
        assert!(matches!(
            parse_page(json!({"items": []})),
            Err(FetchError::EmptyResult(_))
        ));
        assert!(matches!(
            parse_page(json!({"meta": {}})),
            Err(FetchError::EmptyResult(_))
        ));
    }

    #[test]
    fn page_keeps_api_order() {
        let items = parse_page(json!({
            "items": [
                {"id": 2, "name": "Vegeta", "race": "Saiyan", "ki": "54.000.000"},
                {"id": 1, "name": "Goku", "race": "Saiyan"}
            ],
            "meta": {"totalItems": 58},
            "links": {}
        }))
        .unwrap();
        assert_eq!(items.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(items[0].ki, "54.000.000");
    }

    #[test]
    fn error_object_is_not_a_character() {
        let r = parse_character(json!({"message": "Character not found", "statusCode": 404}));
        assert_eq!(r, Err(FetchError::EmptyResult("Character not found".into())));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let items = vec![summary(1, "Goku"), summary(2, "Gohan"), summary(3, "Goku Black")];
        let hits = filter_by_name(&items, "GOKU");
        assert_eq!(hits.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(filter_by_name(&items, "piccolo").is_empty());
    }
}
