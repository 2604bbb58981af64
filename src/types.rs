use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Character identifier as used by the `/characters/{id}` route.
pub type CharacterId = u32;

/// Monotonic id tying an [`AppEvent`] back to the request that produced it.
pub type Ticket = u64;

/// Item of the `GET /characters?limit=n` page.
///
/// The list endpoint returns most scalar fields too, but only `id`, `name`,
/// `image` and `race` are guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub ki: String,
    #[serde(default)]
    pub max_ki: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub description: String,
}

/// Envelope of the list endpoint. `meta` and `links` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub items: Option<Vec<CharacterSummary>>,
}

/// Full record from `GET /characters/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub ki: String,
    #[serde(default)]
    pub max_ki: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub transformations: Vec<Transformation>,
    #[serde(default)]
    pub origin_planet: Option<Planet>,
}

/// Alternate form of a character ("Goku SSJ", "Goku SSJ2", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ki: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub name: String,
    #[serde(default)]
    pub is_destroyed: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl From<&Character> for CharacterSummary {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            image: c.image.clone(),
            race: c.race.clone(),
            ki: c.ki.clone(),
            max_ki: c.max_ki.clone(),
            gender: c.gender.clone(),
            affiliation: c.affiliation.clone(),
            description: c.description.clone(),
        }
    }
}

/// Outcome of a list search: summaries only, or summaries with their detail
/// records fetched eagerly (same order as the filtered page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHits {
    Summaries(Vec<CharacterSummary>),
    Detailed(Vec<Character>),
}

impl SearchHits {
    pub fn len(&self) -> usize {
        match self {
            SearchHits::Summaries(v) => v.len(),
            SearchHits::Detailed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Events posted by background tasks to the UI loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SearchFinished {
        ticket: Ticket,
        result: Result<SearchHits, FetchError>,
    },
    CharacterLoaded {
        ticket: Ticket,
        result: Result<Character, FetchError>,
    },
    DescriptionGenerated {
        ticket: Ticket,
        result: Result<String, FetchError>,
    },
    SpeechStarted {
        ticket: Ticket,
    },
    SpeechFinished {
        ticket: Ticket,
        result: Result<(), FetchError>,
    },
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_payload_parses_with_transformations_and_planet() {
        let raw = r#"{
            "id": 1,
            "name": "Goku",
            "ki": "60.000.000",
            "maxKi": "90 Septillion",
            "race": "Saiyan",
            "gender": "Male",
            "description": "El protagonista",
            "image": "https://dragonball-api.com/characters/goku_normal.webp",
            "affiliation": "Z Fighter",
            "deletedAt": null,
            "originPlanet": {
                "id": 3,
                "name": "Vegeta",
                "isDestroyed": true,
                "description": "Planeta natal",
                "image": "https://dragonball-api.com/planetas/vegeta.webp",
                "deletedAt": null
            },
            "transformations": [
                {"id": 1, "name": "Goku SSJ", "image": "ssj.webp", "ki": "3 Billion", "deletedAt": null}
            ]
        }"#;

        let c: Character = serde_json::from_str(raw).unwrap();
        assert_eq!(c.max_ki, "90 Septillion");
        assert_eq!(c.transformations.len(), 1);
        assert_eq!(c.transformations[0].name, "Goku SSJ");
        let planet = c.origin_planet.unwrap();
        assert_eq!(planet.name, "Vegeta");
        assert!(planet.is_destroyed);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let c: Character = serde_json::from_str(r#"{"id": 7, "name": "Bulma"}"#).unwrap();
        assert!(c.transformations.is_empty());
        assert!(c.origin_planet.is_none());
        assert_eq!(c.ki, "");

        let page: CharacterPage = serde_json::from_str(r#"{"meta": {"totalItems": 0}}"#).unwrap();
        assert!(page.items.is_none());
    }
}
