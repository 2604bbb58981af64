//! Fakes and fixtures shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kiscope::dragonball_api::CharacterApi;
use kiscope::error::FetchError;
use kiscope::gemini::TextGenerator;
use kiscope::speech::Speaker;
use kiscope::types::{Character, CharacterId, CharacterSummary, Transformation};
use kiscope::worker::Request;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn summary(id: CharacterId, name: &str, race: &str) -> CharacterSummary {
    CharacterSummary {
        id,
        name: name.to_string(),
        image: format!("https://dragonball-api.com/characters/{id}.webp"),
        race: race.to_string(),
        ki: "1000000".to_string(),
        max_ki: "90 Septillion".to_string(),
        gender: "Male".to_string(),
        affiliation: "Z Fighter".to_string(),
        description: String::new(),
    }
}

pub fn character(id: CharacterId, name: &str, forms: &[&str]) -> Character {
    Character {
        id,
        name: name.to_string(),
        race: "Saiyan".to_string(),
        ki: "60.000.000".to_string(),
        max_ki: "90 Septillion".to_string(),
        gender: "Male".to_string(),
        description: format!("{name} description"),
        image: format!("{id}.webp"),
        affiliation: "Z Fighter".to_string(),
        transformations: forms
            .iter()
            .enumerate()
            .map(|(i, f)| Transformation {
                id: i as u32 + 1,
                name: f.to_string(),
                image: format!("{f}.webp"),
                ki: format!("{} Billion", i + 1),
            })
            .collect(),
        origin_planet: None,
    }
}

/// Goku, Gohan, Vegeta, Goku Black: "goku" matches ids 1 and 4.
pub fn fixture_page() -> Vec<CharacterSummary> {
    vec![
        summary(1, "Goku", "Saiyan"),
        summary(2, "Gohan", "Saiyan"),
        summary(3, "Vegeta", "Saiyan"),
        summary(4, "Goku Black", "Saiyan"),
    ]
}

/// In-memory database. Detail lookups sleep `delay_ms[id]` first so tests
/// can make later ids finish before earlier ones.
#[derive(Default)]
pub struct FakeApi {
    pub page: Vec<CharacterSummary>,
    pub details: HashMap<CharacterId, Character>,
    pub delay_ms: HashMap<CharacterId, u64>,
    pub failing: Vec<CharacterId>,
    pub detail_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_page(page: Vec<CharacterSummary>) -> Self {
        let details = page
            .iter()
            .map(|s| (s.id, character(s.id, &s.name, &["SSJ"])))
            .collect();
        Self {
            page,
            details,
            ..Default::default()
        }
    }
}

#[async_trait]
impl CharacterApi for FakeApi {
    async fn list_characters(&self, limit: u32) -> Result<Vec<CharacterSummary>, FetchError> {
        let items: Vec<_> = self.page.iter().take(limit as usize).cloned().collect();
        if items.is_empty() {
            return Err(FetchError::EmptyResult(
                "No characters were returned by the API.".to_string(),
            ));
        }
        Ok(items)
    }

    async fn get_character(&self, id: CharacterId) -> Result<Character, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ms) = self.delay_ms.get(&id) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing.contains(&id) {
            return Err(FetchError::NetworkOrStatus(format!(
                "Character lookup failed (HTTP 500) for {id}"
            )));
        }
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| FetchError::NetworkOrStatus("Character lookup failed (HTTP 404)".into()))
    }
}

/// Records prompts; answers after `delay_ms`.
pub struct FakeGenerator {
    pub reply: Result<String, FetchError>,
    pub delay_ms: u64,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay_ms: 10,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.reply.clone()
    }
}

/// "Plays" for `duration_ms` and counts finished utterances.
pub struct FakeSpeaker {
    pub duration_ms: u64,
    pub completed: Arc<AtomicUsize>,
}

impl FakeSpeaker {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Speaker for FakeSpeaker {
    async fn speak(&self, _text: &str, _language: &str) -> Result<(), FetchError> {
        tokio::time::sleep(Duration::from_millis(self.duration_ms)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Everything currently queued for the worker.
pub fn drain(rx: &mut UnboundedReceiver<Request>) -> Vec<Request> {
    let mut out = Vec::new();
    while let Ok(r) = rx.try_recv() {
        out.push(r);
    }
    out
}
