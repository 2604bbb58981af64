use crate::error::FetchError;
use crate::fetch_state::FetchState;
use crate::gemini::{description_prompt, MISSING_KEY_MESSAGE};
use crate::screens::{cancel_pending, Dispatcher, Pending};
use crate::selection::{shown, Form, Shown};
use crate::types::{Character, CharacterId, Ticket};
use crate::worker::Request;

/// Status of the AI description. Kept apart from the text itself so a failed
/// attempt does not wipe the last good description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Failed(String),
}

pub struct DetailScreen {
    id: CharacterId,
    character: FetchState<Character>,
    form: Form,
    description: Option<String>,
    generation: GenerationStatus,
    speech_error: Option<String>,
    speaking: bool,
    load: Option<Pending>,
    generate: Option<Pending>,
    speech: Option<Pending>,
    generation_enabled: bool,
    speech_language: String,
}

impl DetailScreen {
    pub fn new(id: CharacterId, generation_enabled: bool, speech_language: &str) -> Self {
        Self {
            id,
            character: FetchState::Idle,
            form: Form::Base,
            description: None,
            generation: GenerationStatus::Idle,
            speech_error: None,
            speaking: false,
            load: None,
            generate: None,
            speech: None,
            generation_enabled,
            speech_language: speech_language.to_string(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }
    pub fn character(&self) -> &FetchState<Character> {
        &self.character
    }
    pub fn form(&self) -> Form {
        self.form
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn generation(&self) -> &GenerationStatus {
        &self.generation
    }
    pub fn is_generating(&self) -> bool {
        self.generate.is_some()
    }
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
    /// True from the moment speech is requested until it ends or is stopped.
    pub fn speech_pending(&self) -> bool {
        self.speech.is_some()
    }
    pub fn speech_error(&self) -> Option<&str> {
        self.speech_error.as_deref()
    }
    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    /// Name, image and ki for the selected form, once the record is loaded.
    pub fn shown(&self) -> Option<Shown<'_>> {
        self.character.data().map(|c| shown(c, self.form))
    }

    pub fn can_prev(&self) -> bool {
        self.character.data().is_some() && self.form.can_prev()
    }

    pub fn can_next(&self) -> bool {
        self.character
            .data()
            .is_some_and(|c| self.form.can_next(c.transformations.len()))
    }

    // ----- lifecycle -----
    pub fn mount(&mut self, d: &mut Dispatcher) {
        if matches!(self.character, FetchState::Idle) && self.load.is_none() {
            self.reload(d);
        }
    }

    /// Drop everything shown for this id and fetch it again.
    pub fn reload(&mut self, d: &mut Dispatcher) {
        self.cancel_all();
        self.character = FetchState::Loading;
        self.form = Form::Base;
        self.description = None;
        self.generation = GenerationStatus::Idle;
        self.speech_error = None;

        let p = d.begin();
        log::info!("[detail] load character {} #{}", self.id, p.ticket);
        d.send(Request::LoadCharacter {
            ticket: p.ticket,
            id: self.id,
            cancel: p.cancel.clone(),
        });
        self.load = Some(p);
    }

    /// Cancel every request this screen owns and silence speech. After this
    /// no event from earlier requests changes the screen.
    pub fn unmount(&mut self) {
        log::debug!("[detail] unmount {}", self.id);
        self.cancel_all();
    }

    fn cancel_all(&mut self) {
        cancel_pending(&mut self.load);
        cancel_pending(&mut self.generate);
        cancel_pending(&mut self.speech);
        self.speaking = false;
    }

    // ----- transformations -----
    pub fn prev_form(&mut self) {
        self.form = self.form.prev();
    }

    pub fn next_form(&mut self) {
        if let Some(c) = self.character.data() {
            self.form = self.form.next(c.transformations.len());
        }
    }

    // ----- generation -----
    /// Ask for a new AI description. Returns false when nothing was sent:
    /// a request is already pending, the record is not loaded, or no key is
    /// configured (the last case records a configuration error).
    pub fn request_generation(&mut self, d: &mut Dispatcher) -> bool {
        if self.generate.is_some() {
            return false;
        }
        let Some(c) = self.character.data() else {
            return false;
        };
        if !self.generation_enabled {
            self.generation = GenerationStatus::Failed(MISSING_KEY_MESSAGE.to_string());
            return false;
        }

        // The prompt always describes the base character.
        let prompt = description_prompt(c);
        let p = d.begin();
        log::info!("[detail] generate description for {} #{}", self.id, p.ticket);
        d.send(Request::GenerateDescription {
            ticket: p.ticket,
            prompt,
            cancel: p.cancel.clone(),
        });
        self.generate = Some(p);
        self.generation = GenerationStatus::Generating;
        true
    }

    // ----- speech -----
    /// Start speaking the stored description, or stop if already speaking.
    pub fn toggle_speech(&mut self, d: &mut Dispatcher) {
        if self.speech.is_some() {
            self.stop_speech();
            return;
        }
        let Some(text) = self.description.clone().filter(|t| !t.trim().is_empty()) else {
            return;
        };
        self.speech_error = None;
        let p = d.begin();
        log::info!("[detail] speak #{} ({} chars)", p.ticket, text.chars().count());
        d.send(Request::Speak {
            ticket: p.ticket,
            text,
            language: self.speech_language.clone(),
            cancel: p.cancel.clone(),
        });
        self.speech = Some(p);
    }

    pub fn stop_speech(&mut self) {
        cancel_pending(&mut self.speech);
        self.speaking = false;
    }

    // ----- events -----
    pub fn on_character_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<Character, FetchError>,
    ) -> bool {
        if !self.load.as_ref().is_some_and(|p| p.matches(ticket)) {
            return false;
        }
        self.load = None;
        if let Err(e) = &result {
            log::warn!("[detail] load {} failed ({}): {e}", self.id, e.kind());
        }
        self.character.settle(result);
        self.form = Form::Base;
        true
    }

    pub fn on_description(&mut self, ticket: Ticket, result: Result<String, FetchError>) -> bool {
        if !self.generate.as_ref().is_some_and(|p| p.matches(ticket)) {
            return false;
        }
        self.generate = None;
        match result {
            Ok(text) => {
                self.description = Some(text);
                self.generation = GenerationStatus::Idle;
            }
            Err(e) => {
                log::warn!("[detail] generation failed ({}): {e}", e.kind());
                self.generation = GenerationStatus::Failed(e.to_string());
            }
        }
        true
    }

    pub fn on_speech_started(&mut self, ticket: Ticket) -> bool {
        if !self.speech.as_ref().is_some_and(|p| p.matches(ticket)) {
            return false;
        }
        self.speaking = true;
        true
    }

    pub fn on_speech_finished(&mut self, ticket: Ticket, result: Result<(), FetchError>) -> bool {
        if !self.speech.as_ref().is_some_and(|p| p.matches(ticket)) {
            return false;
        }
        self.speech = None;
        self.speaking = false;
        if let Err(e) = result {
            log::warn!("[detail] speech failed: {e}");
            self.speech_error = Some(e.to_string());
        }
        true
    }
}
