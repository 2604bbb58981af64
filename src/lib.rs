//! kiscope - Dragon Ball character browser for the terminal
//!
//! Browses the public Dragon Ball character database, cycles through each
//! character's transformations, and can ask Gemini for a Spanish description
//! that the platform speech synthesizer reads aloud.
//!
//! ## Architecture
//!
//! The UI thread owns an [`App`] and never awaits. Screens send
//! [`worker::Request`]s to a background worker over a channel; results come
//! back as [`AppEvent`]s tagged with the ticket of the request that produced
//! them, so superseded or cancelled work is ignored.
//!
//! ```bash
//! cargo run -- /character/1
//! ```

// Data model and shared state
pub mod error;
pub mod fetch_state;
pub mod selection;
pub mod types;
pub mod util_text;

// Configuration and navigation
pub mod config;
pub mod router;

// Remote services
pub mod dragonball_api;
pub mod gemini;
pub mod net;
pub mod speech;
pub mod worker;

// Screens and rendering
pub mod app;
pub mod screens;
pub mod theme;
pub mod ui;
pub mod widgets;

// Re-export commonly used types
pub use app::{App, AppSettings, InputMode};
pub use config::Config;
pub use error::FetchError;
pub use types::{AppEvent, Character, CharacterSummary, Transformation};
