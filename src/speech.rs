//! Text-to-speech through the platform synthesizer.
//!
//! Playback is a child process. The future returned by [`Speaker::speak`]
//! owns it with `kill_on_drop`, so dropping the future (cancellation, screen
//! teardown) silences the audio immediately.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::FetchError;

#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text` and resolve when playback ends.
    async fn speak(&self, text: &str, language: &str) -> Result<(), FetchError>;
}

#[derive(Clone, Debug)]
pub struct ProcessSpeaker {
    program: String,
}

impl ProcessSpeaker {
    pub fn new(program: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| default_program().to_string()),
        }
    }

    /// Arguments for the configured synthesizer. macOS `say` selects voices
    /// by name, so only espeak-style programs get the language flag. The text
    /// always follows `--` so a leading dash is never read as an option.
    pub fn args(&self, text: &str, language: &str) -> Vec<String> {
        let is_say = std::path::Path::new(&self.program)
            .file_name()
            .map(|n| n == "say")
            .unwrap_or(false);
        let mut args = Vec::with_capacity(4);
        if !is_say {
            args.push("-v".to_string());
            args.push(espeak_voice(language));
        }
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

fn default_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak-ng"
    }
}

/// `es-ES` -> `es`; espeak voices are keyed by primary language subtag.
fn espeak_voice(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("es")
        .to_lowercase()
}

#[async_trait]
impl Speaker for ProcessSpeaker {
    async fn speak(&self, text: &str, language: &str) -> Result<(), FetchError> {
        let mut child = Command::new(&self.program)
            .args(self.args(text, language))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FetchError::ExternalService(format!(
                    "Speech synthesizer '{}' could not start: {e}",
                    self.program
                ))
            })?;

        let status = child
            .wait()
            .await
            .map_err(|e| FetchError::ExternalService(format!("Speech playback failed: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(FetchError::ExternalService(format!(
                "Speech synthesizer exited with {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn espeak_gets_language_flag() {
        let s = ProcessSpeaker::new(Some("espeak-ng".into()));
        assert_eq!(s.args("hola", "es-ES"), vec!["-v", "es", "--", "hola"]);
        assert_eq!(s.args("hi", "en_US"), vec!["-v", "en", "--", "hi"]);
    }

    #[test]
    fn leading_dash_text_is_not_an_option() {
        let text = "- Goku es un guerrero saiyajin.";
        for program in ["espeak-ng", "/usr/bin/say"] {
            let args = ProcessSpeaker::new(Some(program.into())).args(text, "es-ES");
            let n = args.len();
            assert_eq!(args[n - 2], "--");
            assert_eq!(args[n - 1], text);
        }
    }

    #[test]
    fn say_takes_text_only() {
        let s = ProcessSpeaker::new(Some("/usr/bin/say".into()));
        assert_eq!(s.args("hola", "es-ES"), vec!["--", "hola"]);
    }

    #[tokio::test]
    async fn missing_program_is_an_external_error() {
        let s = ProcessSpeaker::new(Some("kiscope-no-such-synth".into()));
        let r = s.speak("hola", "es-ES").await;
        assert!(matches!(r, Err(FetchError::ExternalService(_))));
    }
}
