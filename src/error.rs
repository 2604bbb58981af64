//! Error taxonomy for every remote call the screens make.
//!
//! Each variant carries the message shown to the user verbatim; nothing here
//! is meant to propagate past the screen that issued the request.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or non-2xx status.
    #[error("{0}")]
    NetworkOrStatus(String),
    /// Well-formed response that contained nothing to show.
    #[error("{0}")]
    EmptyResult(String),
    /// A required credential or setting is missing.
    #[error("{0}")]
    Configuration(String),
    /// Generative text or speech synthesis failed.
    #[error("{0}")]
    ExternalService(String),
}

impl FetchError {
    pub fn network(context: &str, err: impl std::fmt::Display) -> Self {
        FetchError::NetworkOrStatus(format!("{context}: {err}"))
    }

    pub fn status(context: &str, status: reqwest::StatusCode) -> Self {
        FetchError::NetworkOrStatus(format!("{context} (HTTP {})", status.as_u16()))
    }

    /// Short label used in the debug log.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NetworkOrStatus(_) => "network",
            FetchError::EmptyResult(_) => "empty",
            FetchError::Configuration(_) => "config",
            FetchError::ExternalService(_) => "external",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_plain_message() {
        let e = FetchError::EmptyResult("No characters match \"xyz\".".into());
        assert_eq!(e.to_string(), "No characters match \"xyz\".");
        assert_eq!(e.kind(), "empty");

        let e = FetchError::status("Character lookup failed", reqwest::StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "Character lookup failed (HTTP 404)");
    }
}
