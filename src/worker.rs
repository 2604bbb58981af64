use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::dragonball_api::{filter_by_name, CharacterApi};
use crate::error::FetchError;
use crate::gemini::{TextGenerator, MISSING_KEY_MESSAGE};
use crate::speech::Speaker;
use crate::types::{AppEvent, CharacterId, SearchHits, Ticket};

/// Work the screens hand to the background. Each request owns a token; once
/// it is cancelled the request produces no event.
#[derive(Debug, Clone)]
pub enum Request {
    Search {
        ticket: Ticket,
        /// `None` lists the page unfiltered.
        term: Option<String>,
        limit: u32,
        eager_detail_limit: usize,
        cancel: CancellationToken,
    },
    LoadCharacter {
        ticket: Ticket,
        id: CharacterId,
        cancel: CancellationToken,
    },
    GenerateDescription {
        ticket: Ticket,
        prompt: String,
        cancel: CancellationToken,
    },
    Speak {
        ticket: Ticket,
        text: String,
        language: String,
        cancel: CancellationToken,
    },
}

/// Remote capabilities the worker dispatches to.
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn CharacterApi>,
    /// `None` when no API key is configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub speaker: Arc<dyn Speaker>,
}

/// Background task: receives requests and runs each one on its own task so a
/// slow generation never blocks a search.
pub async fn run_worker(
    services: Services,
    mut requests: UnboundedReceiver<Request>,
    events: UnboundedSender<AppEvent>,
) {
    log::info!("[worker] started");
    while let Some(req) = requests.recv().await {
        let services = services.clone();
        let events = events.clone();
        tokio::spawn(async move { handle(services, req, events).await });
    }
    log::info!("[worker] request channel closed, exiting");
}

/// Run one request to completion (or cancellation) and post its event.
pub async fn handle(services: Services, req: Request, events: UnboundedSender<AppEvent>) {
    let event = match req {
        Request::Search {
            ticket,
            term,
            limit,
            eager_detail_limit,
            cancel,
        } => {
            log::debug!("[worker] search #{ticket} term={term:?}");
            let fut = search(services.api.as_ref(), term.as_deref(), limit, eager_detail_limit);
            cancellable(&cancel, fut)
                .await
                .map(|result| AppEvent::SearchFinished { ticket, result })
        }
        Request::LoadCharacter { ticket, id, cancel } => {
            log::debug!("[worker] load character {id} #{ticket}");
            cancellable(&cancel, services.api.get_character(id))
                .await
                .map(|result| AppEvent::CharacterLoaded { ticket, result })
        }
        Request::GenerateDescription {
            ticket,
            prompt,
            cancel,
        } => {
            let result = match &services.generator {
                Some(generator) => cancellable(&cancel, generator.generate(&prompt)).await,
                None => Some(Err(FetchError::Configuration(MISSING_KEY_MESSAGE.to_string()))),
            };
            result.map(|result| AppEvent::DescriptionGenerated { ticket, result })
        }
        Request::Speak {
            ticket,
            text,
            language,
            cancel,
        } => {
            if cancel.is_cancelled() {
                return;
            }
            let _ = events.send(AppEvent::SpeechStarted { ticket });
            cancellable(&cancel, services.speaker.speak(&text, &language))
                .await
                .map(|result| AppEvent::SpeechFinished { ticket, result })
        }
    };

    match event {
        Some(ev) => {
            if events.send(ev).is_err() {
                log::debug!("[worker] UI gone, dropping event");
            }
        }
        None => log::debug!("[worker] request cancelled"),
    }
}

/// Fetch one page, filter it by name, and fetch full records for the hits
/// when there are few enough of them.
///
/// Detail fetches run concurrently but are awaited jointly, so the result is
/// delivered once and in page order. One failed detail fails the search.
pub async fn search(
    api: &dyn CharacterApi,
    term: Option<&str>,
    limit: u32,
    eager_detail_limit: usize,
) -> Result<SearchHits, FetchError> {
    let page = api.list_characters(limit).await?;

    let hits = match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => {
            let hits = filter_by_name(&page, t);
            if hits.is_empty() {
                return Err(FetchError::EmptyResult(format!(
                    "No characters match \"{t}\"."
                )));
            }
            hits
        }
        None => page,
    };

    if hits.len() > eager_detail_limit {
        log::debug!(
            "[worker] {} hits above eager limit {}, summaries only",
            hits.len(),
            eager_detail_limit
        );
        return Ok(SearchHits::Summaries(hits));
    }

    let details = try_join_all(hits.iter().map(|c| api.get_character(c.id))).await?;
    Ok(SearchHits::Detailed(details))
}

async fn cancellable<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
