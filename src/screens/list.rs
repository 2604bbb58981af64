use crate::error::FetchError;
use crate::fetch_state::FetchState;
use crate::screens::{cancel_pending, Dispatcher, Pending};
use crate::selection::{shown, Form, Shown};
use crate::types::{Character, CharacterId, CharacterSummary, SearchHits, Ticket};
use crate::worker::Request;

/// One search hit. `detail` is present when the search fetched records
/// eagerly, which is what enables in-place transformation cycling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub summary: CharacterSummary,
    pub detail: Option<Character>,
    pub form: Form,
}

impl Card {
    pub fn transformation_count(&self) -> usize {
        self.detail.as_ref().map_or(0, |d| d.transformations.len())
    }

    /// Name, image and ki for the current form.
    pub fn shown(&self) -> Shown<'_> {
        match &self.detail {
            Some(d) => shown(d, self.form),
            None => Shown {
                name: &self.summary.name,
                image: &self.summary.image,
                ki: &self.summary.ki,
                transformation: None,
            },
        }
    }

    /// Race, max ki, gender and affiliation always come from the base record.
    pub fn base(&self) -> &CharacterSummary {
        &self.summary
    }
}

fn cards_from(hits: SearchHits) -> Vec<Card> {
    match hits {
        SearchHits::Summaries(items) => items
            .into_iter()
            .map(|summary| Card {
                summary,
                detail: None,
                form: Form::Base,
            })
            .collect(),
        SearchHits::Detailed(items) => items
            .into_iter()
            .map(|c| Card {
                summary: CharacterSummary::from(&c),
                detail: Some(c),
                form: Form::Base,
            })
            .collect(),
    }
}

pub struct ListScreen {
    query: String,
    results: FetchState<Vec<Card>>,
    selected: usize,
    pending: Option<Pending>,
    page_size: u32,
    eager_detail_limit: usize,
}

impl ListScreen {
    pub fn new(default_search: &str, page_size: u32, eager_detail_limit: usize) -> Self {
        Self {
            query: default_search.to_string(),
            results: FetchState::Idle,
            selected: 0,
            pending: None,
            page_size,
            eager_detail_limit,
        }
    }

    // ----- getters -----
    pub fn query(&self) -> &str {
        &self.query
    }
    pub fn results(&self) -> &FetchState<Vec<Card>> {
        &self.results
    }
    pub fn selected(&self) -> usize {
        self.selected
    }
    pub fn selected_card(&self) -> Option<&Card> {
        self.results.data().and_then(|cards| cards.get(self.selected))
    }
    pub fn selected_id(&self) -> Option<CharacterId> {
        self.selected_card().map(|c| c.summary.id)
    }

    // ----- lifecycle -----
    /// First visit runs the default search; later visits keep what is shown.
    pub fn mount(&mut self, d: &mut Dispatcher) {
        if matches!(self.results, FetchState::Idle) && self.pending.is_none() {
            let term = Some(self.query.trim().to_string()).filter(|t| !t.is_empty());
            self.start(term, d);
        }
    }

    /// Search for the current query. Whitespace-only queries do nothing and
    /// keep the previous results; returns whether a request was sent.
    pub fn submit_search(&mut self, d: &mut Dispatcher) -> bool {
        let term = self.query.trim().to_string();
        if term.is_empty() {
            return false;
        }
        self.start(Some(term), d);
        true
    }

    fn start(&mut self, term: Option<String>, d: &mut Dispatcher) {
        cancel_pending(&mut self.pending);
        let p = d.begin();
        log::info!("[list] search #{} term={:?}", p.ticket, term);
        d.send(Request::Search {
            ticket: p.ticket,
            term,
            limit: self.page_size,
            eager_detail_limit: self.eager_detail_limit,
            cancel: p.cancel.clone(),
        });
        self.pending = Some(p);
        self.results = FetchState::Loading;
        self.selected = 0;
    }

    /// Apply a search result; results for superseded searches are ignored.
    pub fn on_search_finished(
        &mut self,
        ticket: Ticket,
        result: Result<SearchHits, FetchError>,
    ) -> bool {
        if !self.pending.as_ref().is_some_and(|p| p.matches(ticket)) {
            log::debug!("[list] ignoring stale search #{ticket}");
            return false;
        }
        self.pending = None;
        if let Err(e) = &result {
            log::warn!("[list] search #{ticket} failed ({}): {e}", e.kind());
        }
        self.results.settle(result.map(cards_from));
        true
    }

    pub fn cancel(&mut self) {
        cancel_pending(&mut self.pending);
    }

    // ----- search input -----
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    // ----- selection -----
    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let len = self.results.data().map_or(0, |c| c.len());
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Cycle the selected card's transformation; no-op at the bounds or when
    /// the card only has its summary.
    pub fn card_prev_form(&mut self) {
        let sel = self.selected;
        if let Some(card) = self.results.data_mut().and_then(|c| c.get_mut(sel)) {
            card.form = card.form.prev();
        }
    }

    pub fn card_next_form(&mut self) {
        let sel = self.selected;
        if let Some(card) = self.results.data_mut().and_then(|c| c.get_mut(sel)) {
            let len = card.transformation_count();
            card.form = card.form.next(len);
        }
    }
}
