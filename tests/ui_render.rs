//! Render smoke tests against ratatui's TestBackend.

mod common;

use common::{character, drain, fixture_page};
use kiscope::app::{App, AppSettings};
use kiscope::router::Route;
use kiscope::types::{AppEvent, SearchHits};
use kiscope::ui;
use kiscope::worker::Request;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

fn buffer_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn listed() -> (App, UnboundedReceiver<Request>) {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(AppSettings::default(), tx);
    app.navigate(Route::List);
    let ticket = match drain(&mut rx).pop() {
        Some(Request::Search { ticket, .. }) => ticket,
        other => panic!("{other:?}"),
    };
    app.on_event(AppEvent::SearchFinished {
        ticket,
        result: Ok(SearchHits::Summaries(fixture_page())),
    });
    (app, rx)
}

#[test]
fn list_shows_cards_and_formatted_ki() {
    let (mut app, _rx) = listed();
    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("Results (4)"));
    assert!(screen.contains("Goku"));
    assert!(screen.contains("Vegeta"));
    assert!(screen.contains("1,000,000"));
    assert!(screen.contains("Search"));
}

#[test]
fn loading_hides_previous_cards() {
    let (mut app, _rx) = listed();
    app.submit_search();
    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("Searching"));
    assert!(!screen.contains("Vegeta"));
}

#[test]
fn small_terminal_shows_warning() {
    let (mut app, _rx) = listed();
    let screen = render(&mut app, 50, 14);
    assert!(screen.contains("Terminal too small"));
}

#[test]
fn detail_shows_profile_and_actions() {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(AppSettings::default(), tx);
    app.navigate(Route::Character { id: 1 });
    let ticket = match drain(&mut rx).pop() {
        Some(Request::LoadCharacter { ticket, .. }) => ticket,
        other => panic!("{other:?}"),
    };

    let loading = render(&mut app, 100, 30);
    assert!(loading.contains("Loading character"));

    app.on_event(AppEvent::CharacterLoaded {
        ticket,
        result: Ok(character(1, "Goku", &["SSJ"])),
    });
    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("Profile"));
    assert!(screen.contains("Saiyan"));
    assert!(screen.contains("60.000.000"));
    assert!(screen.contains("Generate AI description"));
    assert!(screen.contains("/character/1"));
}
