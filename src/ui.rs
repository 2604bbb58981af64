use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::fetch_state::FetchState;
use crate::router::Route;
use crate::screens::{Card, DetailScreen, GenerationStatus, ListScreen};
use crate::selection::Form;
use crate::theme::{card_text_colors, race_color, ColorScheme};
use crate::util_text::{format_ki, truncate};
use crate::widgets::{self, button, image_frame, pane_frame, text_field, ButtonVariant};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 15;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    app.tick_spinner();

    let on_list = *app.route() == Route::List;
    let show_debug = app.debug_visible() && !app.debug_log().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(1)); // header
    if on_list {
        constraints.push(Constraint::Length(3)); // search field
    }
    constraints.push(Constraint::Min(0)); // body
    if show_debug {
        constraints.push(Constraint::Length(6));
    }
    constraints.push(Constraint::Length(1)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app);
    idx += 1;
    if on_list {
        search_bar(f, chunks[idx], app);
        idx += 1;
    }
    body(f, chunks[idx], app);
    idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app);
        idx += 1;
    }
    footer(f, chunks[idx], app);

    if app.toast_message().is_some() {
        draw_toast_modal(f, app);
    }
}

// ===============================
// Header / search
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let c = app.colors();
    let title = match app.route() {
        Route::List => "Characters".to_string(),
        Route::Character { id } => match app.detail().and_then(|d| d.character().data()) {
            Some(ch) => format!("Characters › {}", ch.name),
            None => format!("Characters › #{id}"),
        },
    };
    let line = Line::from(vec![
        Span::styled(
            " ● kiscope ",
            Style::default().fg(c.focus_border).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(title, Style::default().fg(c.text)),
        Span::styled(format!("  {}", app.route().path()), Style::default().fg(c.text_dim)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn search_bar(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.input_mode() == InputMode::Search;
    text_field(
        f,
        area,
        app.colors(),
        "Search",
        app.list().query(),
        "(Press / to search characters by name)",
        focused,
    );
}

// ===============================
// Body
// ===============================
fn body(f: &mut Frame, area: Rect, app: &App) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        too_small(f, area, app.colors());
        return;
    }

    match app.route() {
        Route::List => render_list(f, area, app.list(), app.colors(), app.spinner_char()),
        Route::Character { .. } => match app.detail() {
            Some(d) => render_detail(f, area, d, app.colors(), app.spinner_char()),
            None => status_message(f, area, app.colors(), "Character not loaded", false),
        },
    }
}

fn too_small(f: &mut Frame, area: Rect, c: &ColorScheme) {
    let warning_text = format!(
        "Terminal too small!\n\nMinimum size: {MIN_WIDTH}×{MIN_HEIGHT}\n\
         Current size: {}×{}\n\nPlease resize your terminal.",
        area.width, area.height
    );
    let warning = Paragraph::new(warning_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(c.error).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(c.error)),
        );
    f.render_widget(warning, widgets::centered(area, 80, 8));
}

/// One centered line for loading or error states. These replace content.
fn status_message(f: &mut Frame, area: Rect, c: &ColorScheme, msg: &str, is_error: bool) {
    let style = if is_error {
        Style::default().fg(c.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(c.spinner)
    };
    let p = Paragraph::new(msg)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, widgets::centered(area, 80, 3));
}

// ===============================
// List screen
// ===============================
fn render_list(f: &mut Frame, area: Rect, list: &ListScreen, c: &ColorScheme, spinner: char) {
    let cards = match list.results() {
        FetchState::Idle => {
            status_message(f, area, c, "Press / to search", false);
            return;
        }
        FetchState::Loading => {
            status_message(f, area, c, &format!("{spinner} Searching…"), false);
            return;
        }
        FetchState::Failed(msg) => {
            status_message(f, area, c, &format!("{msg}\n\nPress r to retry"), true);
            return;
        }
        FetchState::Loaded(cards) => cards,
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let inner = pane_frame(f, cols[0], c, &format!("Results ({})", cards.len()), true);
    let width = inner.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = cards.iter().map(|card| card_item(card, width)).collect();

    let mut st = ListState::default();
    if !cards.is_empty() {
        st.select(Some(list.selected().min(cards.len() - 1)));
    }
    let widget = List::new(items)
        .highlight_symbol("▌ ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_stateful_widget(widget, inner, &mut st);

    match list.selected_card() {
        Some(card) => card_preview(f, cols[1], card, c),
        None => {
            pane_frame(f, cols[1], c, "Preview", false);
        }
    }
}

/// A race-colored card: name on top, stats below.
fn card_item(card: &Card, width: usize) -> ListItem<'static> {
    let base = card.base();
    let shown = card.shown();
    let bg = race_color(&base.race);
    let (fg, fg_strong) = card_text_colors(bg);
    let plain = Style::default().bg(bg.to_color()).fg(fg);
    let strong = Style::default()
        .bg(bg.to_color())
        .fg(fg_strong)
        .add_modifier(Modifier::BOLD);

    let pad = |s: String| format!("{s:<width$}");
    let name = match card.form {
        Form::Base => shown.name.to_string(),
        Form::Variant(i) => format!("{} ({}/{})", shown.name, i + 1, card.transformation_count()),
    };
    let stats = format!(
        " {} · Ki {} · Max {}",
        base.race,
        format_ki(shown.ki),
        format_ki(&base.max_ki)
    );
    let meta = format!(" {} · {}", base.gender, base.affiliation);

    ListItem::new(vec![
        Line::from(Span::styled(pad(truncate(&format!(" {name}"), width)), strong)),
        Line::from(Span::styled(pad(truncate(&stats, width)), plain)),
        Line::from(Span::styled(pad(truncate(&meta, width)), plain)),
        Line::from(""),
    ])
}

fn card_preview(f: &mut Frame, area: Rect, card: &Card, c: &ColorScheme) {
    let shown = card.shown();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    image_frame(f, rows[0], c, shown.name, shown.image, false, ' ');

    let len = card.transformation_count();
    let mut spans = button(c, "←", "Prev", ButtonVariant::Default, !card.form.can_prev());
    spans.push(Span::raw(" "));
    spans.extend(button(c, "→", "Next", ButtonVariant::Default, !card.form.can_next(len)));
    if card.detail.is_none() {
        spans.push(Span::styled(" open for forms", Style::default().fg(c.text_dim)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), rows[1]);

    let open = button(c, "Enter", "Open", ButtonVariant::Dragonball, false);
    f.render_widget(Paragraph::new(Line::from(open)), rows[2]);
}

// ===============================
// Detail screen
// ===============================
fn render_detail(f: &mut Frame, area: Rect, d: &DetailScreen, c: &ColorScheme, spinner: char) {
    let ch = match d.character() {
        FetchState::Idle | FetchState::Loading => {
            let rows = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(area);
            image_frame(f, rows[0], c, "Loading", "", true, spinner);
            status_message(f, rows[1], c, &format!("{spinner} Loading character…"), false);
            return;
        }
        FetchState::Failed(msg) => {
            status_message(f, area, c, &format!("{msg}\n\nPress r to retry, Esc to go back"), true);
            return;
        }
        FetchState::Loaded(ch) => ch,
    };
    let Some(shown) = d.shown() else {
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(cols[0]);

    image_frame(f, left[0], c, shown.name, shown.image, false, spinner);

    let len = ch.transformations.len();
    let mut nav = button(c, "←", "Prev", ButtonVariant::Default, !d.can_prev());
    nav.push(Span::raw(" "));
    nav.extend(button(c, "→", "Next", ButtonVariant::Default, !d.can_next()));
    if let Form::Variant(i) = d.form() {
        nav.push(Span::styled(format!(" {}/{len}", i + 1), Style::default().fg(c.text_dim)));
    }
    f.render_widget(Paragraph::new(Line::from(nav)), left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(6)])
        .split(cols[1]);

    // Facts
    let bg = race_color(&ch.race);
    let label = |s: &'static str| Span::styled(s, Style::default().fg(c.text_dim));
    let mut facts = vec![
        Line::from(Span::styled(
            shown.name.to_string(),
            Style::default().fg(bg.to_color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![label("Race         "), Span::raw(ch.race.clone())]),
        Line::from(vec![label("Ki           "), Span::raw(format_ki(shown.ki))]),
        Line::from(vec![label("Max Ki       "), Span::raw(format_ki(&ch.max_ki))]),
        Line::from(vec![label("Gender       "), Span::raw(ch.gender.clone())]),
        Line::from(vec![label("Affiliation  "), Span::raw(ch.affiliation.clone())]),
    ];
    if let Some(p) = &ch.origin_planet {
        let destroyed = if p.is_destroyed { " (destroyed)" } else { "" };
        facts.push(Line::from(vec![
            label("Planet       "),
            Span::raw(format!("{}{destroyed}", p.name)),
        ]));
    }
    let inner = pane_frame(f, right[0], c, "Profile", false);
    f.render_widget(Paragraph::new(facts).wrap(Wrap { trim: true }), inner);

    // Base description and AI description share the lower pane.
    let inner = pane_frame(f, right[1], c, "Description", true);
    let mut lines: Vec<Line> = ch
        .description
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(c.text))))
        .collect();
    lines.push(Line::from(""));
    lines.push(ai_actions(d, c, spinner));
    match d.generation() {
        GenerationStatus::Failed(msg) => {
            lines.push(Line::from(Span::styled(msg.clone(), Style::default().fg(c.error))));
        }
        GenerationStatus::Generating => {
            lines.push(Line::from(Span::styled(
                format!("{spinner} Generating description…"),
                Style::default().fg(c.spinner),
            )));
        }
        GenerationStatus::Idle => {}
    }
    if let Some(err) = d.speech_error() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(c.error))));
    }
    if let Some(text) = d.description() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "✦ AI description",
            Style::default().fg(c.focus_border).add_modifier(Modifier::BOLD),
        )));
        lines.extend(text.lines().map(|l| Line::from(l.to_string())));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn ai_actions<'a>(d: &DetailScreen, c: &'a ColorScheme, spinner: char) -> Line<'a> {
    let mut spans = button(
        c,
        "g",
        if d.is_generating() { "Generating" } else { "Generate AI description" },
        ButtonVariant::Dragonball,
        d.is_generating(),
    );
    spans.push(Span::raw("  "));
    let has_text = d.description().is_some();
    let speak_label = if d.is_speaking() {
        "Stop"
    } else if d.speech_pending() {
        "Starting"
    } else {
        "Listen"
    };
    spans.extend(button(
        c,
        "s",
        speak_label,
        ButtonVariant::Default,
        !has_text && !d.speech_pending(),
    ));
    if d.is_speaking() {
        spans.push(Span::styled(format!(" {spinner}"), Style::default().fg(c.spinner)));
    }
    Line::from(spans)
}

// ===============================
// Footer / debug / toast
// ===============================
fn footer(f: &mut Frame, area: Rect, app: &App) {
    let c = app.colors();
    let key = |k: &'static str| Span::styled(k, Style::default().fg(c.focus_border));
    let mut spans: Vec<Span> = Vec::with_capacity(24);

    match (app.route(), app.input_mode()) {
        (_, InputMode::Search) => {
            spans.extend([key("Enter"), Span::raw(" search │ ")]);
            spans.extend([key("Esc"), Span::raw(" cancel │ ")]);
            spans.extend([key("Ctrl+U"), Span::raw(" clear")]);
        }
        (Route::List, InputMode::Normal) => {
            spans.extend([key("/"), Span::raw(" search │ ")]);
            spans.extend([key("↑/↓"), Span::raw(" move │ ")]);
            spans.extend([key("←/→"), Span::raw(" form │ ")]);
            spans.extend([key("Enter"), Span::raw(" open │ ")]);
            spans.extend([key("r"), Span::raw(" retry │ ")]);
            spans.extend([key("q"), Span::raw(" quit")]);
        }
        (Route::Character { .. }, InputMode::Normal) => {
            spans.extend([key("Esc"), Span::raw(" back │ ")]);
            spans.extend([key("←/→"), Span::raw(" form │ ")]);
            spans.extend([key("g"), Span::raw(" generate │ ")]);
            spans.extend([key("s"), Span::raw(" speak │ ")]);
            spans.extend([key("r"), Span::raw(" reload │ ")]);
            spans.extend([key("q"), Span::raw(" quit")]);
        }
    }

    if app.debug_visible() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("[DEBUG]", Style::default().fg(c.debug_indicator)));
    }
    spans.push(Span::raw(format!(" │ FPS {}", app.fps())));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let c = app.colors();
    let log = app.debug_log();
    let lines_to_show = area.height.saturating_sub(2) as usize;
    let start = log.len().saturating_sub(lines_to_show);
    let lines: Vec<Line> = log[start..]
        .iter()
        .map(|msg| Line::from(Span::raw(msg.as_str())))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(c.text_dim))
        .block(
            Block::default()
                .title(" Debug ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(c.text_dim)),
        );
    f.render_widget(paragraph, area);
}

fn draw_toast_modal(f: &mut Frame, app: &App) {
    let c = app.colors();
    let message = app.toast_message().unwrap_or("");
    let overlay = widgets::centered(f.area(), 40, 3);

    f.render_widget(Clear, overlay);
    let text = Paragraph::new(message.to_string())
        .style(Style::default().fg(c.toast).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(c.toast)),
        );
    f.render_widget(text, overlay);
}
