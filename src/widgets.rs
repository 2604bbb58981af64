//! Small presentational pieces shared by both screens: a framed pane, a
//! labeled text field, buttons and the image frame.
//!
//! Everything here is stateless. Callers pass the current values and the
//! color scheme; nothing reaches back into `App`.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::ColorScheme;

/// Draw a focus-aware bordered frame and return the **inner** rect.
pub fn pane_frame(
    f: &mut Frame,
    area: Rect,
    colors: &ColorScheme,
    title: &str,
    focused: bool,
) -> Rect {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Double } else { BorderType::Rounded })
        .border_style(
            Style::default()
                .fg(if focused { colors.focus_border } else { colors.unfocused_border })
                .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
        );
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    inner
}

/// Labeled single-line input. Places the cursor when focused.
pub fn text_field(
    f: &mut Frame,
    area: Rect,
    colors: &ColorScheme,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let border = if focused { colors.focus_border } else { colors.unfocused_border };
    let (text, style) = if value.is_empty() && !focused {
        (placeholder, Style::default().fg(colors.text_dim))
    } else {
        (value, Style::default().fg(colors.text))
    };

    let paragraph = Paragraph::new(text).style(style).block(
        Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let w = value.chars().count().min(area.width.saturating_sub(2) as usize) as u16;
        f.set_cursor_position((area.x + 1 + w, area.y + 1));
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Default,
    /// Filled orange, used for the primary action on a screen.
    Dragonball,
}

/// Inline button label: `[key] label`. Disabled buttons are dimmed and crossed.
pub fn button<'a>(
    colors: &ColorScheme,
    key: &'a str,
    label: &'a str,
    variant: ButtonVariant,
    disabled: bool,
) -> Vec<Span<'a>> {
    if disabled {
        let dim = Style::default()
            .fg(colors.unfocused_border)
            .add_modifier(Modifier::CROSSED_OUT);
        return vec![
            Span::styled(format!("[{key}]"), dim),
            Span::styled(format!(" {label} "), dim),
        ];
    }
    match variant {
        ButtonVariant::Default => vec![
            Span::styled(format!("[{key}]"), Style::default().fg(colors.focus_border)),
            Span::styled(format!(" {label} "), Style::default().fg(colors.text)),
        ],
        ButtonVariant::Dragonball => {
            let fill = Style::default()
                .bg(colors.button)
                .fg(colors.button_text)
                .add_modifier(Modifier::BOLD);
            vec![
                Span::styled(format!(" {key} "), fill),
                Span::styled(format!("{label} "), fill),
            ]
        }
    }
}

/// Framed image reference. While `loading`, a spinner replaces the content.
pub fn image_frame(
    f: &mut Frame,
    area: Rect,
    colors: &ColorScheme,
    caption: &str,
    image_url: &str,
    loading: bool,
    spinner: char,
) {
    let inner = pane_frame(f, area, colors, caption, false);
    if inner.height == 0 {
        return;
    }

    let body: Vec<Line> = if loading {
        vec![Line::from(Span::styled(
            format!("{spinner} loading"),
            Style::default().fg(colors.spinner),
        ))]
    } else if image_url.is_empty() {
        vec![Line::from(Span::styled("(no image)", Style::default().fg(colors.text_dim)))]
    } else {
        let file = image_url.rsplit('/').next().unwrap_or(image_url);
        vec![
            Line::from(Span::styled("▣", Style::default().fg(colors.focus_border))),
            Line::from(Span::styled(file.to_string(), Style::default().fg(colors.text))),
            Line::from(Span::styled(image_url.to_string(), Style::default().fg(colors.text_dim))),
        ]
    };

    let top = inner.y + inner.height.saturating_sub(body.len() as u16) / 2;
    let centered = Rect {
        y: top,
        height: inner.height.saturating_sub(top - inner.y),
        ..inner
    };
    let p = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, centered);
}

/// Centered rect of the given percent width and fixed height.
pub fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_button_ignores_variant() {
        let colors = ColorScheme::capsule();
        let a = button(&colors, "n", "Next", ButtonVariant::Dragonball, true);
        let b = button(&colors, "n", "Next", ButtonVariant::Default, true);
        assert_eq!(a, b);
        assert!(a[0].style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn centered_stays_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered(area, 40, 3);
        assert_eq!(r.width, 32);
        assert_eq!(r.height, 3);
        assert!(r.x + r.width <= area.width);
        assert!(r.y + r.height <= area.height);
    }

    #[test]
    fn centered_handles_very_wide_terminals() {
        let area = Rect::new(0, 0, 2000, 50);
        let r = centered(area, 80, 3);
        assert_eq!(r.width, 1600);
        assert_eq!(r.x, 200);
    }
}
