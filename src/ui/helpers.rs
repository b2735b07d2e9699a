use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Rank, RankedPlayer};

/// The latest score change, flashed on the affected card until it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoreChange {
    pub(crate) player_id: i64,
    pub(crate) delta: i64,
}

/// Crown glyph and colour for a rank: gold for first, silver for second.
pub(crate) fn crown_span(rank: Rank) -> Span<'static> {
    let color = match rank {
        Rank::First => Color::Yellow,
        Rank::Second => Color::Gray,
    };
    Span::styled(
        "♛ ",
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Signed delta with an explicit plus for gains.
pub(crate) fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Card title: optional crown followed by the player's name.
pub(crate) fn card_title(row: &RankedPlayer<'_>) -> Line<'static> {
    let mut spans = Vec::with_capacity(2);
    if let Some(rank) = row.rank {
        spans.push(crown_span(rank));
    }
    spans.push(Span::raw(row.player.name.clone()));
    Line::from(spans)
}

/// Body lines of a player card: score, the flashing delta and the score
/// before the last change (when known), then the avatar link.
pub(crate) fn card_lines(
    row: &RankedPlayer<'_>,
    change: Option<ScoreChange>,
    previous: Option<i64>,
    selected: bool,
) -> Vec<Line<'static>> {
    let score_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(row.player.score.to_string(), score_style)),
    ];

    let mut history = Vec::with_capacity(2);
    if let Some(change) = change.filter(|change| change.player_id == row.player.id) {
        let color = if change.delta > 0 { Color::Green } else { Color::Red };
        history.push(Span::styled(
            format!("{} ", format_delta(change.delta)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(previous) = previous {
        history.push(Span::styled(
            format!("(was {previous})"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(history));

    lines.push(Line::from(Span::styled(
        row.player.avatar_url.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most specific message from an error's source chain.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}
