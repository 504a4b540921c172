use crate::memory::heap::PointerSource;
use crate::memory::value::Value;
use crate::snapshot::VisualState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

/// Format a value with styled spans
pub(crate) fn format_value_styled(value: &Value) -> Vec<Span<'static>> {
    match value {
        Value::Int(n) => vec![Span::styled(
            format!("{}", n),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::Str(s) => vec![Span::styled(
            format!("\"{}\"", s),
            Style::default().fg(token_color(s)),
        )],
        Value::Bool(_) => vec![Span::styled(
            value.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD),
        )],
        Value::Empty => vec![Span::styled(
            "None",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::DIM),
        )],
        Value::Container(id) => vec![
            Span::styled("→ ", Style::default().fg(DEFAULT_THEME.pointer)),
            Span::styled(
                format!("{}", id),
                Style::default()
                    .fg(DEFAULT_THEME.pointer)
                    .add_modifier(Modifier::BOLD),
            ),
        ],
    }
}

/// Colour of a board token
pub(crate) fn token_color(token: &str) -> ratatui::style::Color {
    match token {
        "G" => DEFAULT_THEME.player_one,
        "B" => DEFAULT_THEME.player_two,
        _ => DEFAULT_THEME.string,
    }
}

/// Where an arrow starts, as a short label (`game_board`, `#0[3]`)
pub(crate) fn format_pointer_source(source: &PointerSource, state: &VisualState) -> String {
    match source {
        PointerSource::Slot { scope, name } => {
            let label = state
                .scopes
                .iter()
                .find(|s| s.id == *scope)
                .map(|s| s.label.as_str())
                .unwrap_or("?");
            format!("{}.{}", label, name)
        }
        PointerSource::Cell { container, index } => format!("{}[{}]", container, index),
    }
}

/// Split a string at a character boundary, ensuring we don't cut in the middle of a char
pub(crate) fn split_at_char_boundary(s: &str, max_chars: usize) -> (&str, &str) {
    if s.len() <= max_chars {
        return (s, "");
    }

    let mut end = max_chars.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    if end == 0 {
        let first_char_end = s.char_indices().nth(1).map(|(i, _)| i).unwrap_or(s.len());
        (&s[..first_char_end], &s[first_char_end..])
    } else {
        (&s[..end], &s[end..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_char_boundary() {
        assert_eq!(split_at_char_boundary("abc", 5), ("abc", ""));
        assert_eq!(split_at_char_boundary("abcdef", 4), ("abcd", "ef"));
        assert_eq!(split_at_char_boundary("→x", 1), ("→", "x"));
    }
}
