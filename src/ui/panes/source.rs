//! Source code pane rendering with syntax highlighting
//!
//! This module renders the listing of the current scene with basic syntax
//! highlighting and the program counter.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, builtins, strings, and numbers
//! - Current line highlighting with the exact statement span emphasized
//! - Condition outcome shown as a green/red background on the span
//! - Scroll state that keeps the current line at a fixed row

use crate::execution::location::Location;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for the tutorial's Python-like listing
fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Handle comments
        if c == '#' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                let style = get_keyword_style(&current_word, false);
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let is_func = c == '(';
                let style = get_keyword_style(&current_word, is_func);
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "def" | "return" | "if" | "else" | "elif" | "for" | "in" | "while" | "break"
        | "continue" | "and" | "or" | "not" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "True" | "False" | "None" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ => {
            if is_function {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

/// Patch `style` onto the characters in `[start, end)`, splitting spans as needed
fn patch_columns(spans: Vec<Span<'static>>, start: usize, end: usize, style: Style) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut col = 0;

    for span in spans {
        let text: Vec<char> = span.content.chars().collect();
        let span_start = col;
        let span_end = col + text.len();
        col = span_end;

        if span_end <= start || span_start >= end {
            out.push(span);
            continue;
        }

        let cut_a = start.saturating_sub(span_start).min(text.len());
        let cut_b = end.saturating_sub(span_start).min(text.len());
        let pieces = [
            (&text[..cut_a], span.style),
            (&text[cut_a..cut_b], span.style.patch(style)),
            (&text[cut_b..], span.style),
        ];
        for (piece, piece_style) in pieces {
            if !piece.is_empty() {
                out.push(Span::styled(piece.iter().collect::<String>(), piece_style));
            }
        }
    }

    out
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[String],
    pc: Option<Location>,
    condition: Option<bool>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_lines = lines.len();
    let current_line = pc.map_or(0, |loc| loc.line);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Initialize target_line_row to center if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);

        if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            scroll_state.offset = scroll_state.offset.min(max_scroll);
        } else {
            scroll_state.offset = 0;
        }
    }

    let span_style = match condition {
        Some(true) => Style::default().bg(DEFAULT_THEME.condition_true_bg),
        Some(false) => Style::default().bg(DEFAULT_THEME.condition_false_bg),
        None => Style::default().bg(DEFAULT_THEME.span_bg),
    }
    .add_modifier(Modifier::BOLD);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            let marker = if is_current { "▶" } else { " " };

            let mut spans = highlight_source_code(line).spans;
            if let (true, Some(loc)) = (is_current, pc) {
                for span in &mut spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
                let (start, end) = loc.columns(line.chars().count());
                spans = patch_columns(spans, start, end, span_style);
            }

            let mut final_spans = vec![Span::styled(format!("{}{:3} ", marker, line_num), num_style)];
            final_spans.extend(spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_keeps_text() {
        let line = "  if board[0][col] != \" \":";
        let highlighted = highlight_source_code(line);
        let joined: String = highlighted.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_patch_columns_splits_spans() {
        let spans = vec![Span::raw("return"), Span::raw(" "), Span::raw("b")];
        let patched = patch_columns(spans, 3, 8, Style::default().bg(DEFAULT_THEME.span_bg));
        assert_eq!(text(&patched), vec!["ret", "urn", " ", "b"]);
        assert_eq!(patched[1].style.bg, Some(DEFAULT_THEME.span_bg));
        assert_eq!(patched[0].style.bg, None);
    }
}
