//! Variables pane: one shelf per scope, laid out the way the scene places slots
//!
//! The global shelf comes first, then one shelf per active call. Slots are
//! drawn row by row using each scope's `slots_per_row`, so a frame with two
//! slots per row shows `col` and `player` side by side. Running loops are
//! listed below the shelves with their expanded range.

use super::utils::{format_value_styled, split_at_char_boundary};
use crate::snapshot::{VisualScope, VisualState};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the variables pane
pub struct StackScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Render the variables pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    state: &VisualState,
    source_lines: &[String],
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(2) as usize; // borders only
    let mut all_items = Vec::new();

    if state.scopes.is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    for (depth, scope) in state.scopes.iter().enumerate() {
        all_items.push(ListItem::new(frame_header(depth, scope)));

        // Call site that created this frame
        if depth > 0 {
            if let Some(site) = state.call_sites.get(depth - 1) {
                let call_text = source_lines
                    .get(site.line.saturating_sub(1))
                    .map(|l| l.trim())
                    .unwrap_or("???");
                let prefix = format!("  ↪ [{}] ", depth - 1);
                let (shown, _) =
                    split_at_char_boundary(call_text, content_width.saturating_sub(prefix.len()));
                all_items.push(ListItem::new(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(
                        shown.to_string(),
                        Style::default().fg(DEFAULT_THEME.muted_function),
                    ),
                ])));
            }
        }

        all_items.extend(shelf_rows(scope).into_iter().map(ListItem::new));
    }

    if let Some(value) = &state.last_return {
        let mut spans = vec![
            Span::styled(
                "  ↖ return ",
                Style::default()
                    .fg(DEFAULT_THEME.return_value)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": ", Style::default().fg(DEFAULT_THEME.return_value)),
        ];
        spans.extend(format_value_styled(value));
        all_items.push(ListItem::new(Line::from(spans)));
    }

    if !state.loops.is_empty() {
        all_items.push(ListItem::new(Line::from(Span::styled(
            "▸ Loops",
            Style::default().fg(DEFAULT_THEME.secondary),
        ))));
        for running in &state.loops {
            let mut spans = vec![Span::styled(
                format!("  {} in [", running.var),
                Style::default().fg(DEFAULT_THEME.fg),
            )];
            for (i, v) in running.values.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(", "));
                }
                // The value the variable currently holds is the last one visited
                let style = if i + 1 == running.visited {
                    Style::default()
                        .fg(DEFAULT_THEME.number)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else if i < running.visited {
                    Style::default().fg(DEFAULT_THEME.comment)
                } else {
                    Style::default().fg(DEFAULT_THEME.number)
                };
                spans.push(Span::styled(v.to_string(), style));
            }
            spans.push(Span::raw("]"));
            all_items.push(ListItem::new(Line::from(spans)));
        }
    }

    // Calculate visible range for scrolling
    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Smart auto-scroll: scroll to bottom only when content grows
    if total_items > scroll_state.prev_item_count {
        if total_items > visible_height {
            scroll_state.offset = total_items - visible_height;
        } else {
            scroll_state.offset = 0;
        }
    } else if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        scroll_state.offset = scroll_state.offset.min(max_scroll);
    } else {
        scroll_state.offset = 0;
    }

    scroll_state.prev_item_count = total_items;

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}

fn frame_header(depth: usize, scope: &VisualScope) -> Line<'static> {
    let name = if depth == 0 {
        scope.label.clone()
    } else {
        format!("{}()", scope.label)
    };
    Line::from(vec![
        Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
        Span::styled(
            format!("Frame {} ", depth),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            name,
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// One line per layout row, slots side by side
fn shelf_rows(scope: &VisualScope) -> Vec<Line<'static>> {
    let rows = scope
        .slots
        .iter()
        .map(|s| s.position.row + 1)
        .max()
        .unwrap_or(0);

    (0..rows)
        .map(|row| {
            let mut in_row: Vec<_> = scope
                .slots
                .iter()
                .filter(|s| s.position.row == row)
                .collect();
            in_row.sort_by_key(|s| s.position.column);

            let mut spans = vec![Span::raw("    ")];
            for (i, slot) in in_row.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("  │  ", Style::default().fg(DEFAULT_THEME.comment)));
                }
                spans.push(Span::styled(
                    format!("{}: ", slot.name),
                    Style::default().fg(DEFAULT_THEME.fg),
                ));
                spans.extend(format_value_styled(&slot.value));
            }
            Line::from(spans)
        })
        .collect()
}
