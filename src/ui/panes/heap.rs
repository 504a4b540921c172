//! Heap pane rendering: lists, their cells, and the arrows pointing at them
//!
//! Lists are shown in creation order. Each header names every slot or cell
//! whose arrow ends at that list, which is how aliasing (`game_board` and
//! `board` sharing one list) becomes visible. A list of lists is drawn one
//! row per cell with a preview of the row it points to, so the game board
//! reads as a grid.

use super::utils::{format_pointer_source, format_value_styled, token_color};
use crate::memory::value::Value;
use crate::snapshot::{VisualList, VisualState};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the heap pane
pub struct HeapScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    state: &VisualState,
    is_focused: bool,
    scroll_state: &mut HeapScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Heap Lists ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut all_items = Vec::new();

    if state.lists.is_empty() {
        all_items.push(ListItem::new("(no lists)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    for list in &state.lists {
        all_items.push(ListItem::new(list_header(list, state)));

        if list.items.iter().any(Value::is_container) {
            for (index, item) in list.items.iter().enumerate() {
                let mut spans = vec![Span::styled(
                    format!("    [{}] ", index),
                    Style::default().fg(DEFAULT_THEME.comment),
                )];
                spans.extend(format_value_styled(item));
                if let Some(row) = item
                    .as_container()
                    .and_then(|id| state.lists.iter().find(|l| l.id == id))
                {
                    spans.push(Span::raw("   "));
                    spans.extend(cells(row));
                }
                all_items.push(ListItem::new(Line::from(spans)));
            }
        } else if !list.items.is_empty() {
            let mut spans = vec![Span::raw("    ")];
            spans.extend(cells(list));
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

fn list_header(list: &VisualList, state: &VisualState) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{}", list.id),
            Style::default()
                .fg(DEFAULT_THEME.pointer)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  len {}", list.items.len()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ];

    let sources: Vec<String> = state
        .pointers_to(list.id)
        .into_iter()
        .map(|p| format_pointer_source(&p.source, state))
        .collect();
    if !sources.is_empty() {
        spans.push(Span::styled("  ← ", Style::default().fg(DEFAULT_THEME.pointer)));
        spans.push(Span::styled(
            sources.join(", "),
            Style::default().fg(DEFAULT_THEME.fg),
        ));
    }

    Line::from(spans)
}

/// A flat list drawn as a strip of cells; blanks show as `·`
fn cells(list: &VisualList) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled("│", Style::default().fg(DEFAULT_THEME.comment))];
    for item in &list.items {
        let cell = match item {
            Value::Str(s) if s.trim().is_empty() => {
                Span::styled(" · ", Style::default().fg(DEFAULT_THEME.comment))
            }
            Value::Str(s) => Span::styled(
                format!(" {} ", s),
                Style::default()
                    .fg(token_color(s))
                    .add_modifier(Modifier::BOLD),
            ),
            other => Span::styled(
                format!(" {} ", other),
                Style::default().fg(DEFAULT_THEME.number),
            ),
        };
        spans.push(cell);
        spans.push(Span::styled("│", Style::default().fg(DEFAULT_THEME.comment)));
    }
    spans
}
