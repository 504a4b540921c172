//! Trace pane: the intents of the scene, with the current step's descriptors expanded

use crate::snapshot::SnapshotManager;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// Render the trace pane. `scroll_offset` is clamped; `usize::MAX` follows the current step.
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    history: &SnapshotManager,
    position: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    // Snapshot memory against the history's limit
    const MIB: f64 = 1024.0 * 1024.0;
    let title = format!(
        " Trace ({:.1} / {:.0} MiB) ",
        history.memory_usage() as f64 / MIB,
        history.memory_limit() as f64 / MIB
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let mut all_items = Vec::new();
    let mut current_row = 0;

    for index in 0..history.len() {
        let Some(snapshot) = history.get(index) else {
            break;
        };
        let is_current = index == position;
        let label = match snapshot.step {
            Some(step) => format!("{:>4} ", step),
            None => "   - ".to_string(),
        };

        let (num_style, text_style) = if is_current {
            current_row = all_items.len();
            (
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                Style::default().fg(DEFAULT_THEME.comment),
                Style::default().fg(DEFAULT_THEME.fg),
            )
        };

        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(label, num_style),
            Span::styled(snapshot.intent.clone(), text_style),
        ])));

        if is_current {
            for descriptor in &snapshot.descriptors {
                all_items.push(ListItem::new(Line::from(vec![
                    Span::styled("       · ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(
                        descriptor.to_string(),
                        Style::default().fg(DEFAULT_THEME.muted_function),
                    ),
                ])));
            }
        }
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if *scroll_offset == usize::MAX {
        // Keep the current step a few rows from the top
        *scroll_offset = current_row.saturating_sub(2);
    }
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
