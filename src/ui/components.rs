//! Shared UI components (status bar, menus, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, describe_action};
use crate::app::update::{FILTER_ITEMS, FilterItem, SORT_OPTIONS};
use crate::app::{AppState, InputMode, ViewMode};
use crate::view::SortSpec;

/// Render the bottom status bar: mode and counts, or the current notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(notice) = &app.notice {
        let color = if notice.destructive {
            app.theme.danger
        } else {
            app.theme.success
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", notice.title),
                Style::default()
                    .fg(app.theme.status_bg)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", notice.message)),
        ]);
        let p = Paragraph::new(line).style(
            Style::default()
                .fg(app.theme.status_fg)
                .bg(app.theme.status_bg),
        );
        f.render_widget(p, area);
        return;
    }

    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let view = match app.view_mode {
        ViewMode::Rows => "rows",
        ViewMode::Cards => "cards",
    };
    let help = app
        .keymap
        .keys_for(KeyAction::OpenHelp)
        .into_iter()
        .next()
        .unwrap_or_else(|| "?".to_string());
    let msg = format!(
        "mode: {mode}  view: {view}  {}/{} shown  {help}: help",
        app.visible.len(),
        app.store.len(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    // Compute a sensible max width and height; wrap long text
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 48u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Help modal built from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 76u16.min(area.width.saturating_sub(4)).max(40);
    let height = 26u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:<26}")),
            Span::styled(keys, italic),
        ])
    };
    let keys = |action: KeyAction| {
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            "(unbound)".to_string()
        } else {
            keys.join(", ")
        }
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Directory", bold))];
    for action in [
        KeyAction::StartSearch,
        KeyAction::OpenFilterMenu,
        KeyAction::OpenSortMenu,
        KeyAction::ToggleSortOrder,
        KeyAction::ResetFilters,
        KeyAction::ToggleViewMode,
        KeyAction::NewInfluencer,
        KeyAction::EnterAction,
        KeyAction::EditSelection,
        KeyAction::DeleteSelection,
        KeyAction::OpenHelp,
        KeyAction::Quit,
    ] {
        lines.push(row(describe_action(action), keys(action)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Navigation", bold)));
    for action in [
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::MoveTop,
        KeyAction::MoveBottom,
    ] {
        lines.push(row(describe_action(action), keys(action)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search and forms", bold)));
    lines.push(row("Keep search", "Enter".to_string()));
    lines.push(row("Cancel search", "Esc (restores previous)".to_string()));
    lines.push(row("Next / previous field", "Tab, Down / Shift+Tab, Up".to_string()));
    lines.push(row("Toggle choice", "Space, Left, Right".to_string()));
    lines.push(row("Close dialog", "Esc".to_string()));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Tier, platform and score filters with live checkboxes.
pub fn render_filter_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let width = 52u16.min(area.width.saturating_sub(4)).max(36);
    let height = (FILTER_ITEMS.len() as u16 + 5).min(area.height);
    let rect = centered_rect(width, height, area);
    let c = &app.criteria;

    let mut lines: Vec<Line> = Vec::new();
    for (idx, item) in FILTER_ITEMS.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        let text = match item {
            FilterItem::Tier(t) => {
                let mark = if c.tiers.contains(t) { "[x]" } else { "[ ]" };
                format!("{mark} {} tier", t.label())
            }
            FilterItem::Platform(p) => {
                let mark = if c.platforms.contains(p) { "[x]" } else { "[ ]" };
                format!("{mark} {}", p.label())
            }
            FilterItem::MinScore => format!("    Min score: < {:>3} >", c.score_range.min()),
            FilterItem::MaxScore => format!("    Max score: < {:>3} >", c.score_range.max()),
            FilterItem::Reset => "    Reset all filters".to_string(),
        };
        let style = if idx == selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("{marker} {text}"), style)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Space: toggle  Left/Right: score  Esc: close",
        Style::default().fg(app.theme.muted),
    )));
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(format!("Filters ({} match)", app.visible.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_sort_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(40, SORT_OPTIONS.len() as u16 + 2, area);
    let mut text = String::new();
    for (idx, (key, order, label)) in SORT_OPTIONS.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        let current = if SortSpec::new(*key, *order) == app.sort {
            " *"
        } else {
            ""
        };
        text.push_str(&format!("{marker} {label}{current}\n"));
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title("Sort by")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
