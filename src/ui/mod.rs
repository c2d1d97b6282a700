//! Rendering: header with search box, directory list (rows or cards), details
//! pane, status bar and modals.
//!
pub mod components;
pub mod directory;
pub mod forms;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, ViewMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
        .split(root[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)].as_ref())
        .split(body[1]);

    render_header(f, root[0], app);

    if app.visible.is_empty() {
        directory::render_empty_state(f, body[0], app);
    } else {
        match app.view_mode {
            ViewMode::Rows => directory::render_rows(f, body[0], app),
            ViewMode::Cards => directory::render_cards(f, body[0], app),
        }
    }
    directory::render_details(f, right[0], app);
    directory::render_filter_summary(f, right[1], app);

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let searching = app.input_mode == InputMode::Search;
    let query_style = if searching {
        Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };
    let query = if searching {
        format!("{}_", app.criteria.name_query)
    } else if app.criteria.name_query.is_empty() {
        "(press / to search by name)".to_string()
    } else {
        app.criteria.name_query.clone()
    };
    let line = Line::from(vec![
        Span::raw("Search: "),
        Span::styled(query, query_style),
        Span::raw(format!(
            "   showing {} of {}   sort: {} ({})",
            app.visible.len(),
            app.store.len(),
            app.sort.key.label(),
            app.sort.order.label().to_lowercase(),
        )),
    ]);
    let p = Paragraph::new(line)
        .block(
            Block::default()
                .title("Influencer Directory")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = &app.modal else {
        return;
    };
    match state {
        ModalState::Actions { selected } => forms::render_actions_modal(f, area, app, *selected),
        ModalState::Form(form) => forms::render_form_modal(f, area, app, form),
        ModalState::DeleteConfirm { name, selected, .. } => {
            forms::render_delete_modal(f, area, app, name, *selected)
        }
        ModalState::FilterMenu { selected } => {
            components::render_filter_modal(f, area, app, *selected)
        }
        ModalState::SortMenu { selected } => components::render_sort_modal(f, area, app, *selected),
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
