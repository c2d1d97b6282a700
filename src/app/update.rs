//! Event loop and key dispatch.
//!
//! [`handle_key`] is the single entry for keyboard input; [`tick`] drains
//! background picture loads and expires notices. Both are independent of the
//! terminal so they can be driven directly from tests.
//!
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::app::form::{FormOutcome, FormSubmission, InfluencerForm};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::model::{Platform, Score, Tier};
use crate::view::{SortKey, SortOrder, SortSpec};
use crate::ui;

/// Entries of the per-record actions menu.
pub const ACTION_ITEMS: [&str; 2] = ["Edit", "Delete"];

/// Entries of the sort menu.
pub const SORT_OPTIONS: [(SortKey, SortOrder, &str); 4] = [
    (SortKey::DateAdded, SortOrder::Desc, "Date added, newest first"),
    (SortKey::DateAdded, SortOrder::Asc, "Date added, oldest first"),
    (SortKey::Score, SortOrder::Desc, "Score, highest first"),
    (SortKey::Score, SortOrder::Asc, "Score, lowest first"),
];

/// Rows of the filter menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterItem {
    Tier(Tier),
    Platform(Platform),
    MinScore,
    MaxScore,
    Reset,
}

pub const FILTER_ITEMS: [FilterItem; 7] = [
    FilterItem::Tier(Tier::Gold),
    FilterItem::Tier(Tier::Silver),
    FilterItem::Platform(Platform::Instagram),
    FilterItem::Platform(Platform::YouTube),
    FilterItem::MinScore,
    FilterItem::MaxScore,
    FilterItem::Reset,
];

/// Whether the loop should keep running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }

        tick(app, Instant::now());
    }

    info!(uptime_secs = app.started_at.elapsed().as_secs(), "leaving event loop");
    Ok(())
}

/// Apply finished picture loads to the open form and expire old notices.
pub fn tick(app: &mut AppState, now: Instant) {
    if let Some(loaded) = app.pictures.poll() {
        match &mut app.modal {
            Some(ModalState::Form(form)) => {
                if !form.apply_picture(loaded) {
                    debug!("picture result not meant for the open form");
                }
            }
            _ => debug!("picture result arrived with no form open"),
        }
    }
    app.expire_notice(now);
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    let rpp = app.rows_per_page.max(1) as isize;
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => {
            app.search_backup = app.criteria.name_query.clone();
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewInfluencer => {
            app.open_modal(ModalState::Form(Box::new(InfluencerForm::new_add())));
        }
        KeyAction::EditSelection => open_edit_form(app),
        KeyAction::DeleteSelection => open_delete_confirm(app),
        KeyAction::OpenFilterMenu => app.open_modal(ModalState::FilterMenu { selected: 0 }),
        KeyAction::OpenSortMenu => {
            let selected = SORT_OPTIONS
                .iter()
                .position(|(k, o, _)| SortSpec::new(*k, *o) == app.sort)
                .unwrap_or(0);
            app.open_modal(ModalState::SortMenu { selected });
        }
        KeyAction::ToggleSortOrder => {
            app.sort.order = app.sort.order.toggled();
            app.refresh_view();
            app.save_prefs();
        }
        KeyAction::ToggleViewMode => {
            app.view_mode = app.view_mode.toggled();
            app.save_prefs();
        }
        KeyAction::ResetFilters => app.reset_filters(),
        KeyAction::EnterAction => {
            if app.selected().is_some() {
                app.open_modal(ModalState::Actions { selected: 0 });
            }
        }
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-rpp),
        KeyAction::PageDown => app.move_selection(rpp),
        KeyAction::MoveTop => app.select_first(),
        KeyAction::MoveBottom => app.select_last(),
    }
    Flow::Continue
}

/// Live name search: every keystroke refilters, Esc restores the previous query.
fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.criteria.name_query = std::mem::take(&mut app.search_backup);
            app.input_mode = InputMode::Normal;
            app.refresh_view();
        }
        KeyCode::Backspace => {
            app.criteria.name_query.pop();
            app.refresh_view();
        }
        KeyCode::Char(c) => {
            app.criteria.name_query.push(c);
            app.refresh_view();
        }
        _ => {}
    }
}

fn open_edit_form(app: &mut AppState) {
    if let Some(record) = app.selected() {
        let form = InfluencerForm::new_edit(record);
        app.open_modal(ModalState::Form(Box::new(form)));
    }
}

fn open_delete_confirm(app: &mut AppState) {
    if let Some(record) = app.selected() {
        let modal = ModalState::DeleteConfirm {
            id: record.id.clone(),
            name: record.name.clone(),
            selected: 1,
        };
        app.open_modal(modal);
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Actions { selected }) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(ACTION_ITEMS.len() - 1)
            }
            KeyCode::Enter => match *selected {
                0 => open_edit_form(app),
                _ => open_delete_confirm(app),
            },
            _ => {}
        },
        Some(ModalState::Form(form)) => {
            let outcome = form.handle_key(code);
            handle_form_outcome(app, outcome);
        }
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Char('y') => {
                let id = id.clone();
                confirm_delete(app, &id);
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    let id = id.clone();
                    confirm_delete(app, &id);
                } else {
                    app.close_modal();
                }
            }
            _ => {}
        },
        Some(ModalState::FilterMenu { selected }) => {
            let item = FILTER_ITEMS[(*selected).min(FILTER_ITEMS.len() - 1)];
            match code {
                KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => app.close_modal(),
                KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    *selected = (*selected + 1).min(FILTER_ITEMS.len() - 1)
                }
                KeyCode::Enter | KeyCode::Char(' ') => activate_filter_item(app, item),
                KeyCode::Left | KeyCode::Char('h') => step_score_bound(app, item, -1),
                KeyCode::Right | KeyCode::Char('l') => step_score_bound(app, item, 1),
                KeyCode::PageDown => step_score_bound(app, item, -10),
                KeyCode::PageUp => step_score_bound(app, item, 10),
                _ => {}
            }
        }
        Some(ModalState::SortMenu { selected }) => match code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(SORT_OPTIONS.len() - 1)
            }
            KeyCode::Enter => {
                let (key, order, _) = SORT_OPTIONS[(*selected).min(SORT_OPTIONS.len() - 1)];
                app.sort = SortSpec::new(key, order);
                app.refresh_view();
                app.save_prefs();
                app.close_modal();
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => app.close_modal(),
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(10),
            KeyCode::PageDown => *scroll = scroll.saturating_add(10),
            _ => {}
        },
        None => app.close_modal(),
    }
}

fn handle_form_outcome(app: &mut AppState, outcome: FormOutcome) {
    match outcome {
        FormOutcome::Continue => {}
        FormOutcome::Cancel => app.close_modal(),
        FormOutcome::LoadPicture(path) => {
            let ticket = app.pictures.request(path);
            if let Some(ModalState::Form(form)) = &mut app.modal {
                form.begin_picture_load(ticket);
            }
        }
        FormOutcome::Submit => submit_form(app),
    }
}

fn submit_form(app: &mut AppState) {
    let Some(ModalState::Form(form)) = &mut app.modal else {
        return;
    };
    let submission = match form.submit() {
        Ok(s) => s,
        Err(e) => {
            form.error = Some(e.to_string());
            return;
        }
    };
    let result = match submission {
        FormSubmission::Create(input) => app.add_influencer(input),
        FormSubmission::Update(record) => app.update_influencer(record),
    };
    match result {
        Ok(_) => app.close_modal(),
        Err(e) => {
            warn!(error = %e, "form submission rejected");
            app.pictures.cancel();
            app.modal = Some(ModalState::Info { message: e.to_string() });
        }
    }
}

fn confirm_delete(app: &mut AppState, id: &crate::model::InfluencerId) {
    match app.delete_influencer(id) {
        Ok(_) => app.close_modal(),
        Err(e) => {
            warn!(error = %e, "delete failed");
            app.modal = Some(ModalState::Info { message: e.to_string() });
        }
    }
}

fn activate_filter_item(app: &mut AppState, item: FilterItem) {
    match item {
        FilterItem::Tier(t) => app.criteria.toggle_tier(t),
        FilterItem::Platform(p) => app.criteria.toggle_platform(p),
        FilterItem::MinScore | FilterItem::MaxScore => return,
        FilterItem::Reset => {
            app.reset_filters();
            return;
        }
    }
    app.refresh_view();
}

fn step_score_bound(app: &mut AppState, item: FilterItem, delta: i64) {
    let range = app.criteria.score_range;
    app.criteria.score_range = match item {
        FilterItem::MinScore => range.with_min(range.min().saturating_step(delta)),
        FilterItem::MaxScore => range.with_max(range.max().saturating_step(delta)),
        _ => return,
    };
    debug!(min = %app.criteria.score_range.min(), max = %app.criteria.score_range.max(), "score range");
    app.refresh_view();
}

/// Score bounds shown in the filter menu.
pub fn score_bounds(app: &AppState) -> (Score, Score) {
    (app.criteria.score_range.min(), app.criteria.score_range.max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_influencers;
    use crate::store::DirectoryStore;
    use crossterm::event::KeyModifiers;

    fn app() -> AppState {
        AppState::new(DirectoryStore::from_records(sample_influencers()).unwrap())
    }

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn search_is_live_and_escape_restores() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "an");
        assert!(app.visible.iter().all(|r| r.name.to_lowercase().contains("an")));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.criteria.name_query, "an");

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "zzz");
        assert!(app.visible.is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.criteria.name_query, "an");
        assert!(!app.visible.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn quit_key_stops_loop() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
        assert_eq!(press(&mut app, KeyCode::Char('x')), Flow::Continue);
    }

    #[test]
    fn add_through_form() {
        let mut app = app();
        let before = app.store.len();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Modal);
        type_str(&mut app, "Nova Lee");
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
        assert_eq!(app.store.len(), before + 1);
        assert_eq!(app.selected().unwrap().name, "Nova Lee");
        assert_eq!(app.notice.as_ref().unwrap().title, "Influencer Added");
    }

    #[test]
    fn empty_name_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        match &app.modal {
            Some(ModalState::Form(form)) => assert_eq!(form.error.as_deref(), Some("Name is required")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        let before = app.store.len();
        let name = app.selected().unwrap().name.clone();
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Enter); // Cancel is preselected
        assert_eq!(app.store.len(), before);

        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.len(), before - 1);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.message, format!("{name} has been removed from the directory."));
        assert!(notice.destructive);
    }

    #[test]
    fn filter_menu_toggles_tier_and_scores() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Enter); // Gold
        assert!(app.visible.iter().all(|r| r.tier == Tier::Gold));
        for _ in 0..4 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::PageUp); // min score 10
        assert_eq!(score_bounds(&app).0.value(), 10);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.criteria.is_empty());
    }

    #[test]
    fn sort_menu_applies_choice() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.sort, SortSpec::new(SortKey::Score, SortOrder::Desc));
        let scores: Vec<u8> = app.visible.iter().map(|r| r.score.value()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.sort.order, SortOrder::Asc);
    }

    #[test]
    fn edit_via_actions_menu() {
        let mut app = app();
        let id = app.selected().unwrap().id.clone();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // Edit
        type_str(&mut app, "!");
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        let updated = app.store.get(&id).unwrap();
        assert!(updated.name.ends_with('!'));
        assert_eq!(app.notice.as_ref().unwrap().title, "Influencer Updated");
    }

    #[test]
    fn closing_form_cancels_picture_load() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "/nonexistent/me.png");
        press(&mut app, KeyCode::Enter);
        assert!(app.pictures.is_loading());
        press(&mut app, KeyCode::Esc);
        assert!(!app.pictures.is_loading());
        std::thread::sleep(Duration::from_millis(50));
        tick(&mut app, Instant::now());
        assert!(app.modal.is_none());
    }
}
