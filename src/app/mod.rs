//! Application state types and entry glue.
//!
//! [`AppState`] owns the session's [`DirectoryStore`] together with the
//! filter criteria, sort spec, selection and modal state. The visible list is
//! recomputed from scratch by [`AppState::refresh_view`] whenever any input
//! changes.
//!
pub mod form;
pub mod keymap;
pub mod picture;
pub mod prefs;
pub mod update;

use ratatui::style::Color;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::{Influencer, InfluencerId, NewInfluencer};
use crate::store::DirectoryStore;
use crate::view::{FilterCriteria, SortSpec};
use form::InfluencerForm;
use keymap::Keymap;
use picture::PictureLoader;
use prefs::ViewPrefs;

/// How long a mutation notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Row table or card grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Rows,
    Cards,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Rows => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Rows,
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            ViewMode::Rows => "rows",
            ViewMode::Cards => "cards",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" | "row" | "list" => Some(ViewMode::Rows),
            "cards" | "card" | "grid" => Some(ViewMode::Cards),
            _ => None,
        }
    }
}

/// Base palette selectable from the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeName {
    Mocha,
    Dark,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub gold: Color,
    pub silver: Color,
    pub success: Color,
    pub danger: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Yellow,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Yellow,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            gold: Color::Yellow,
            silver: Color::Gray,
            success: Color::Green,
            danger: Color::Red,
        }
    }

    /// Catppuccin Mocha based defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xf9, 0xe2, 0xaf),        // yellow
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xf9, 0xe2, 0xaf),    // yellow
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xfa, 0xb3, 0x87), // peach
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            gold: Color::Rgb(0xf9, 0xe2, 0xaf),         // yellow
            silver: Color::Rgb(0xba, 0xc2, 0xde),       // subtext1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            danger: Color::Rgb(0xf3, 0x8b, 0xa8),       // red
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Mocha => Self::mocha(),
            ThemeName::Dark => Self::dark(),
        }
    }

    /// Load `key = color` overrides on top of `base`. Unknown keys are ignored.
    pub fn from_file_with_base(path: &Path, base: Theme) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = base;

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "gold" => theme.gold = color,
                "silver" => theme.silver = color,
                "success" => theme.success = color,
                "danger" => theme.danger = color,
                _ => {}
            }
        }

        Some(theme)
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        Self::from_file_with_base(path, Self::mocha())
    }

    /// Parse "#RRGGBB", "RRGGBB" or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme in key = value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# influencer-hub theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::White => "#FFFFFF".to_string(),
                // Named colors without a fixed hex value
                _ => "reset".to_string(),
            }
        }

        let entries = [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("gold", self.gold),
            ("silver", self.silver),
            ("success", self.success),
            ("danger", self.danger),
        ];
        for (k, v) in entries {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        }

        std::fs::write(path, buf)
    }

    /// Load from `path` on top of `base`; write `base` there if the file is missing.
    pub fn load_or_init(path: &Path, base: Theme) -> Self {
        if path.exists() {
            return Self::from_file_with_base(path, base).unwrap_or(base);
        }
        if let Err(e) = base.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        base
    }
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Edit/Delete menu for the selected record.
    Actions { selected: usize },
    Form(Box<InfluencerForm>),
    DeleteConfirm {
        id: InfluencerId,
        name: String,
        /// 0 = Delete, 1 = Cancel
        selected: usize,
    },
    FilterMenu { selected: usize },
    SortMenu { selected: usize },
    Info { message: String },
    Help { scroll: u16 },
}

/// Transient status-bar message shown after a mutation.
#[derive(Clone, Debug)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub destructive: bool,
    pub shown_at: Instant,
}

/// Locations of the config files.
#[derive(Clone, Debug)]
pub struct ConfigPaths {
    pub dir: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn theme(&self) -> PathBuf {
        self.dir.join("theme.conf")
    }

    pub fn keybinds(&self) -> PathBuf {
        self.dir.join("keybinds.conf")
    }

    pub fn view(&self) -> PathBuf {
        self.dir.join("view.conf")
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub store: DirectoryStore,
    /// Current projection of `store` under `criteria` and `sort`.
    pub visible: Vec<Influencer>,
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
    pub view_mode: ViewMode,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    /// Query to restore when search input is cancelled.
    pub search_backup: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub notice: Option<Notice>,
    pub pictures: PictureLoader,
    /// Where view preferences are saved; `None` keeps them in memory only.
    pub prefs_path: Option<PathBuf>,
}

impl AppState {
    /// State around `store` with default theme, keys and preferences.
    pub fn new(store: DirectoryStore) -> Self {
        let mut app = Self {
            started_at: Instant::now(),
            store,
            visible: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: SortSpec::default(),
            view_mode: ViewMode::default(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_backup: String::new(),
            theme: Theme::mocha(),
            keymap: Keymap::default(),
            modal: None,
            notice: None,
            pictures: PictureLoader::new(),
            prefs_path: None,
        };
        app.refresh_view();
        app
    }

    /// State with theme, keybinds and view preferences loaded from `paths`.
    pub fn with_config(store: DirectoryStore, paths: &ConfigPaths, theme: ThemeName) -> Self {
        let mut app = Self::new(store);
        app.theme = Theme::load_or_init(&paths.theme(), Theme::named(theme));
        app.keymap = Keymap::load_or_init(&paths.keybinds());
        let prefs_path = paths.view();
        ViewPrefs::load_or_init(&prefs_path).apply_to(&mut app);
        app.prefs_path = Some(prefs_path);
        info!(dir = %paths.dir.display(), "configuration loaded");
        app.refresh_view();
        app
    }

    /// Recompute `visible`, keeping the selected record selected if it is still shown.
    pub fn refresh_view(&mut self) {
        let selected_id = self.selected().map(|r| r.id.clone());
        self.visible = self.store.view(&self.criteria, &self.sort);
        match selected_id.and_then(|id| self.visible.iter().position(|r| r.id == id)) {
            Some(idx) => self.selected_index = idx,
            None => self.clamp_selection(),
        }
    }

    pub fn selected(&self) -> Option<&Influencer> {
        self.visible.get(self.selected_index)
    }

    pub fn select_id(&mut self, id: &InfluencerId) {
        if let Some(idx) = self.visible.iter().position(|r| &r.id == id) {
            self.selected_index = idx;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.visible.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.selected_index = 0;
            return;
        }
        let last = self.visible.len() - 1;
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.visible.len().saturating_sub(1);
    }

    /// Create a record, select it if visible and post a notice.
    pub fn add_influencer(&mut self, input: NewInfluencer) -> Result<Influencer, StoreError> {
        let created = self.store.add(input)?;
        self.refresh_view();
        self.select_id(&created.id);
        self.post_notice(
            "Influencer Added",
            format!("{} has been added to the directory.", created.name),
            false,
        );
        Ok(created)
    }

    pub fn update_influencer(&mut self, record: Influencer) -> Result<Influencer, StoreError> {
        let updated = self.store.update(record)?;
        self.refresh_view();
        self.post_notice(
            "Influencer Updated",
            format!("{}'s information has been updated.", updated.name),
            false,
        );
        Ok(updated)
    }

    pub fn delete_influencer(&mut self, id: &InfluencerId) -> Result<Influencer, StoreError> {
        let removed = self.store.remove(id)?;
        self.refresh_view();
        self.post_notice(
            "Influencer Deleted",
            format!("{} has been removed from the directory.", removed.name),
            true,
        );
        Ok(removed)
    }

    /// Clear query, tiers, platforms and score range; restore the default sort.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.search_backup.clear();
        self.sort = SortSpec::default();
        self.refresh_view();
        self.save_prefs();
    }

    pub fn post_notice(&mut self, title: &str, message: String, destructive: bool) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message,
            destructive,
            shown_at: Instant::now(),
        });
    }

    /// Drop the notice once it is older than [`NOTICE_TTL`].
    pub fn expire_notice(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    /// Close any modal. A picture load started by a form is abandoned.
    pub fn close_modal(&mut self) {
        if matches!(self.modal, Some(ModalState::Form(_))) {
            self.pictures.cancel();
        }
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Persist sort and view mode if a prefs file is configured.
    pub fn save_prefs(&self) {
        if let Some(path) = &self.prefs_path {
            if let Err(e) = ViewPrefs::from_app(self).write_file(path) {
                warn!(path = %path.display(), error = %e, "could not save view prefs");
            }
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Platform, Score, Tier};
    use crate::seed::sample_influencers;
    use crate::view::{SortKey, SortOrder};

    fn seeded() -> AppState {
        AppState::new(DirectoryStore::from_records(sample_influencers()).unwrap())
    }

    #[test]
    fn selection_follows_record_across_resort() {
        let mut app = seeded();
        app.select_last();
        let id = app.selected().unwrap().id.clone();
        app.sort = SortSpec::new(SortKey::DateAdded, SortOrder::Asc);
        app.refresh_view();
        assert_eq!(app.selected().unwrap().id, id);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn selection_clamps_when_record_filtered_out() {
        let mut app = seeded();
        app.select_last();
        app.criteria.name_query = "marcus".into();
        app.refresh_view();
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn add_posts_notice_and_selects() {
        let mut app = seeded();
        let created = app
            .add_influencer(NewInfluencer {
                name: "Zed".into(),
                profile_picture: String::new(),
                tier: Tier::Gold,
                platforms: [Platform::Instagram].into_iter().collect(),
                score: Score::clamped(12),
            })
            .unwrap();
        assert_eq!(app.selected().unwrap().id, created.id);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.title, "Influencer Added");
        assert_eq!(notice.message, "Zed has been added to the directory.");
    }

    #[test]
    fn notices_expire() {
        let mut app = seeded();
        app.post_notice("T", "m".into(), false);
        let shown = app.notice.as_ref().unwrap().shown_at;
        app.expire_notice(shown + Duration::from_secs(1));
        assert!(app.notice.is_some());
        app.expire_notice(shown + NOTICE_TTL);
        assert!(app.notice.is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut app = seeded();
        app.criteria.toggle_tier(Tier::Gold);
        app.criteria.name_query = "x".into();
        app.sort = SortSpec::new(SortKey::Score, SortOrder::Asc);
        app.refresh_view();
        app.reset_filters();
        assert!(app.criteria.is_empty());
        assert_eq!(app.sort, SortSpec::default());
        assert_eq!(app.visible.len(), app.store.len());
    }

    #[test]
    fn theme_colors_parse() {
        assert_eq!(Theme::parse_color("#0a0B0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(Theme::parse_color("reset"), Some(Color::Reset));
        assert_eq!(Theme::parse_color("blue"), None);
        // Six bytes but not six hex digits.
        assert_eq!(Theme::parse_color("#aééa"), None);
        assert_eq!(Theme::parse_color("+12345"), None);
    }

    #[test]
    fn theme_file_with_non_ascii_value_keeps_base() {
        let path = std::env::temp_dir().join(format!(
            "ihub_theme_non_ascii_{}.conf",
            std::process::id()
        ));
        std::fs::write(&path, "text = #aééa
gold = #112233
").unwrap();
        let theme = Theme::from_file_with_base(&path, Theme::dark()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(theme.text, Theme::dark().text);
        assert_eq!(theme.gold, Color::Rgb(0x11, 0x22, 0x33));
    }
}
