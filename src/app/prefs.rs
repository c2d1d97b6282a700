//! View preferences: parse/write `view.conf` and apply to AppState.
//!
//! Only presentation choices live here (sort key, sort order, row/card mode).
//! Records themselves are never written to disk.
//!
use std::path::Path;
use tracing::warn;

use super::{AppState, ViewMode};
use crate::view::{SortKey, SortOrder, SortSpec};

/// Preferences restored at start-up and saved when the user changes them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewPrefs {
    pub sort: SortSpec,
    pub view_mode: ViewMode,
}

impl ViewPrefs {
    /// Current preferences of a running app.
    pub fn from_app(app: &AppState) -> Self {
        Self {
            sort: app.sort,
            view_mode: app.view_mode,
        }
    }

    pub fn apply_to(&self, app: &mut AppState) {
        app.sort = self.sort;
        app.view_mode = self.view_mode;
    }

    /// Load from `path`, or write defaults there when missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let prefs = Self::default();
        if let Err(e) = prefs.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default view prefs");
        }
        prefs
    }

    /// Read `<key> = <value>` lines. Unknown keys and bad values are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_config_str(&contents))
    }

    pub fn from_config_str(contents: &str) -> Self {
        let mut prefs = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match lhs {
                "sort_key" => {
                    if let Some(k) = SortKey::parse(rhs) {
                        prefs.sort.key = k;
                    }
                }
                "sort_order" => {
                    if let Some(o) = SortOrder::parse(rhs) {
                        prefs.sort.order = o;
                    }
                }
                "view_mode" => {
                    if let Some(m) = ViewMode::parse(rhs) {
                        prefs.view_mode = m;
                    }
                }
                _ => {}
            }
        }
        prefs
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# influencer-hub view preferences\n");
        buf.push_str("# sort_key: date_added|score\n");
        buf.push_str(&format!("sort_key = {}\n", self.sort.key.config_name()));
        buf.push_str("# sort_order: asc|desc\n");
        buf.push_str(&format!("sort_order = {}\n", self.sort.order.config_name()));
        buf.push_str("# view_mode: rows|cards\n");
        buf.push_str(&format!("view_mode = {}\n", self.view_mode.config_name()));
        std::fs::write(path, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_junk() {
        let prefs = ViewPrefs::from_config_str(
            "# c\nsort_key = score\nsort_order = ascending\nview_mode = cards\nsort_key = ???\ncolor = red\n",
        );
        assert_eq!(prefs.sort, SortSpec::new(SortKey::Score, SortOrder::Asc));
        assert_eq!(prefs.view_mode, ViewMode::Cards);
    }

    #[test]
    fn defaults_are_newest_first_rows() {
        let prefs = ViewPrefs::from_config_str("");
        assert_eq!(prefs.sort, SortSpec::new(SortKey::DateAdded, SortOrder::Desc));
        assert_eq!(prefs.view_mode, ViewMode::Rows);
    }
}
