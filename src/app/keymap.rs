//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings apply in normal mode only; search input, forms and menus handle
//! their own keys.
//!
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Several key combinations may map to the same action (both `j` and Down
/// move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Focus the name search box.
    StartSearch,
    /// Open the add form.
    NewInfluencer,
    /// Open the edit form for the selected record.
    EditSelection,
    /// Ask for confirmation and delete the selected record.
    DeleteSelection,
    /// Open the tier/platform/score filter menu.
    OpenFilterMenu,
    /// Open the sort key/order menu.
    OpenSortMenu,
    /// Flip ascending/descending.
    ToggleSortOrder,
    /// Switch between the row table and the card grid.
    ToggleViewMode,
    /// Clear all filters and restore the default sort.
    ResetFilters,
    /// Open the actions menu for the selected record.
    EnterAction,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    MoveTop,
    MoveBottom,
    /// Ignore this key.
    Ignore,
}

const ACTION_NAMES: [(KeyAction, &str); 19] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::NewInfluencer, "NewInfluencer"),
    (KeyAction::EditSelection, "EditSelection"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::OpenFilterMenu, "OpenFilterMenu"),
    (KeyAction::OpenSortMenu, "OpenSortMenu"),
    (KeyAction::ToggleSortOrder, "ToggleSortOrder"),
    (KeyAction::ToggleViewMode, "ToggleViewMode"),
    (KeyAction::ResetFilters, "ResetFilters"),
    (KeyAction::EnterAction, "EnterAction"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::MoveTop, "MoveTop"),
    (KeyAction::MoveBottom, "MoveBottom"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings: arrows and vim keys for
    /// navigation, single letters for commands.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewInfluencer);
        bindings.insert((M::NONE, Char('a')), KeyAction::NewInfluencer);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('f')), KeyAction::OpenFilterMenu);
        bindings.insert((M::NONE, Char('s')), KeyAction::OpenSortMenu);
        bindings.insert((M::NONE, Char('o')), KeyAction::ToggleSortOrder);
        bindings.insert((M::NONE, Char('v')), KeyAction::ToggleViewMode);
        bindings.insert((M::NONE, Char('r')), KeyAction::ResetFilters);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageUp);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageDown);
        bindings.insert((M::NONE, Home), KeyAction::MoveTop);
        bindings.insert((M::NONE, End), KeyAction::MoveBottom);
        bindings.insert((M::NONE, Char('g')), KeyAction::MoveTop);
        bindings.insert((M::SHIFT, Char('G')), KeyAction::MoveBottom);
        bindings.insert((M::NONE, Char('G')), KeyAction::MoveBottom);

        Self { bindings }
    }

    /// Load a keymap from `path`, or write the defaults there if it doesn't exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Load a keymap from a configuration file of `<Action> = <KeySpec>` lines.
    ///
    /// Starts from the defaults and overrides with user bindings.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_config_str(&contents))
    }

    pub fn from_config_str(contents: &str) -> Self {
        let mut map = Self::default();
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
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            debug!(line, "ignoring unrecognised keybind line");
        }
        map
    }

    /// Write a readable subset of the current bindings.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# influencer-hub keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, Up, Down, Left, Right, PageUp, PageDown, Home, End, Delete, /, ?\n");
        buf.push_str("# Actions: ");
        buf.push_str(
            &ACTION_NAMES
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        );
        buf.push_str("\n\n");

        let mut entries: Vec<(String, &'static str)> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a != KeyAction::Ignore)
            .map(|((m, c), a)| (Self::format_key(*m, *c), format_action(*a)))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in entries {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(&(key.modifiers, key.code)) {
            return Some(*action);
        }
        // Terminals report SHIFT for symbols like '?'; the char already carries it.
        match key.code {
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::SHIFT) => self
                .bindings
                .get(&(key.modifiers - KeyModifiers::SHIFT, key.code))
                .copied(),
            _ => None,
        }
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+q" or "PageUp".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mut mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        "Space" => Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    // Terminals report upper-case letters with SHIFT held.
    if let Char(c) = code {
        if c.is_ascii_uppercase() && mods == KeyModifiers::NONE {
            mods = KeyModifiers::SHIFT;
        }
    }
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s)
        .map(|(action, _)| *action)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

/// Human readable description for the help screen.
pub fn describe_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "Help",
        KeyAction::StartSearch => "Search by name",
        KeyAction::NewInfluencer => "Add influencer",
        KeyAction::EditSelection => "Edit selected",
        KeyAction::DeleteSelection => "Delete selected",
        KeyAction::OpenFilterMenu => "Filter menu",
        KeyAction::OpenSortMenu => "Sort menu",
        KeyAction::ToggleSortOrder => "Flip sort order",
        KeyAction::ToggleViewMode => "Rows / cards",
        KeyAction::ResetFilters => "Reset filters",
        KeyAction::EnterAction => "Actions menu",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PageUp => "Page up",
        KeyAction::PageDown => "Page down",
        KeyAction::MoveTop => "First",
        KeyAction::MoveBottom => "Last",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_cover_crud_keys() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('n'))), Some(KeyAction::NewInfluencer));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Delete)), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::F(5))), None);
    }

    #[test]
    fn config_overrides_and_ignores_reversed_lines() {
        let km = Keymap::from_config_str(
            "# comment\nQuit = Ctrl+x\nOpenFilterMenu = F\nG = MoveTop\nbogus line\nToggleViewMode = Space\n",
        );
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('x'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::SHIFT, KeyCode::Char('F'))), Some(KeyAction::OpenFilterMenu));
        // `<Key> = <Action>` is not a binding; 'G' keeps its default.
        assert_eq!(km.resolve(&key(KeyModifiers::SHIFT, KeyCode::Char('G'))), Some(KeyAction::MoveBottom));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char(' '))), Some(KeyAction::ToggleViewMode));
        // defaults survive
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('q'))), Some(KeyAction::Quit));
    }

    #[test]
    fn action_names_roundtrip() {
        for (action, name) in ACTION_NAMES {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
        assert_eq!(Keymap::default().keys_for(KeyAction::StartSearch), vec!["/".to_string()]);
    }
}
