//! Add/edit form state and key handling.
//!
//! The form is a plain state machine: [`InfluencerForm::handle_key`] returns a
//! [`FormOutcome`] and the update loop decides what to do with it (close,
//! submit to the store, start a picture load). Validation happens here, before
//! anything reaches the store.
//!
use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::app::picture::{PictureLoaded, PictureTicket};
use crate::error::ValidationError;
use crate::model::{DEFAULT_PICTURE, Influencer, InfluencerId, NewInfluencer, Platform, Score, Tier};

/// Whether the form creates a record or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit {
        id: InfluencerId,
        date_added: DateTime<Utc>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Picture,
    Tier,
    Platforms,
    Score,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Name,
        FormField::Picture,
        FormField::Tier,
        FormField::Platforms,
        FormField::Score,
        FormField::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Where the picture comes from: a typed URL or a local image file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PictureSource {
    Url,
    File,
}

/// What the caller should do after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Cancel,
    Submit,
    LoadPicture(PathBuf),
}

/// Validated form result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSubmission {
    Create(NewInfluencer),
    Update(Influencer),
}

#[derive(Clone, Debug)]
pub struct InfluencerForm {
    pub mode: FormMode,
    pub field: FormField,
    pub name: String,
    pub picture_source: PictureSource,
    pub picture_url: String,
    pub picture_file: String,
    /// Data URI from the last successful file load; takes precedence over the URL.
    pub picture_preview: Option<String>,
    pub picture_ticket: Option<PictureTicket>,
    pub picture_status: Option<String>,
    pub tier: Tier,
    pub platforms: BTreeSet<Platform>,
    pub platform_cursor: usize,
    pub score: Score,
    pub error: Option<String>,
}

impl InfluencerForm {
    /// Blank form with the add defaults (Silver, score 50, placeholder picture).
    pub fn new_add() -> Self {
        Self {
            mode: FormMode::Add,
            field: FormField::Name,
            name: String::new(),
            picture_source: PictureSource::File,
            picture_url: DEFAULT_PICTURE.to_string(),
            picture_file: String::new(),
            picture_preview: None,
            picture_ticket: None,
            picture_status: None,
            tier: Tier::Silver,
            platforms: BTreeSet::new(),
            platform_cursor: 0,
            score: Score::clamped(50),
            error: None,
        }
    }

    /// Form pre-filled from an existing record.
    pub fn new_edit(record: &Influencer) -> Self {
        Self {
            mode: FormMode::Edit {
                id: record.id.clone(),
                date_added: record.date_added,
            },
            picture_source: PictureSource::Url,
            picture_url: record.profile_picture.clone(),
            name: record.name.clone(),
            tier: record.tier,
            platforms: record.platforms.clone(),
            score: record.score,
            ..Self::new_add()
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add New Influencer",
            FormMode::Edit { .. } => "Edit Influencer",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Influencer",
            FormMode::Edit { .. } => "Save Changes",
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormOutcome {
        match code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                return FormOutcome::Continue;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                return FormOutcome::Continue;
            }
            _ => {}
        }

        match self.field {
            FormField::Name => match code {
                KeyCode::Char(c) => self.name.push(c),
                KeyCode::Backspace => {
                    self.name.pop();
                }
                KeyCode::Enter => self.field = self.field.next(),
                _ => {}
            },
            FormField::Picture => return self.handle_picture_key(code),
            FormField::Tier => match code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                    self.tier = match self.tier {
                        Tier::Gold => Tier::Silver,
                        Tier::Silver => Tier::Gold,
                    };
                }
                KeyCode::Enter => self.field = self.field.next(),
                _ => {}
            },
            FormField::Platforms => match code {
                KeyCode::Left => self.platform_cursor = self.platform_cursor.saturating_sub(1),
                KeyCode::Right => {
                    self.platform_cursor = (self.platform_cursor + 1).min(Platform::ALL.len() - 1)
                }
                KeyCode::Char(' ') => {
                    let p = Platform::ALL[self.platform_cursor];
                    if !self.platforms.remove(&p) {
                        self.platforms.insert(p);
                    }
                }
                KeyCode::Enter => self.field = self.field.next(),
                _ => {}
            },
            FormField::Score => match code {
                KeyCode::Left => self.score = self.score.saturating_step(-1),
                KeyCode::Right => self.score = self.score.saturating_step(1),
                KeyCode::PageDown => self.score = self.score.saturating_step(-10),
                KeyCode::PageUp => self.score = self.score.saturating_step(10),
                KeyCode::Home => self.score = Score::MIN,
                KeyCode::End => self.score = Score::MAX,
                KeyCode::Enter => self.field = self.field.next(),
                _ => {}
            },
            FormField::Submit => {
                if code == KeyCode::Enter {
                    return FormOutcome::Submit;
                }
            }
        }
        FormOutcome::Continue
    }

    fn handle_picture_key(&mut self, code: KeyCode) -> FormOutcome {
        match code {
            KeyCode::Left | KeyCode::Right => {
                self.picture_source = match self.picture_source {
                    PictureSource::Url => PictureSource::File,
                    PictureSource::File => PictureSource::Url,
                };
            }
            KeyCode::Char(c) => {
                self.picture_input_mut().push(c);
                self.on_picture_edited();
            }
            KeyCode::Backspace => {
                self.picture_input_mut().pop();
                self.on_picture_edited();
            }
            KeyCode::Enter => match self.picture_source {
                PictureSource::File if !self.picture_file.trim().is_empty() => {
                    return FormOutcome::LoadPicture(PathBuf::from(self.picture_file.trim()));
                }
                _ => self.field = self.field.next(),
            },
            _ => {}
        }
        FormOutcome::Continue
    }

    fn picture_input_mut(&mut self) -> &mut String {
        match self.picture_source {
            PictureSource::Url => &mut self.picture_url,
            PictureSource::File => &mut self.picture_file,
        }
    }

    fn on_picture_edited(&mut self) {
        // A typed URL replaces an earlier file pick.
        if self.picture_source == PictureSource::Url {
            self.picture_preview = None;
            self.picture_status = None;
        }
    }

    /// Remember the ticket of a load started for this form.
    pub fn begin_picture_load(&mut self, ticket: PictureTicket) {
        self.picture_ticket = Some(ticket);
        self.picture_status = Some("Loading picture...".to_string());
    }

    /// Apply a finished load. Returns false if it was not meant for this form.
    pub fn apply_picture(&mut self, loaded: PictureLoaded) -> bool {
        if self.picture_ticket != Some(loaded.ticket) {
            return false;
        }
        self.picture_ticket = None;
        match loaded.result {
            Ok(uri) => {
                let file_name = loaded
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.picture_status = Some(format!("Picture loaded: {file_name}"));
                self.picture_preview = Some(uri);
            }
            Err(e) => {
                self.picture_status = Some(format!("Failed to load picture: {e}"));
            }
        }
        true
    }

    /// Picture reference that will be stored.
    pub fn picture_value(&self) -> String {
        if let Some(preview) = &self.picture_preview {
            return preview.clone();
        }
        let url = self.picture_url.trim();
        if url.is_empty() {
            DEFAULT_PICTURE.to_string()
        } else {
            url.to_string()
        }
    }

    /// Validate and build the store input.
    pub fn submit(&self) -> Result<FormSubmission, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let input = NewInfluencer {
            name: name.to_string(),
            profile_picture: self.picture_value(),
            tier: self.tier,
            platforms: self.platforms.clone(),
            score: self.score,
        };
        Ok(match &self.mode {
            FormMode::Add => FormSubmission::Create(input),
            FormMode::Edit { id, date_added } => {
                FormSubmission::Update(input.into_record(id.clone(), *date_added))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn type_str(form: &mut InfluencerForm, s: &str) {
        for c in s.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut form = InfluencerForm::new_add();
        type_str(&mut form, "   ");
        assert_eq!(form.submit(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn add_defaults_and_navigation() {
        let mut form = InfluencerForm::new_add();
        type_str(&mut form, "Mia Park");
        form.handle_key(KeyCode::Tab); // picture
        form.handle_key(KeyCode::Tab); // tier
        form.handle_key(KeyCode::Char(' '));
        form.handle_key(KeyCode::Tab); // platforms
        form.handle_key(KeyCode::Right);
        form.handle_key(KeyCode::Char(' '));
        form.handle_key(KeyCode::Tab); // score
        form.handle_key(KeyCode::PageUp);
        form.handle_key(KeyCode::Right);
        form.handle_key(KeyCode::Tab);
        assert_eq!(form.field, FormField::Submit);
        assert_eq!(form.handle_key(KeyCode::Enter), FormOutcome::Submit);

        match form.submit().unwrap() {
            FormSubmission::Create(input) => {
                assert_eq!(input.name, "Mia Park");
                assert_eq!(input.tier, Tier::Gold);
                assert_eq!(input.platforms, [Platform::YouTube].into_iter().collect());
                assert_eq!(input.score.value(), 61);
                assert_eq!(input.profile_picture, DEFAULT_PICTURE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn edit_preserves_id_and_date() {
        let record = Influencer {
            id: InfluencerId::new("abc"),
            name: "Old".into(),
            profile_picture: "https://x/y.png".into(),
            tier: Tier::Gold,
            platforms: BTreeSet::new(),
            score: Score::clamped(70),
            date_added: Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap(),
        };
        let mut form = InfluencerForm::new_edit(&record);
        for _ in 0..3 {
            form.handle_key(KeyCode::Backspace);
        }
        type_str(&mut form, "New");
        match form.submit().unwrap() {
            FormSubmission::Update(updated) => {
                assert_eq!(updated.id, record.id);
                assert_eq!(updated.date_added, record.date_added);
                assert_eq!(updated.name, "New");
                assert_eq!(updated.profile_picture, "https://x/y.png");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_file_path_just_advances() {
        let mut form = InfluencerForm::new_add();
        form.handle_key(KeyCode::Tab);
        assert_eq!(form.picture_source, PictureSource::File);
        assert_eq!(form.handle_key(KeyCode::Enter), FormOutcome::Continue);
        assert_eq!(form.field, FormField::Tier);
    }

    #[test]
    fn loaded_picture_wins_until_url_is_typed() {
        let mut form = InfluencerForm::new_add();
        form.begin_picture_load(PictureTicket(7));
        let stale = PictureLoaded {
            ticket: PictureTicket(3),
            path: PathBuf::from("/tmp/old.png"),
            result: Ok("data:image/png;base64,AA==".into()),
        };
        assert!(!form.apply_picture(stale));
        let fresh = PictureLoaded {
            ticket: PictureTicket(7),
            path: PathBuf::from("/tmp/me.png"),
            result: Ok("data:image/png;base64,QQ==".into()),
        };
        assert!(form.apply_picture(fresh));
        assert_eq!(form.picture_value(), "data:image/png;base64,QQ==");
        assert_eq!(form.picture_status.as_deref(), Some("Picture loaded: me.png"));

        form.field = FormField::Picture;
        form.picture_source = PictureSource::Url;
        form.handle_key(KeyCode::Backspace);
        assert!(form.picture_preview.is_none());
        assert_eq!(form.picture_value(), "/placeholder-user.jp");
    }

    #[test]
    fn picture_file_path_is_requested() {
        let mut form = InfluencerForm::new_add();
        form.handle_key(KeyCode::Tab);
        type_str(&mut form, "/tmp/me.png");
        assert_eq!(
            form.handle_key(KeyCode::Enter),
            FormOutcome::LoadPicture(PathBuf::from("/tmp/me.png"))
        );
    }
}
