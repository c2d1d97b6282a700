// Integration tests for influencer-hub

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn unique_temp(tag: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("ihub_{}_{}_{}", std::process::id(), nonce, tag));
    path
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use influencer_hub::app::Theme;

    let path = unique_temp("theme.conf");

    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.gold), format!("{:?}", t2.gold));
    assert_eq!(format!("{:?}", t.danger), format!("{:?}", t2.danger));

    // load_or_init creates file if missing
    let p2 = unique_temp("theme_init.conf");
    let _ = std::fs::remove_file(&p2);
    let _created = Theme::load_or_init(&p2, Theme::dark());
    assert!(p2.exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&p2);
}

// 2) Theme robustness: unknown keys and invalid values ignored, valid parsed
#[test]
fn theme_from_file_robustness() {
    use influencer_hub::app::Theme;
    use ratatui::style::Color;

    let path = unique_temp("theme_robust.conf");
    std::fs::write(
        &path,
        "# comment\nnot_a_key = #FFFFFF\ntext = nothex\ngold = #112233\nborder=reset\n",
    )
    .unwrap();
    let t = Theme::from_file(&path).expect("read theme");
    assert_eq!(t.gold, Color::Rgb(0x11, 0x22, 0x33));
    assert_eq!(t.border, Color::Reset);
    assert_eq!(t.text, Theme::mocha().text);
    let _ = std::fs::remove_file(&path);
}

// 3) Keymap file roundtrip keeps every default binding
#[test]
fn keymap_write_then_read() {
    use influencer_hub::app::keymap::{KeyAction, Keymap};

    let path = unique_temp("keybinds.conf");
    let km = Keymap::default();
    km.write_file(&path).expect("write keymap");
    let loaded = Keymap::from_file(&path).expect("read keymap");
    for action in [
        KeyAction::Quit,
        KeyAction::StartSearch,
        KeyAction::NewInfluencer,
        KeyAction::DeleteSelection,
        KeyAction::ToggleViewMode,
    ] {
        assert_eq!(loaded.keys_for(action), km.keys_for(action));
    }
    let _ = std::fs::remove_file(&path);
}

// 4) Sort and view mode survive a restart through view.conf
#[test]
fn view_prefs_persist_across_sessions() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use influencer_hub::app::update::handle_key;
    use influencer_hub::app::{AppState, ConfigPaths, ThemeName, ViewMode};
    use influencer_hub::{DirectoryStore, SortKey, SortOrder};

    let dir = unique_temp("conf_dir");
    std::fs::create_dir_all(&dir).unwrap();
    let paths = ConfigPaths::new(&dir);

    let mut app = AppState::with_config(DirectoryStore::new(), &paths, ThemeName::Dark);
    assert!(paths.theme().exists());
    assert!(paths.keybinds().exists());
    assert!(paths.view().exists());

    for code in [KeyCode::Char('s'), KeyCode::Down, KeyCode::Down, KeyCode::Enter, KeyCode::Char('v')] {
        handle_key(&mut app, KeyEvent::new(code, KeyModifiers::NONE));
    }
    assert_eq!(app.sort.key, SortKey::Score);

    let again = AppState::with_config(DirectoryStore::new(), &paths, ThemeName::Mocha);
    assert_eq!(again.sort.key, SortKey::Score);
    assert_eq!(again.sort.order, SortOrder::Desc);
    assert_eq!(again.view_mode, ViewMode::Cards);

    let _ = std::fs::remove_dir_all(&dir);
}

// 5) Picture file picked in the form ends up as a data URI on the record
#[test]
fn picture_upload_flows_into_new_record() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use influencer_hub::app::update::{handle_key, tick};
    use influencer_hub::app::{AppState, ModalState};
    use influencer_hub::DirectoryStore;

    let img = unique_temp("avatar.png");
    std::fs::write(&img, [0x89, b'P', b'N', b'G']).unwrap();

    let mut app = AppState::new(DirectoryStore::new());
    let press = |app: &mut AppState, code: KeyCode| {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    };
    press(&mut app, KeyCode::Char('n'));
    for c in "Pic Person".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    for c in img.to_string_lossy().chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        tick(&mut app, Instant::now());
        let done = match &app.modal {
            Some(ModalState::Form(form)) => form.picture_preview.is_some(),
            _ => panic!("form closed unexpectedly"),
        };
        if done || Instant::now() > deadline {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    for _ in 0..4 {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Enter);
    let _ = std::fs::remove_file(&img);

    assert!(app.modal.is_none());
    let record = &app.store.records()[0];
    assert_eq!(record.name, "Pic Person");
    assert_eq!(record.profile_picture, "data:image/png;base64,iVBORw==");
}

// 6) Non-image files are rejected and the form keeps the placeholder
#[test]
fn non_image_upload_reports_error() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use influencer_hub::app::update::{handle_key, tick};
    use influencer_hub::app::{AppState, ModalState};
    use influencer_hub::model::DEFAULT_PICTURE;
    use influencer_hub::DirectoryStore;

    let mut app = AppState::new(DirectoryStore::new());
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    handle_key(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
    for c in "/tmp/notes.txt".chars() {
        handle_key(&mut app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    let deadline = Instant::now() + Duration::from_secs(5);
    while app.pictures.is_loading() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        tick(&mut app, Instant::now());
    }
    match &app.modal {
        Some(ModalState::Form(form)) => {
            let status = form.picture_status.clone().unwrap_or_default();
            assert!(status.contains("is not an image file"), "status was {status}");
            assert_eq!(form.picture_value(), DEFAULT_PICTURE);
        }
        other => panic!("unexpected modal {other:?}"),
    }
}

// 7) Seed data loads and every sample id is unique
#[test]
fn sample_directory_loads() {
    use influencer_hub::seed::sample_influencers;
    use influencer_hub::DirectoryStore;

    let records = sample_influencers();
    let n = records.len();
    let store = DirectoryStore::from_records(records).expect("unique sample ids");
    assert_eq!(store.len(), n);
    assert!(n >= 6);
}

// 8) Loading records with a repeated id is rejected
#[test]
fn duplicate_ids_rejected_on_load() {
    use influencer_hub::seed::sample_influencers;
    use influencer_hub::{DirectoryStore, StoreError};

    let mut records = sample_influencers();
    records.push(records[0].clone());
    match DirectoryStore::from_records(records) {
        Err(StoreError::DuplicateId(id)) => assert_eq!(id.as_str(), "seed-1"),
        other => panic!("expected duplicate id, got {:?}", other.map(|s| s.len())),
    }
}
