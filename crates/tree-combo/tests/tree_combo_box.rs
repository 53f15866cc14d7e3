//! Integration tests for TreeComboBox driven through its public API.
//!
//! Set `RUST_LOG=tree_combo=debug` to see the popup lifecycle while a test
//! runs.

use std::sync::Arc;

use parking_lot::Mutex;
use tree_combo::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A three-column file tree:
///
/// ```text
/// home            /home            dir
/// ├── notes.txt   /home/notes.txt  file
/// └── photos      /home/photos     dir
///     └── cat.png /home/photos/cat.png  image
/// etc             /etc             dir
/// ```
struct Files {
    model: Arc<TreeModel<StandardItem>>,
    home: NodeId,
    notes: NodeId,
    photos: NodeId,
    cat: NodeId,
    etc: NodeId,
}

fn entry(name: &str, path: &str, kind: &str) -> StandardItem {
    StandardItem::new(name)
        .with_column(path)
        .with_column(kind)
        .with_icon(Icon::from_name(kind))
}

fn files() -> Files {
    let model = Arc::new(TreeModel::<StandardItem>::new().with_column_count(3));
    let home = model.add_root(entry("home", "/home", "dir"));
    let notes = model
        .add_child(home, entry("notes.txt", "/home/notes.txt", "file"))
        .expect("home exists");
    let photos = model
        .add_child(home, entry("photos", "/home/photos", "dir"))
        .expect("home exists");
    let cat = model
        .add_child(photos, entry("cat.png", "/home/photos/cat.png", "image"))
        .expect("photos exists");
    let etc = model.add_root(entry("etc", "/etc", "dir"));
    Files {
        model,
        home,
        notes,
        photos,
        cat,
        etc,
    }
}

fn combo_over(files: &Files) -> TreeComboBox {
    init_tracing();
    let mut combo = TreeComboBox::new();
    combo.set_model(files.model.clone());
    combo
}

fn visible_columns(combo: &TreeComboBox) -> Vec<usize> {
    combo.view().header().visible_sections().collect()
}

/// Clicks a popup point: press then release, both routed through the popup.
fn click_popup(combo: &mut TreeComboBox, pos: (f32, f32)) {
    combo.popup_event(&mut WidgetEvent::left_press(pos));
    combo.popup_event(&mut WidgetEvent::left_release(pos));
}

#[test]
fn test_only_showing_column_stays_visible() {
    let files = files();
    let mut combo = combo_over(&files);

    for column in [2, 0, 1, 1, 2, 0] {
        combo.set_showing_column(column);
        assert_eq!(visible_columns(&combo), vec![column]);
        assert_eq!(combo.showing_column(), column);
    }
}

#[test]
fn test_set_model_resets_visible_column() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_showing_column(2);
    combo.set_index_column(1);
    combo.set_showing_icon(true);
    combo.set_display_text("kept");

    let other = self::files();
    combo.set_model(other.model.clone());

    assert_eq!(visible_columns(&combo), vec![0]);
    assert_eq!(combo.showing_column(), 0);
    assert_eq!(combo.index_column(), 1);
    assert!(combo.showing_icon());
    assert_eq!(combo.display_text(), "kept");
}

#[test]
fn test_current_model_index_round_trip() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_showing_column(2);
    combo.set_index_column(1);

    let cat = files.model.index_of(files.cat, 0);
    combo.set_current_model_index(cat);

    assert_eq!(combo.display_text(), "image");
    assert_eq!(combo.display_icon(), None);

    let picked = combo.current_model_index();
    assert_eq!(picked, files.model.index_of(files.cat, 1));
    assert_eq!(
        files.model.display_text(&picked).as_deref(),
        Some("/home/photos/cat.png")
    );
    assert_eq!(combo.combo_root_index(), files.model.index_of(files.photos, 0));
    assert_eq!(combo.current_row(), Some(0));
}

#[test]
fn test_commit_uses_icon_of_showing_column() {
    let files = files();
    let mut combo = combo_over(&files);

    combo.set_current_model_index(files.model.index_of(files.notes, 0));
    assert_eq!(combo.display_text(), "notes.txt");
    assert_eq!(combo.display_icon(), Some(&Icon::from_name("file")));
}

#[test]
fn test_press_inside_row_commits() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.show_popup();
    assert!(combo.is_popup_visible());

    // Row 1 is "etc" while "home" is collapsed.
    click_popup(&mut combo, (120.0, 30.0));

    assert!(!combo.is_popup_visible());
    assert_eq!(combo.display_text(), "etc");
    assert_eq!(combo.current_model_index(), files.model.index_of(files.etc, 0));
}

#[test]
fn test_press_outside_rows_keeps_label() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_current_model_index(files.model.index_of(files.etc, 0));
    combo.show_popup();

    // Below the last row.
    click_popup(&mut combo, (120.0, 140.0));

    assert_eq!(combo.display_text(), "etc");
    assert!(combo.is_popup_visible());
    assert!(!combo.is_skip_armed());
}

#[test]
fn test_expand_indicator_browses_without_commit() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.show_popup();

    // Expand "home" with its indicator, then pick "photos" (row 2).
    click_popup(&mut combo, (8.0, 12.0));
    assert!(combo.is_popup_visible());
    assert!(combo.view().is_expanded(&files.model.index_of(files.home, 0)));
    assert_eq!(combo.display_text(), "");

    click_popup(&mut combo, (120.0, 60.0));
    assert!(!combo.is_popup_visible());
    assert_eq!(combo.display_text(), "photos");
}

#[test]
fn test_skip_flag_is_one_shot() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.show_popup();

    combo.popup_event(&mut WidgetEvent::left_press((120.0, 140.0)));
    assert!(combo.is_skip_armed());

    combo.hide_popup();
    assert!(!combo.is_skip_armed());
    assert!(combo.is_popup_visible());

    // The next close commits normally.
    combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
    combo.hide_popup();
    assert!(!combo.is_popup_visible());
    assert_eq!(combo.display_text(), "home");
}

#[test]
fn test_skip_flag_is_per_instance() {
    let files = files();
    let mut first = combo_over(&files);
    let mut second = combo_over(&files);
    first.show_popup();
    second.show_popup();

    first.popup_event(&mut WidgetEvent::left_press((120.0, 140.0)));
    assert!(first.is_skip_armed());
    assert!(!second.is_skip_armed());
}

#[test]
fn test_set_display_text_requests_repaint() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_current_model_index(files.model.index_of(files.home, 0));
    combo.widget_base_mut().mark_painted();

    combo.set_display_text("X");

    assert_eq!(combo.display_text(), "X");
    assert!(combo.widget_base().needs_repaint());
    assert_eq!(combo.current_model_index(), files.model.index_of(files.home, 0));

    let mut painter = RecordingPainter::new();
    combo.paint(&mut painter);
    assert_eq!(painter.last_combo_label(), Some(("X", None)));
}

#[test]
fn test_root_index_restored_after_close() {
    let files = files();
    let mut combo = combo_over(&files);
    let home = files.model.index_of(files.home, 0);
    combo.set_root_model_index(home.clone());

    combo.show_popup();
    assert!(!combo.view().root_index().is_valid());
    combo.hide_popup();

    assert_eq!(combo.root_model_index(), home);
    assert_eq!(combo.view().root_index(), home);

    combo.show_popup();
    combo.popup_event(&mut WidgetEvent::key(Key::Escape));
    assert_eq!(combo.root_model_index(), home);
    assert_eq!(combo.view().root_index(), home);
}

#[test]
fn test_showing_icon_toggles_painted_icon() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_current_model_index(files.model.index_of(files.home, 0));
    let folder = Icon::from_name("dir");

    let paint = |combo: &TreeComboBox| {
        let mut painter = RecordingPainter::new();
        combo.paint(&mut painter);
        painter
    };

    combo.set_showing_icon(true);
    assert_eq!(paint(&combo).last_combo_label(), Some(("home", Some(&folder))));

    combo.set_showing_icon(false);
    assert_eq!(combo.display_icon(), Some(&folder));
    assert_eq!(paint(&combo).last_combo_label(), Some(("home", None)));

    combo.set_showing_icon(true);
    assert_eq!(paint(&combo).last_combo_label(), Some(("home", Some(&folder))));
}

#[test]
fn test_signals_follow_commits() {
    let files = files();
    let mut combo = combo_over(&files);

    let events = Arc::new(Mutex::new(Vec::new()));
    let e = events.clone();
    combo.popup_shown.connect(move |_| e.lock().push("shown".to_string()));
    let e = events.clone();
    combo.popup_hidden.connect(move |_| e.lock().push("hidden".to_string()));
    let e = events.clone();
    combo
        .current_text_changed
        .connect(move |text| e.lock().push(format!("text:{text}")));

    combo.event(&mut WidgetEvent::key(Key::Space));
    combo.popup_event(&mut WidgetEvent::key(Key::ArrowDown));
    combo.popup_event(&mut WidgetEvent::key(Key::Enter));

    assert_eq!(
        *events.lock(),
        vec!["shown".to_string(), "hidden".to_string(), "text:home".to_string()]
    );
}

#[test]
fn test_config_file_drives_construction() {
    init_tracing();
    let config = TreeComboConfig::from_toml_str(
        r#"
        showing_icon = true
        width = 300.0
        placeholder = "Select a folder"
        "#,
    )
    .expect("valid config");

    let files = files();
    let mut combo = TreeComboBox::with_config(&config);
    assert_eq!(combo.display_text(), "Select a folder");
    assert_eq!(combo.size().width, 300.0);

    combo.set_model(files.model.clone());
    combo.set_current_model_index(files.model.index_of(files.etc, 0));

    let mut painter = RecordingPainter::new();
    combo.paint(&mut painter);
    assert_eq!(
        painter.last_combo_label(),
        Some(("etc", Some(&Icon::from_name("dir"))))
    );
}

#[test]
fn test_committed_row_survives_sibling_changes() {
    init_tracing();
    let model = Arc::new(TreeModel::<StandardItem>::new());
    let a = model.add_root(StandardItem::new("a"));
    let b = model.add_root(StandardItem::new("b"));
    let mut combo = TreeComboBox::new();
    combo.set_model(model.clone());

    combo.set_current_model_index(model.index_of(b, 0));
    assert_eq!(combo.current_row(), Some(1));

    model.remove(a);
    model.add_root(StandardItem::new("c"));

    let picked = combo.current_model_index();
    assert_eq!(model.display_text(&picked).as_deref(), Some("b"));
    combo.hide_popup();
    assert_eq!(combo.display_text(), "b");
    assert_eq!(combo.current_row(), Some(0));
}

#[test]
fn test_committed_row_survives_removal_above_it() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.set_current_model_index(files.model.index_of(files.etc, 0));

    files.model.remove(files.home);

    assert_eq!(combo.current_model_index(), files.model.index_of(files.etc, 0));
    combo.hide_popup();
    assert_eq!(combo.display_text(), "etc");

    // The popup highlights the same row the combo reports.
    combo.show_popup();
    assert_eq!(combo.view().visible_indices(), vec![combo.current_model_index()]);
}

#[test]
fn test_code_expansion_refits_open_popup() {
    let files = files();
    let mut combo = combo_over(&files);
    combo.show_popup();
    let before = combo.view().header().section_size(0);

    let home = files.model.index_of(files.home, 0);
    let photos = files.model.index_of(files.photos, 0);
    {
        let mut view = combo.view_mut();
        view.expand(&home);
        view.expand(&photos);
    }

    // "cat.png" at depth 2 is wider than the collapsed rows.
    assert!(combo.view().header().section_size(0) > before);
    assert_eq!(combo.view().visible_row_count(), 5);
}

#[test]
fn test_activated_follows_user_input_only() {
    let files = files();
    let mut combo = combo_over(&files);

    let activated = Arc::new(Mutex::new(Vec::new()));
    let a = activated.clone();
    combo.activated.connect(move |index| a.lock().push(index.clone()));

    combo.set_current_model_index(files.model.index_of(files.etc, 0));
    combo.show_popup();
    combo.hide_popup();
    assert!(activated.lock().is_empty());

    combo.show_popup();
    click_popup(&mut combo, (120.0, 30.0));
    assert_eq!(*activated.lock(), vec![files.model.index_of(files.etc, 0)]);
}
