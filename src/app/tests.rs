use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use crate::config::Theme;
use crate::editor::Direction;

use super::effects::copy_toast;
use super::{App, Focus, Message, Model, ToastLevel, update};
use crate::actions::CopyMethod;

fn create_test_model(text: &str) -> Model {
    Model::new(text, (80, 24), Theme::Dark)
}

fn create_long_test_model() -> Model {
    let md: String = (1..=60).map(|i| format!("Line {i} of content.\n\n")).collect();
    create_test_model(&md)
}

fn type_str(mut model: Model, text: &str) -> Model {
    for ch in text.chars() {
        model = update(model, Message::InsertChar(ch));
    }
    model
}

fn assert_buffer_matches_history(model: &Model) {
    assert_eq!(model.buffer.text(), model.history.current());
}

#[test]
fn test_new_model_seeds_history_and_preview() {
    let model = create_test_model("# Title\n\nbody");
    assert_eq!(model.history.entries(), ["# Title\n\nbody"]);
    assert_eq!(model.history.index(), 0);
    assert_eq!(model.text(), "# Title\n\nbody");
    assert!(model.preview.line_count() > 0);
    assert!(!model.is_modified());
    assert_buffer_matches_history(&model);
}

#[test]
fn test_welcome_app_seeds_welcome_document() {
    let model = App::welcome().initial_model((80, 24));
    assert_eq!(model.text(), crate::document::WELCOME_DOCUMENT);
    assert_eq!(model.file_label, "welcome");
    assert_eq!(model.history.len(), 1);
}

#[test]
fn test_app_builder_carries_settings_into_model() {
    let dir = tempdir().unwrap();
    let model = App::new("x")
        .with_file_label("notes.md")
        .with_theme(Theme::Light)
        .with_download_dir(dir.path().to_path_buf())
        .with_config_paths(Some("/etc/markpad".into()), None)
        .initial_model((100, 30));
    assert_eq!(model.file_label, "notes.md");
    assert_eq!(model.theme, Theme::Light);
    assert_eq!(model.download_dir, dir.path());
    assert_eq!(
        model.config_global_path.as_deref(),
        Some(Path::new("/etc/markpad"))
    );
    assert_eq!(model.size, (100, 30));
}

#[test]
fn test_each_keystroke_records_one_history_entry() {
    let model = type_str(create_test_model(""), "abc");
    assert_eq!(model.history.entries(), ["", "a", "ab", "abc"]);
    assert_eq!(model.history.index(), 3);
    assert!(model.is_modified());
    assert_buffer_matches_history(&model);
}

#[test]
fn test_edit_after_undo_discards_future() {
    let mut model = create_test_model("A");
    model = update(model, Message::MoveToEnd);
    model = type_str(model, "BC");
    assert_eq!(model.history.entries(), ["A", "AB", "ABC"]);

    model = update(model, Message::Undo);
    assert_eq!(model.text(), "AB");
    assert_eq!(model.history.index(), 1);
    assert_buffer_matches_history(&model);

    model = update(model, Message::LoadText("X".to_string()));
    assert_eq!(model.history.entries(), ["A", "AB", "X"]);
    assert_eq!(model.history.index(), 2);
    assert_buffer_matches_history(&model);
}

#[test]
fn test_typing_after_undo_truncates_then_appends() {
    let mut model = type_str(create_test_model(""), "ab");
    model = update(model, Message::Undo);
    assert_eq!(model.text(), "a");
    model = update(model, Message::MoveToEnd);
    model = type_str(model, "z");
    assert_eq!(model.history.entries(), ["", "a", "az"]);
    assert_buffer_matches_history(&model);
}

#[test]
fn test_undo_at_seed_is_a_no_op() {
    let model = create_test_model("seed");
    let model = update(model, Message::Undo);
    assert_eq!(model.history.index(), 0);
    assert_eq!(model.history.len(), 1);
    assert_eq!(model.text(), "seed");
    assert_buffer_matches_history(&model);
}

#[test]
fn test_undo_past_every_entry_stops_at_seed() {
    let mut model = type_str(create_test_model(""), "hey");
    for _ in 0..10 {
        model = update(model, Message::Undo);
    }
    assert_eq!(model.history.index(), 0);
    assert_eq!(model.text(), "");
    assert_eq!(model.history.len(), 4);
}

#[test]
fn test_cursor_moves_do_not_touch_history() {
    let mut model = create_test_model("one\ntwo");
    for msg in [
        Message::MoveCursor(Direction::Down),
        Message::MoveEnd,
        Message::MoveHome,
        Message::MoveWordRight,
        Message::MoveToEnd,
        Message::MoveToStart,
        Message::EditorPageDown,
    ] {
        model = update(model, msg);
    }
    assert_eq!(model.history.len(), 1);
}

#[test]
fn test_no_op_edits_do_not_record() {
    let model = create_test_model("abc");
    // Cursor starts at the document start.
    let model = update(model, Message::DeleteBack);
    let model = update(model, Message::MoveToEnd);
    let model = update(model, Message::DeleteForward);
    let model = update(model, Message::Paste(String::new()));
    assert_eq!(model.history.len(), 1);
}

#[test]
fn test_paste_records_single_entry() {
    let model = create_test_model("");
    let model = update(model, Message::Paste("line one\nline two".to_string()));
    assert_eq!(model.history.len(), 2);
    assert_eq!(model.text(), "line one\nline two");
    assert_eq!(model.buffer.cursor().line, 1);
}

#[test]
fn test_split_and_join_lines() {
    let mut model = create_test_model("ab");
    model = update(model, Message::MoveCursor(Direction::Right));
    model = update(model, Message::SplitLine);
    assert_eq!(model.text(), "a\nb");
    model = update(model, Message::DeleteBack);
    assert_eq!(model.text(), "ab");
    assert_eq!(model.history.entries(), ["ab", "a\nb", "ab"]);
}

#[test]
fn test_edits_refresh_preview() {
    let model = create_test_model("");
    let before = model.preview.plain_lines();
    let model = type_str(model, "# Hi");
    assert_ne!(model.preview.plain_lines(), before);
    assert!(model.preview.plain_lines().iter().any(|l| l.contains("Hi")));
}

#[test]
fn test_toggle_theme_twice_restores_theme() {
    let model = create_test_model("# Title");
    let model = update(model, Message::ToggleTheme);
    assert_eq!(model.theme, Theme::Light);
    let model = update(model, Message::ToggleTheme);
    assert_eq!(model.theme, Theme::Dark);
    assert_eq!(model.history.len(), 1);
}

#[test]
fn test_copy_leaves_document_untouched() {
    let mut model = type_str(create_test_model(""), "abc");
    let entries = model.history.entries().to_vec();
    let index = model.history.index();
    App::dispatch(&mut model, Message::Copy);
    assert_eq!(model.history.entries(), entries);
    assert_eq!(model.history.index(), index);
    // Either outcome reports a toast.
    assert!(model.active_toast().is_some());
}

#[test]
fn test_download_writes_document_and_clears_modified() {
    let dir = tempdir().unwrap();
    let mut model = type_str(create_test_model(""), "# Saved");
    model.download_dir = dir.path().to_path_buf();
    assert!(model.is_modified());

    App::dispatch(&mut model, Message::Download);

    let written = fs::read_to_string(dir.path().join("document.md")).unwrap();
    assert_eq!(written, "# Saved");
    assert!(!model.is_modified());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("document.md"));
    assert!(message.contains("text/markdown"));
}

#[test]
fn test_repeated_download_does_not_overwrite() {
    let dir = tempdir().unwrap();
    let mut model = create_test_model("first");
    model.download_dir = dir.path().to_path_buf();
    App::dispatch(&mut model, Message::Download);
    model = type_str(model, "!");
    App::dispatch(&mut model, Message::Download);

    assert_eq!(fs::read_to_string(dir.path().join("document.md")).unwrap(), "first");
    assert_eq!(
        fs::read_to_string(dir.path().join("document (1).md")).unwrap(),
        "!first"
    );
}

#[test]
fn test_download_failure_reports_error_and_keeps_state() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file").unwrap();
    let mut model = type_str(create_test_model(""), "x");
    model.download_dir = blocker.join("nested");

    App::dispatch(&mut model, Message::Download);

    assert!(model.is_modified());
    assert_eq!(model.text(), "x");
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Error);
}

#[test]
fn test_export_html_writes_rendered_document() {
    let dir = tempdir().unwrap();
    let mut model = create_test_model("# Heading");
    model.download_dir = dir.path().to_path_buf();
    App::dispatch(&mut model, Message::ExportHtml);
    let html = fs::read_to_string(dir.path().join("document.html")).unwrap();
    assert!(html.contains("<h1>"));
    assert!(html.contains("Heading"));
}

#[test]
fn test_download_then_upload_round_trip() {
    let dir = tempdir().unwrap();
    let mut model = create_test_model("");
    model = type_str(model, "# Round\n");
    model = update(model, Message::Paste("trip *ok*".to_string()));
    model.download_dir = dir.path().to_path_buf();
    let original = model.text().to_owned();
    App::dispatch(&mut model, Message::Download);

    let mut fresh = create_test_model("something else");
    App::dispatch(&mut fresh, Message::OpenUpload);
    let path = dir.path().join("document.md");
    App::dispatch(&mut fresh, Message::UploadInput(path.display().to_string()));
    App::dispatch(&mut fresh, Message::UploadSubmit);

    assert_eq!(fresh.text(), original);
    assert_eq!(fresh.history.entries(), ["something else", original.as_str()]);
    assert!(fresh.upload.is_none());
    assert_eq!(fresh.file_label, "document.md");
    assert!(!fresh.is_modified());
    assert_buffer_matches_history(&fresh);
}

#[test]
fn test_upload_failure_keeps_document_and_prompt() {
    let dir = tempdir().unwrap();
    let mut model = type_str(create_test_model(""), "kept");
    let entries = model.history.entries().to_vec();

    App::dispatch(&mut model, Message::OpenUpload);
    let missing = dir.path().join("missing.md");
    App::dispatch(&mut model, Message::UploadInput(missing.display().to_string()));
    App::dispatch(&mut model, Message::UploadSubmit);

    assert_eq!(model.history.entries(), entries);
    assert!(model.upload.is_some());
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Error);
}

#[test]
fn test_upload_of_directory_keeps_document_and_prompt() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("folder.md");
    fs::create_dir(&folder).unwrap();
    let mut model = type_str(create_test_model("seed"), "!");
    let entries = model.history.entries().to_vec();

    App::dispatch(&mut model, Message::OpenUpload);
    App::dispatch(&mut model, Message::UploadInput(folder.display().to_string()));
    App::dispatch(&mut model, Message::UploadSubmit);

    assert_eq!(model.history.entries(), entries);
    assert_eq!(model.history.index(), entries.len() - 1);
    assert_buffer_matches_history(&model);
    assert!(model.upload.is_some());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Upload failed"));
}

#[test]
fn test_upload_of_invalid_utf8_warns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.md");
    fs::write(&path, b"ok \xff bytes").unwrap();
    let mut model = create_test_model("");
    App::dispatch(&mut model, Message::OpenUpload);
    App::dispatch(&mut model, Message::UploadInput(path.display().to_string()));
    App::dispatch(&mut model, Message::UploadSubmit);

    assert_eq!(model.text(), "ok \u{fffd} bytes");
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Warning);
}

#[test]
fn test_empty_upload_submit_does_nothing() {
    let mut model = create_test_model("doc");
    App::dispatch(&mut model, Message::OpenUpload);
    App::dispatch(&mut model, Message::UploadSubmit);
    assert!(model.upload.is_some());
    assert!(model.active_toast().is_none());
    assert_eq!(model.history.len(), 1);
}

#[test]
fn test_upload_complete_cycles_suggestions() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("alpha.md"), "a").unwrap();
    fs::write(dir.path().join("beta.markdown"), "b").unwrap();
    fs::write(dir.path().join("skip.txt"), "c").unwrap();
    let prefix = format!("{}/", dir.path().display());

    let mut model = create_test_model("");
    App::dispatch(&mut model, Message::OpenUpload);
    App::dispatch(&mut model, Message::UploadInput(prefix.clone()));
    let suggestions = model.upload.as_ref().unwrap().suggestions.clone();
    assert_eq!(
        suggestions,
        [format!("{prefix}alpha.md"), format!("{prefix}beta.markdown")]
    );

    App::dispatch(&mut model, Message::UploadComplete);
    assert_eq!(model.upload.as_ref().unwrap().input, suggestions[0]);
    App::dispatch(&mut model, Message::UploadComplete);
    assert_eq!(model.upload.as_ref().unwrap().input, suggestions[1]);
    App::dispatch(&mut model, Message::UploadComplete);
    assert_eq!(model.upload.as_ref().unwrap().selected, Some(0));
}

#[test]
fn test_cancel_upload_closes_prompt() {
    let model = update(create_test_model(""), Message::OpenUpload);
    assert!(model.upload.is_some());
    let model = update(model, Message::CancelUpload);
    assert!(model.upload.is_none());
}

#[test]
fn test_open_upload_hides_help() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::OpenUpload);
    assert!(!model.help_visible);
}

#[test]
fn test_load_text_resets_cursor_and_preview_scroll() {
    let mut model = create_long_test_model();
    model = update(model, Message::MoveToEnd);
    model = update(model, Message::PreviewScrollDown(10));
    model = update(model, Message::LoadText("# New\n\ntext".to_string()));
    assert_eq!(model.buffer.cursor().line, 0);
    assert_eq!(model.buffer.cursor().col, 0);
    assert_eq!(model.viewport.offset(), 0);
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_quit_with_unsaved_changes_asks_for_confirmation() {
    let model = type_str(create_test_model(""), "x");
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);
    assert_eq!(model.active_toast().unwrap().1, ToastLevel::Warning);

    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_confirmation_resets_after_other_input() {
    let model = type_str(create_test_model(""), "x");
    let model = update(model, Message::Quit);
    let model = update(model, Message::MoveHome);
    assert!(!model.quit_confirmed);
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

#[test]
fn test_quit_without_changes_exits_immediately() {
    let model = update(create_test_model("clean"), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_switch_focus_toggles_between_panes() {
    let model = create_test_model("");
    assert_eq!(model.focus, Focus::Editor);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Preview);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Focus::Editor);
    let model = update(model, Message::SetFocus(Focus::Preview));
    assert_eq!(model.focus, Focus::Preview);
}

#[test]
fn test_click_editor_places_cursor_and_focuses() {
    let model = update(
        create_test_model("first\nsecond line"),
        Message::SetFocus(Focus::Preview),
    );
    let model = update(model, Message::ClickEditor { line: 1, col: 3 });
    assert_eq!(model.focus, Focus::Editor);
    assert_eq!(model.buffer.cursor().line, 1);
    assert_eq!(model.buffer.cursor().col, 3);
}

#[test]
fn test_preview_scroll_messages() {
    let mut model = create_long_test_model();
    model = update(model, Message::PreviewScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
    model = update(model, Message::PreviewScrollUp(2));
    assert_eq!(model.viewport.offset(), 3);
    model = update(model, Message::PreviewBottom);
    assert_eq!(model.viewport.offset(), model.viewport.max_offset());
    model = update(model, Message::PreviewTop);
    assert_eq!(model.viewport.offset(), 0);
    model = update(model, Message::PreviewPageDown);
    assert!(model.viewport.offset() > 0);
}

#[test]
fn test_cursor_below_view_scrolls_editor() {
    let mut model = create_long_test_model();
    model = update(model, Message::MoveToEnd);
    let rows = model.editor_rows();
    assert!(model.editor_scroll_offset > 0);
    assert!(model.buffer.cursor().line < model.editor_scroll_offset + rows);
    model = update(model, Message::MoveToStart);
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_editor_scroll_is_clamped() {
    let model = create_test_model("short");
    let model = update(model, Message::EditorScroll(50));
    assert_eq!(model.editor_scroll_offset, 0);

    let model = update(create_long_test_model(), Message::EditorScroll(1_000));
    let max = model.buffer.line_count() - model.editor_rows();
    assert_eq!(model.editor_scroll_offset, max);
    let model = update(model, Message::EditorScroll(-1_000));
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_resize_rewraps_preview() {
    let long_line = "word ".repeat(40);
    let model = create_test_model(&long_line);
    let wide = model.preview.line_count();
    let model = update(model, Message::Resize(40, 24));
    assert_eq!(model.size, (40, 24));
    assert!(model.preview.line_count() > wide);
}

#[test]
fn test_toast_expires() {
    let mut model = create_test_model("");
    model.show_toast(ToastLevel::Info, "hello");
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.active_toast().is_some());
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(10)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_copy_toast_only_claims_delivery_for_system_clipboard() {
    assert_eq!(copy_toast(CopyMethod::System), "Content copied to clipboard!");
    let terminal = copy_toast(CopyMethod::Terminal);
    assert!(terminal.contains("sent to terminal clipboard"));
    assert!(!terminal.contains("copied"));
}
