use std::fs;

use markpad::actions;
use markpad::history::EditHistory;

#[test]
fn test_download_then_upload_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let source = include_str!("fixtures/sample.md");

    let receipt = actions::download(dir.path(), source).unwrap();
    assert_eq!(receipt.bytes, source.len());
    assert_eq!(receipt.media_type, actions::MARKDOWN_MEDIA_TYPE);

    let upload = actions::upload(&receipt.path).unwrap();
    assert!(!upload.lossy);
    assert_eq!(upload.text, source);
}

#[test]
fn test_uploaded_text_enters_history_after_current_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incoming.md");
    fs::write(&path, "# Incoming").unwrap();

    let mut history = EditHistory::new("A");
    history.apply_edit("AB");
    history.apply_edit("ABC");
    history.undo();

    let upload = actions::upload(&path).unwrap();
    assert_eq!(history.load_external_text(upload.text), "# Incoming");
    assert_eq!(history.entries(), ["A", "AB", "# Incoming"]);
    assert_eq!(history.index(), 2);
}

#[test]
fn test_export_html_matches_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let source = include_str!("fixtures/sample.md");

    let receipt = actions::export_html(dir.path(), source).unwrap();
    assert_eq!(receipt.media_type, actions::HTML_MEDIA_TYPE);
    let written = fs::read_to_string(&receipt.path).unwrap();
    assert_eq!(written, markpad::document::to_html(source));
}
