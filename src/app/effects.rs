use crate::actions::{self, CopyMethod};
use crate::app::{App, Message, Model, ToastLevel, update};

/// Toast text for a finished copy. OSC 52 delivery cannot be confirmed, so
/// the terminal route only claims the text was sent.
pub(super) const fn copy_toast(method: CopyMethod) -> &'static str {
    match method {
        CopyMethod::System => "Content copied to clipboard!",
        CopyMethod::Terminal => "Content sent to terminal clipboard (OSC 52)",
    }
}

impl App {
    /// Run the I/O a message asks for and report the outcome as a toast.
    ///
    /// Failures never touch the document or its history.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Copy => Self::copy_document(model),
            Message::Download => Self::download_document(model),
            Message::ExportHtml => Self::export_document(model),
            Message::OpenUpload | Message::UploadInput(_) => Self::refresh_suggestions(model),
            Message::UploadComplete => {
                // Descend into a completed directory.
                if model
                    .upload
                    .as_ref()
                    .is_some_and(|p| p.input.ends_with('/') && p.suggestions.len() == 1)
                {
                    Self::refresh_suggestions(model);
                }
            }
            Message::UploadSubmit => Self::submit_upload(model),
            Message::ToggleTheme => {
                tracing::info!(theme = model.theme.label(), "action.theme");
            }
            _ => {}
        }
    }

    fn copy_document(model: &mut Model) {
        let text = model.text().to_owned();
        match model.clipboard.copy(&text) {
            Ok(method) => {
                tracing::info!(?method, bytes = text.len(), "action.copy");
                let message = copy_toast(method);
                model.show_toast(ToastLevel::Info, message);
            }
            Err(err) => {
                tracing::warn!(%err, "action.copy.failed");
                model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
            }
        }
    }

    fn download_document(model: &mut Model) {
        let text = model.text().to_owned();
        match actions::download(&model.download_dir, &text) {
            Ok(receipt) => {
                model.last_saved = text;
                model.show_toast(
                    ToastLevel::Info,
                    format!(
                        "Downloaded {} ({} bytes, {})",
                        receipt.path.display(),
                        receipt.bytes,
                        receipt.media_type
                    ),
                );
            }
            Err(err) => {
                tracing::warn!(%err, "action.download.failed");
                model.show_toast(ToastLevel::Error, format!("Download failed: {err}"));
            }
        }
    }

    fn export_document(model: &mut Model) {
        match actions::export_html(&model.download_dir, model.text()) {
            Ok(receipt) => model.show_toast(
                ToastLevel::Info,
                format!("Exported {}", receipt.path.display()),
            ),
            Err(err) => {
                tracing::warn!(%err, "action.export.failed");
                model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn refresh_suggestions(model: &mut Model) {
        if let Some(prompt) = model.upload.as_mut() {
            prompt.suggestions = actions::markdown_suggestions(&prompt.input);
            prompt.selected = None;
        }
    }

    fn submit_upload(model: &mut Model) {
        let Some(prompt) = model.upload.as_ref() else {
            return;
        };
        if prompt.input.trim().is_empty() {
            return;
        }
        let path = actions::resolve_input_path(&prompt.input);
        match actions::upload(&path) {
            Ok(upload) => {
                let label = upload.path.file_name().map_or_else(
                    || upload.path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                let toast = if upload.lossy {
                    (
                        ToastLevel::Warning,
                        format!("Loaded {label} (invalid UTF-8 replaced)"),
                    )
                } else {
                    (ToastLevel::Info, format!("Loaded {label}"))
                };
                let text = upload.text;
                *model = update(std::mem::take(model), Message::LoadText(text.clone()));
                model.upload = None;
                model.file_label = label;
                model.last_saved = text;
                model.show_toast(toast.0, toast.1);
            }
            Err(err) => {
                tracing::warn!(%err, "action.upload.failed");
                model.show_toast(ToastLevel::Error, format!("Upload failed: {err}"));
            }
        }
    }
}
