//! Timelapse Generator Main Application
//! Main window with control panel and image strip. Owns the project.

use crate::config::EncodeSettings;
use crate::encode::{encode_timelapse, with_default_extension, OutputFormat, TimedFrame};
use crate::gui::{
    ControlPanel, ControlPanelAction, DurationPrompt, ImageStrip, ImageStripAction, Notice,
    NoticeQueue, PanelState, PromptOutcome, ThumbnailCache,
};
use crate::project::{Direction, TimelapseProject};
use anyhow::Context;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Why an encode was started; decides what happens when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodePurpose {
    Preview,
    Save,
}

/// Export waiting on the duration prompt
#[derive(Debug, Clone, PartialEq)]
enum PendingExport {
    /// Output path was already chosen
    Preview(PathBuf),
    /// Output path is chosen after the prompt
    Save,
}

/// Encode result from background thread
enum EncodeEvent {
    Progress(f32, String),
    Complete { output: PathBuf, purpose: EncodePurpose },
    Error(String),
}

/// Main application window.
pub struct TimelapseApp {
    project: TimelapseProject,
    control_panel: ControlPanel,
    thumbnails: ThumbnailCache,
    notices: NoticeQueue,
    prompt: Option<(DurationPrompt, PendingExport)>,
    settings: EncodeSettings,

    // Async encoding
    encode_rx: Option<Receiver<EncodeEvent>>,
    is_encoding: bool,
}

impl Default for TimelapseApp {
    fn default() -> Self {
        Self {
            project: TimelapseProject::new(),
            control_panel: ControlPanel::new(),
            thumbnails: ThumbnailCache::new(),
            notices: NoticeQueue::default(),
            prompt: None,
            settings: EncodeSettings::default(),
            encode_rx: None,
            is_encoding: false,
        }
    }
}

impl TimelapseApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        crate::gui::theme::apply(&cc.egui_ctx);
        Self::default()
    }

    /// Handle "Add Images": append every picked file in dialog order.
    fn handle_add_images(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .set_title("Select Images")
            .add_filter("JPEG files", &["jpg", "jpeg"])
            .add_filter("All files", &["*"])
            .pick_files()
        else {
            return; // User cancelled
        };
        self.add_images(paths);
    }

    fn add_images(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        log::info!("Adding {} image(s)", paths.len());
        for path in paths {
            self.project.images.append(path);
        }
        // Only paths without a texture are decoded
        let all: Vec<PathBuf> = self.project.images.paths().map(Path::to_path_buf).collect();
        self.thumbnails.request(&all);
        self.control_panel.set_progress(
            0.0,
            &format!("{} image(s) in timelapse", self.project.images.len()),
        );
    }

    fn handle_move(&mut self, direction: Direction) {
        if self.project.images.move_selected(direction) {
            log::debug!(
                "Moved image {:?} to position {:?}",
                direction,
                self.project.images.selected()
            );
        }
    }

    fn handle_select_output_directory(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Select Output Directory")
            .pick_folder()
        {
            log::info!("Output directory: {}", dir.display());
            self.project.set_output_directory(dir);
        }
    }

    /// Handle "Preview": pick the preview file first, then validate and prompt.
    fn handle_preview(&mut self) {
        let Some(path) = save_dialog("Select Preview File Type", "preview.mp4", None) else {
            return; // User cancelled
        };
        self.request_preview(with_default_extension(path));
    }

    fn request_preview(&mut self, output: PathBuf) {
        if let Err(e) = self.project.validate_for_export() {
            self.notices.push(Notice::warning(e.title(), e.to_string()));
            return;
        }
        self.open_prompt(PendingExport::Preview(output));
    }

    /// Handle "Save": validate, prompt for duration, then pick the file.
    fn handle_save(&mut self) {
        if let Err(e) = self.project.validate_for_save() {
            self.notices.push(Notice::warning(e.title(), e.to_string()));
            return;
        }
        self.open_prompt(PendingExport::Save);
    }

    fn open_prompt(&mut self, pending: PendingExport) {
        self.prompt = Some((DurationPrompt::new(self.project.duration()), pending));
    }

    /// Continue a pending export once the duration is confirmed.
    fn handle_duration_confirmed(&mut self, seconds: f64, pending: PendingExport) {
        if let Err(e) = self.project.set_duration(seconds) {
            self.notices.push(Notice::warning(e.title(), e.to_string()));
            return;
        }

        match pending {
            PendingExport::Preview(output) => self.start_encode(output, EncodePurpose::Preview),
            PendingExport::Save => {
                let dir = self.project.output_directory().map(Path::to_path_buf);
                let Some(path) = save_dialog("Save Timelapse", "timelapse.mp4", dir.as_deref())
                else {
                    return; // User cancelled
                };
                self.start_encode(with_default_extension(path), EncodePurpose::Save);
            }
        }
    }

    /// Start encoding in background thread
    fn start_encode(&mut self, output: PathBuf, purpose: EncodePurpose) {
        if self.is_encoding {
            return;
        }
        if let Err(e) = OutputFormat::from_path(&output) {
            self.notices.push(Notice::warning("Unsupported Format", e.to_string()));
            return;
        }

        let frames: Vec<TimedFrame> = self
            .project
            .export_sequence()
            .into_iter()
            .map(TimedFrame::from)
            .collect();
        let settings = self.settings.clone();

        let (tx, rx) = channel();
        self.encode_rx = Some(rx);
        self.is_encoding = true;
        self.control_panel.set_progress(0.0, "Encoding...");

        thread::spawn(move || {
            let progress_tx = tx.clone();
            let mut progress = |done: usize, total: usize| {
                let pct = done as f32 / total.max(1) as f32 * 100.0;
                let _ = progress_tx.send(EncodeEvent::Progress(
                    pct,
                    format!("Encoding frame {}/{}...", done, total),
                ));
            };

            match run_encode(&frames, &output, settings, &mut progress) {
                Ok(()) => {
                    let _ = tx.send(EncodeEvent::Complete { output, purpose });
                }
                Err(e) => {
                    let _ = tx.send(EncodeEvent::Error(format!("{:#}", e)));
                }
            }
        });
    }

    /// Check for encode results
    fn check_encode_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.encode_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            loop {
                let event = match rx.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        // Worker went away without a final event
                        if self.is_encoding {
                            let error = "Encoder stopped unexpectedly".to_string();
                            log::error!("{}", error);
                            self.control_panel
                                .set_progress(0.0, &format!("Error: {}", error));
                            self.notices.push(Notice::error("Encoding Failed", error));
                            self.is_encoding = false;
                        }
                        should_keep_receiver = false;
                        break;
                    }
                };
                match event {
                    EncodeEvent::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    EncodeEvent::Complete { output, purpose } => {
                        self.is_encoding = false;
                        should_keep_receiver = false;
                        self.finish_encode(&output, purpose);
                    }
                    EncodeEvent::Error(error) => {
                        log::error!("{}", error);
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.notices.push(Notice::error("Encoding Failed", error));
                        self.is_encoding = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.encode_rx = Some(rx);
            }
        }
    }

    fn finish_encode(&mut self, output: &Path, purpose: EncodePurpose) {
        match purpose {
            EncodePurpose::Preview => {
                self.control_panel.set_progress(100.0, "Complete! Opening preview");
                if let Err(e) = open::that(output) {
                    log::warn!("Could not open {}: {}", output.display(), e);
                    self.notices.push(Notice::warning(
                        "Preview",
                        format!("Preview written to {} but could not be opened: {}", output.display(), e),
                    ));
                }
            }
            EncodePurpose::Save => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Saved {}", output.display()));
                self.notices
                    .push(Notice::info("Success", "Timelapse saved successfully!"));
            }
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some((prompt, _)) = self.prompt.as_mut() else {
            return;
        };
        match prompt.show(ctx) {
            PromptOutcome::Open => {}
            PromptOutcome::Cancelled => {
                self.prompt = None;
            }
            PromptOutcome::Confirmed(seconds) => {
                if let Some((_, pending)) = self.prompt.take() {
                    self.handle_duration_confirmed(seconds, pending);
                }
            }
        }
    }
}

/// Encode on the worker thread; errors are flattened for display.
fn run_encode(
    frames: &[TimedFrame],
    output: &Path,
    settings: EncodeSettings,
    progress: &mut dyn FnMut(usize, usize),
) -> anyhow::Result<()> {
    encode_timelapse(frames, output, settings, progress)
        .with_context(|| format!("Could not write {}", output.display()))
}

/// Save dialog with the MP4/GIF/AVI filters.
fn save_dialog(title: &str, file_name: &str, directory: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(title).set_file_name(file_name);
    for format in OutputFormat::all() {
        dialog = dialog.add_filter(format.filter_label(), &[format.extension()]);
    }
    if let Some(dir) = directory {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}

impl eframe::App for TimelapseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_encode_results();
        let loading_thumbnails = self.thumbnails.poll(ctx);

        // Request repaint while encoding or decoding thumbnails
        if self.is_encoding || loading_thumbnails {
            ctx.request_repaint();
        }

        // Modal notices and the duration prompt block the rest of the window
        self.notices.show(ctx);
        self.show_prompt(ctx);
        let modal_open = self.notices.is_blocking() || self.prompt.is_some();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        let state = PanelState {
                            image_count: self.project.images.len(),
                            has_selection: self.project.images.selected().is_some(),
                            duration: self.project.duration(),
                            output_directory: self.project.output_directory(),
                            busy: self.is_encoding,
                        };
                        let action = self.control_panel.show(ui, &state);

                        match action {
                            ControlPanelAction::AddImages => self.handle_add_images(),
                            ControlPanelAction::MoveUp => self.handle_move(Direction::Up),
                            ControlPanelAction::MoveDown => self.handle_move(Direction::Down),
                            ControlPanelAction::SelectOutputDirectory => {
                                self.handle_select_output_directory()
                            }
                            ControlPanelAction::Preview => self.handle_preview(),
                            ControlPanelAction::Save => self.handle_save(),
                            ControlPanelAction::None => {}
                        }
                    });
                });
            });

        // Central panel - Image Strip
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open && !self.is_encoding, |ui| {
                if let ImageStripAction::Select(idx) =
                    ImageStrip::show(ui, &self.project.images, &self.thumbnails)
                {
                    // Clicking the selected row again deselects it
                    if self.project.images.selected() == Some(idx) {
                        self.project.images.clear_selection();
                    } else {
                        self.project.images.select(idx);
                    }
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::dialogs::NoticeKind;
    use crate::project::ProjectError;

    fn app_with_images(names: &[&str]) -> TimelapseApp {
        let mut app = TimelapseApp::default();
        for name in names {
            app.project.images.append(*name);
        }
        app
    }

    #[test]
    fn preview_of_empty_project_warns_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("preview.mp4");
        let mut app = TimelapseApp::default();

        app.request_preview(output.clone());

        let notice = app.notices.front().unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert_eq!(notice.title, "No Images");
        assert!(app.prompt.is_none());
        assert!(!app.is_encoding);
        assert!(!output.exists());
    }

    #[test]
    fn preview_with_images_asks_for_duration() {
        let mut app = app_with_images(&["A", "B"]);
        app.request_preview(PathBuf::from("/tmp/p.gif"));
        assert!(!app.notices.is_blocking());
        match &app.prompt {
            Some((_, PendingExport::Preview(p))) => assert_eq!(p, Path::new("/tmp/p.gif")),
            _ => panic!("prompt not opened"),
        }
    }

    #[test]
    fn save_without_output_directory_warns() {
        let mut app = app_with_images(&["A"]);
        app.handle_save();
        assert_eq!(
            app.notices.front().unwrap().message,
            ProjectError::NoOutputDirectory.to_string()
        );
        assert!(app.prompt.is_none());
    }

    #[test]
    fn save_with_directory_opens_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_images(&["A"]);
        app.project.set_output_directory(tmp.path());
        app.handle_save();
        assert!(matches!(app.prompt, Some((_, PendingExport::Save))));
    }

    #[test]
    fn unsupported_extension_is_reported_without_encoding() {
        let mut app = app_with_images(&["A"]);
        app.start_encode(PathBuf::from("/tmp/out.webm"), EncodePurpose::Save);
        assert!(!app.is_encoding);
        assert_eq!(app.notices.front().unwrap().title, "Unsupported Format");
    }

    #[test]
    fn confirmed_duration_is_stored_before_encoding() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with_images(&["missing.png"]);
        let output = tmp.path().join("out.gif");
        app.handle_duration_confirmed(2.5, PendingExport::Preview(output));
        assert_eq!(app.project.duration(), 2.5);
        assert!(app.is_encoding);
    }

    #[test]
    fn encode_error_surfaces_as_notice() {
        let mut app = TimelapseApp::default();
        let (tx, rx) = channel();
        app.encode_rx = Some(rx);
        app.is_encoding = true;

        tx.send(EncodeEvent::Progress(50.0, "Encoding frame 1/2...".into()))
            .unwrap();
        tx.send(EncodeEvent::Error("Image not found: a.png".into()))
            .unwrap();
        app.check_encode_results();

        assert!(!app.is_encoding);
        assert!(app.encode_rx.is_none());
        let notice = app.notices.front().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(app.control_panel.status.starts_with("Error"));
    }

    #[test]
    fn completed_save_reports_success() {
        let mut app = TimelapseApp::default();
        let (tx, rx) = channel();
        app.encode_rx = Some(rx);
        app.is_encoding = true;

        tx.send(EncodeEvent::Complete {
            output: PathBuf::from("/tmp/lapse.mp4"),
            purpose: EncodePurpose::Save,
        })
        .unwrap();
        app.check_encode_results();

        assert!(!app.is_encoding);
        assert_eq!(
            app.notices.front().unwrap().message,
            "Timelapse saved successfully!"
        );
        assert_eq!(app.control_panel.progress, 100.0);
    }

    #[test]
    fn pending_progress_keeps_receiver() {
        let mut app = TimelapseApp::default();
        let (tx, rx) = channel();
        app.encode_rx = Some(rx);
        app.is_encoding = true;
        tx.send(EncodeEvent::Progress(25.0, "Encoding frame 1/4...".into()))
            .unwrap();
        app.check_encode_results();
        assert!(app.encode_rx.is_some());
        assert_eq!(app.control_panel.progress, 25.0);
    }

    #[test]
    fn vanished_worker_ends_encoding_with_error() {
        let mut app = TimelapseApp::default();
        let (tx, rx) = channel();
        app.encode_rx = Some(rx);
        app.is_encoding = true;
        tx.send(EncodeEvent::Progress(10.0, "Encoding frame 1/10...".into()))
            .unwrap();
        drop(tx);

        app.check_encode_results();

        assert!(!app.is_encoding);
        assert!(app.encode_rx.is_none());
        let notice = app.notices.front().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Encoder stopped unexpectedly");
        assert!(app.control_panel.status.starts_with("Error"));
    }

    #[test]
    fn sender_dropped_after_completion_adds_no_error() {
        let mut app = TimelapseApp::default();
        let (tx, rx) = channel();
        app.encode_rx = Some(rx);
        app.is_encoding = true;
        tx.send(EncodeEvent::Complete {
            output: PathBuf::from("/tmp/lapse.mp4"),
            purpose: EncodePurpose::Save,
        })
        .unwrap();
        drop(tx);

        app.check_encode_results();

        assert_eq!(app.notices.front().unwrap().kind, NoticeKind::Info);
    }

    #[test]
    fn added_images_append_in_dialog_order() {
        let mut app = app_with_images(&["A"]);
        app.add_images(vec![PathBuf::from("B"), PathBuf::from("A")]);
        let order: Vec<_> = app.project.images.paths().map(Path::to_path_buf).collect();
        assert_eq!(order, vec![PathBuf::from("A"), PathBuf::from("B"), PathBuf::from("A")]);
        assert_eq!(app.control_panel.status, "3 image(s) in timelapse");
    }

    #[test]
    fn moving_selected_image_reorders_project() {
        let mut app = app_with_images(&["A", "B", "C"]);
        app.project.images.select(1);
        app.handle_move(Direction::Up);
        let order: Vec<_> = app.project.images.paths().map(Path::to_path_buf).collect();
        assert_eq!(order, vec![PathBuf::from("B"), PathBuf::from("A"), PathBuf::from("C")]);
        assert_eq!(app.project.images.selected(), Some(0));
    }
}
