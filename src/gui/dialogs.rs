//! Modal Dialogs
//! Blocking notices and the per-image duration prompt.

use crate::config::{MAX_DURATION, MIN_DURATION};
use crate::project::validate_duration;
use egui::{Align2, Color32, RichText};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    fn color(self) -> Color32 {
        match self {
            NoticeKind::Info => Color32::from_rgb(40, 167, 69),
            NoticeKind::Warning => Color32::from_rgb(255, 193, 7),
            NoticeKind::Error => Color32::from_rgb(220, 53, 69),
        }
    }

    fn icon(self) -> &'static str {
        match self {
            NoticeKind::Info => "✓",
            NoticeKind::Warning => "⚠",
            NoticeKind::Error => "✖",
        }
    }
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    fn new(kind: NoticeKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Notices shown one at a time, oldest first.
#[derive(Default)]
pub struct NoticeQueue {
    queue: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        self.queue.push_back(notice);
    }

    /// True while a notice blocks the rest of the UI.
    pub fn is_blocking(&self) -> bool {
        !self.queue.is_empty()
    }

    #[cfg(test)]
    pub fn front(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.queue.front() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(RichText::new(&notice.title).strong())
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(notice.kind.icon())
                            .size(20.0)
                            .color(notice.kind.color()),
                    );
                    ui.label(&notice.message);
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("  OK  ").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.queue.pop_front();
        }
    }
}

/// Outcome of the duration prompt for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptOutcome {
    Open,
    Confirmed(f64),
    Cancelled,
}

/// "Enter duration per image in seconds" prompt.
///
/// Out-of-range input is reported inline and the prompt stays open.
pub struct DurationPrompt {
    input: String,
    error: Option<String>,
}

impl DurationPrompt {
    pub fn new(initial: f64) -> Self {
        Self {
            input: initial.to_string(),
            error: None,
        }
    }

    /// Parse and validate the current input.
    pub fn submit(&mut self) -> PromptOutcome {
        match self.input.trim().parse::<f64>() {
            Ok(value) => match validate_duration(value) {
                Ok(()) => PromptOutcome::Confirmed(value),
                Err(e) => {
                    self.error = Some(e.to_string());
                    PromptOutcome::Open
                }
            },
            Err(_) => {
                self.error = Some("Please enter a number.".to_string());
                PromptOutcome::Open
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PromptOutcome {
        let mut outcome = PromptOutcome::Open;

        egui::Window::new(RichText::new("Input Duration").strong())
            .id(egui::Id::new("duration_prompt"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter duration per image in seconds:");
                ui.add_space(4.0);
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input).desired_width(120.0),
                );
                response.request_focus();
                ui.label(
                    RichText::new(format!("({} < seconds ≤ {})", MIN_DURATION, MAX_DURATION))
                        .size(11.0)
                        .color(Color32::GRAY),
                );

                if let Some(error) = &self.error {
                    ui.label(
                        RichText::new(error)
                            .size(11.0)
                            .color(NoticeKind::Error.color()),
                    );
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("OK").clicked() || enter {
                        outcome = self.submit();
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = PromptOutcome::Cancelled;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            outcome = PromptOutcome::Cancelled;
        }
        outcome
    }
}
