//! Input bar component
//!
//! Text input, the microphone toggle and the send button.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};
use tracing::debug;

/// Input bar component for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        if self.state.is_recording() {
            self.show_recording_hint(ui);
            ui.add_space(self.theme.spacing_sm);
        }

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_record_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_recording_hint(&self, ui: &mut egui::Ui) {
        let seconds = self.state.recording_seconds();
        ui.horizontal(|ui| {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            ui.label(RichText::new("●").color(self.theme.recording.gamma_multiply(0.4 + pulse * 0.6)));
            ui.label(
                RichText::new(format!("Recording... {:.1}s  Tap the mic again to send", seconds))
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
        });
    }

    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let is_recording = self.state.is_recording();

        let (icon, tooltip, color) = if is_recording {
            ("⏹", "Stop and send recording", egui::Color32::WHITE)
        } else {
            ("🎤", "Record pronunciation practice", self.theme.text_secondary)
        };

        let mut button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);
        if is_recording {
            button = button.fill(self.theme.recording);
        }

        let enabled = self.state.can_toggle_recording();
        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(
                egui::WidgetType::Button,
                enabled,
                if is_recording { "Stop recording" } else { "Start recording" },
            )
        });

        let button_rect = response.rect;
        if response.clicked() {
            if let Err(e) = self.state.toggle_recording() {
                debug!("Recording toggle rejected: {}", e);
            }
        }
        response.on_hover_text(tooltip);

        if is_recording {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            let radius = button_rect.width() / 2.0 + 2.0 + pulse * 3.0;
            ui.painter().circle_stroke(
                button_rect.center(),
                radius,
                egui::Stroke::new(2.0 * pulse, self.theme.recording.gamma_multiply(1.0 - pulse * 0.5)),
            );
            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let enabled = self.state.can_send_text();
        let hint = if self.state.is_recording() {
            "Recording..."
        } else {
            "Type a message..."
        };

        // Leave room for the send button
        let available_width = ui.available_width() - 60.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text(hint)
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0))
            .id(egui::Id::new("message_input"));

        let response = ui.add_enabled(enabled, text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, enabled, "Message input")
        });

        // Singleline edits drop focus on Enter
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.submit();
            response.request_focus();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = self.state.can_send_text() && !self.state.input_text.trim().is_empty();

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding)
            .fill(button_color);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
        });

        if response.clicked() {
            self.submit();
        }

        response.on_hover_text("Send message (Enter)");
    }

    fn submit(&mut self) {
        if let Err(e) = self.state.submit_text() {
            debug!("Text turn not sent: {}", e);
        }
    }
}
