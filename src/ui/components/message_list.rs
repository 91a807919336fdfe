//! Message list component
//!
//! Displays the conversation thread oldest first, with a typing indicator
//! while the tutor is replying.

use crate::messages::{Message, MessageContent};
use crate::ui::components::header::TUTOR_NAME;
use crate::ui::state::ChatView;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct MessageList<'a> {
    view: &'a ChatView,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(view: &'a ChatView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if self.view.messages.is_empty() && !self.view.busy {
                        self.show_empty_state(ui);
                    }

                    for message in &self.view.messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if self.view.busy {
                        self.show_typing_indicator(ui);
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.label(
                RichText::new("안녕하세요!")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Type a message or tap the mic to practice your pronunciation.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.is_user();
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { TUTOR_NAME })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    match &message.content {
                        MessageContent::Text(text) => {
                            let response = ui.label(RichText::new(text).color(text_color));
                            let label = if is_user {
                                format!("User message: {}", text)
                            } else {
                                format!("Assistant response: {}", text)
                            };
                            response.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                            });
                        }
                        MessageContent::Voice { caption, attachment } => {
                            ui.vertical(|ui| {
                                let response =
                                    ui.label(RichText::new(caption).color(text_color).strong());
                                response.widget_info(|| {
                                    egui::WidgetInfo::labeled(
                                        egui::WidgetType::Label,
                                        true,
                                        format!("Voice message: {}", caption),
                                    )
                                });
                                ui.label(
                                    RichText::new(format!(
                                        "{} · {:.1} KB",
                                        attachment.mime_type,
                                        attachment.byte_len as f32 / 1024.0
                                    ))
                                    .size(11.0)
                                    .color(text_color.gamma_multiply(0.7)),
                                );
                            });
                        }
                    }
                });

            let time_str = message
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string();
            ui.label(RichText::new(time_str).size(10.0).color(self.theme.text_muted));
        });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    let response = ui
                        .horizontal(|ui| {
                            let t = ui.ctx().input(|i| i.time);
                            for i in 0..3 {
                                let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                                ui.label(
                                    RichText::new("●")
                                        .size(10.0)
                                        .color(self.theme.text_muted.gamma_multiply(alpha)),
                                );
                            }
                        })
                        .response;
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Tutor is typing")
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}
