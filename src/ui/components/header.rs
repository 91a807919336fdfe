//! Header bar with the tutor's name and connection status

use crate::ui::state::ChatView;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub const TUTOR_NAME: &str = "Opal AI Tutor";

pub struct Header<'a> {
    view: &'a ChatView,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(view: &'a ChatView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Avatar
            egui::Frame::none()
                .fill(self.theme.primary)
                .rounding(egui::Rounding::same(20.0))
                .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                .show(ui, |ui| {
                    ui.label(RichText::new("O").size(18.0).strong().color(egui::Color32::WHITE));
                });

            ui.vertical(|ui| {
                ui.label(
                    RichText::new(TUTOR_NAME)
                        .size(18.0)
                        .strong()
                        .color(self.theme.text_primary),
                );

                let (status, color) = self.status();
                let response = ui.label(RichText::new(status).size(12.0).color(color));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, format!("Status: {}", status))
                });
            });
        });
    }

    fn status(&self) -> (&'static str, egui::Color32) {
        if self.view.blocking_error.is_some() {
            ("Offline", self.theme.error)
        } else if self.view.busy {
            ("Typing...", self.theme.text_muted)
        } else {
            ("Online", self.theme.success)
        }
    }
}
