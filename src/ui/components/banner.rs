//! Error banners and the blocking alert dialog

use crate::ui::theme::Theme;
use egui::{self, Color32, RichText};

/// An inline, optionally dismissable message strip
pub struct Banner<'a> {
    text: &'a str,
    color: Color32,
    dismissable: bool,
    theme: &'a Theme,
}

impl<'a> Banner<'a> {
    pub fn error(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            color: theme.error,
            dismissable: true,
            theme,
        }
    }

    pub fn notice(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            color: theme.warning,
            dismissable: true,
            theme,
        }
    }

    /// Error that can't be cleared without restarting
    pub fn fatal(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            color: theme.error,
            dismissable: false,
            theme,
        }
    }

    /// Returns true when the dismiss button was clicked
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let mut dismissed = false;

        egui::Frame::none()
            .fill(self.color.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, self.color))
            .rounding(self.theme.button_rounding)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.label(RichText::new(self.text).color(self.theme.text_primary));
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, format!("Error: {}", self.text))
                    });

                    if self.dismissable {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let close = ui.small_button("✕");
                            close.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Dismiss")
                            });
                            dismissed = close.clicked();
                        });
                    }
                });
            });

        dismissed
    }
}

/// Modal-style alert centered over the window
pub struct AlertDialog<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertDialog<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }

    /// Returns true when acknowledged
    pub fn show(self, ctx: &egui::Context) -> bool {
        let mut acknowledged = false;

        egui::Window::new("Microphone access")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_max_width(320.0);
                let response = ui.label(RichText::new(self.text).color(self.theme.text_primary));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, format!("Alert: {}", self.text))
                });

                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    let ok = ui.button("OK");
                    ok.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "OK"));
                    acknowledged = ok.clicked();
                });
            });

        acknowledged
    }
}
