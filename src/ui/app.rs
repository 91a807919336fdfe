//! Main application struct and eframe integration

use crate::audio::{self, AudioRecorder};
use crate::integration::IntegrationConfig;
use crate::ui::components::{AlertDialog, Banner, Header, InputBar, MessageList};
use crate::ui::state::AppState;
use crate::ui::theme::{self, Theme};
use egui::{self, CentralPanel, TopBottomPanel};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info};

/// The tutor chat window
pub struct TutorApp {
    state: AppState,
    theme: Theme,
}

impl TutorApp {
    /// Create the app and start the conversation
    ///
    /// Requests run on `runtime`; replies trigger a repaint when they land.
    pub fn new(cc: &eframe::CreationContext<'_>, config: IntegrationConfig, runtime: Handle) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);
        theme::install_hangul_font(&cc.egui_ctx, theme::font_from_env());

        let ctx = cc.egui_ctx.clone();
        let recorder = AudioRecorder::new(audio::default_source(config.enable_audio_input));
        let mut state = AppState::new(runtime.clone(), recorder)
            .with_notifier(Arc::new(move || ctx.request_repaint()));

        // The greeting outcome lands in the orchestrator state; only a
        // panicked task needs reporting here
        if let Some(greeting) = state.start_from_config(&config.session) {
            runtime.spawn(async move {
                if let Err(e) = greeting.await {
                    error!("Greeting task failed: {}", e);
                }
            });
        }

        Self::from_state(state, theme)
    }

    /// Wrap prepared state, e.g. with a fake session in tests
    pub fn from_state(state: AppState, theme: Theme) -> Self {
        Self { state, theme }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Draw one frame
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.state.poll();
        let view = self.state.view();

        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                Header::new(&view, &self.theme).show(ui);
            });

        TopBottomPanel::bottom("input_area")
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                if let Some(error) = &view.blocking_error {
                    Banner::fatal(error, &self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                } else if let Some(error) = &view.last_error {
                    if Banner::error(error, &self.theme).show(ui) {
                        self.state.dismiss_error();
                    }
                    ui.add_space(self.theme.spacing_sm);
                }

                if let Some(notice) = &view.notice {
                    if Banner::notice(notice, &self.theme).show(ui) {
                        self.state.dismiss_notice();
                    }
                    ui.add_space(self.theme.spacing_sm);
                }

                InputBar::new(&mut self.state, &self.theme).show(ui);
            });

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)))
            .show(ctx, |ui| {
                MessageList::new(&view, &self.theme).show(ui);
            });

        if let Some(alert) = self.state.alert().map(str::to_owned) {
            if AlertDialog::new(&alert, &self.theme).show(ctx) {
                self.state.dismiss_alert();
            }
        }

        if view.busy || view.recording {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for TutorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Opal shutting down");
    }
}
