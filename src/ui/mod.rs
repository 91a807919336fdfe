//! egui/eframe user interface
//!
//! Everything here is presentation: the conversation rules live in
//! [`crate::integration`].

mod app;
pub mod components;
mod state;
mod theme;

pub use app::TutorApp;
pub use state::{AppState, ChatView};
pub use theme::{font_from_env, install_hangul_font, Theme, FONT_ENV};
