use anyhow::{anyhow, Context, Result};
use opal::integration::IntegrationConfig;
use opal::ui::TutorApp;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opal=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Opal AI tutor");

    let config = IntegrationConfig::from_env();
    if let Err(e) = config.validate() {
        // Still open the window so the error is shown to the user
        warn!("Invalid configuration: {}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("opal-worker")
        .build()
        .context("Failed to start async runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Opal AI Tutor")
            .with_inner_size([420.0, 720.0])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Opal",
        options,
        Box::new(move |cc| Ok(Box::new(TutorApp::new(cc, config, handle)))),
    )
    .map_err(|e| anyhow!("Failed to run the window: {}", e))?;

    drop(runtime);
    Ok(())
}
