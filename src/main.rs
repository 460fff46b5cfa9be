use clap::Parser;
use deck_uploader::app::DeckUploader;
use deck_uploader::upload::{HttpTransport, UploadController};
use deck_uploader::{Args, Config};
use eframe::egui;
use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = Config::from_args(&args)?;
    let transport = Arc::new(HttpTransport::from_config(&config)?);

    // Transfers run here while the window owns the main thread.
    let runtime = Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([400.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    info!("Accepting {} ({})", config.accepted.extension, config.accepted.mime);
    eframe::run_native(
        "Anki Deck Uploader",
        options,
        Box::new(move |cc| {
            let controller = UploadController::new(&config, transport, handle);
            Box::new(DeckUploader::new(cc, &config, controller))
        }),
    )?;
    Ok(())
}
