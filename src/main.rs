mod app;
mod db;
mod error;
mod numbering;
mod template;
mod totals;
mod types;
mod ui;

use app::DocumentManagerApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Document Manager",
        options,
        Box::new(|cc| Ok(Box::new(DocumentManagerApp::new(cc)))),
    )
}
