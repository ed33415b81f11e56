mod app;

pub use app::PortfolioDemo;

/// Run the GUI demo
pub fn run() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("CueTone Portfolio Demo"),
        ..Default::default()
    };

    eframe::run_native(
        "CueTone Portfolio Demo",
        options,
        Box::new(|_cc| Ok(Box::new(PortfolioDemo::new()))),
    )
}
