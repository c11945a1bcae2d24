mod app;

fn main() -> eframe::Result<()> {
    bodystack::init_logging();
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Body stack")
            .with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "bodystack",
        native_options,
        Box::new(|cc| Ok(Box::new(app::BodyApp::new(cc)))),
    )
}
