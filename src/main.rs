mod app;
mod body_chart;
mod genogram;
mod geometry;
mod history;
mod house_layout;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "CareSketch",
        native_options,
        Box::new(|cc| Ok(Box::new(app::CareApp::new(cc)))),
    )
}
