#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bitvid_app::App;
use eframe::NativeOptions;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([80.0 * 8.0, 64.0 * 8.0])
            .with_title("bitvid"),
        ..Default::default()
    };

    // Stream can be provided via command line
    let app = match std::env::args().nth(1) {
        Some(path) => App::with_stream_path(path),
        None => App::new(),
    };

    eframe::run_native("bitvid", options, Box::new(move |_cc| Ok(Box::new(app))))
}
