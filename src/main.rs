//! Function Plotter

// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use plot_engine::{PlotterApp, PlotterAppConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(if cfg!(debug_assertions) {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = PlotterAppConfig {
        window: plot_engine::render::window::WindowDescriptor {
            title: "Function Plotter".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    match PlotterApp::new(config) {
        Ok(app) => app.run(),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
