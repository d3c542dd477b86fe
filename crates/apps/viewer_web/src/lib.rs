use console_error_panic_hook::set_once;
use log::LevelFilter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

pub mod camera;
mod chart_canvas;
pub mod config;
pub mod fetch;
mod globe_view;
mod labels;
mod radar_view;
pub mod texture;
mod wgpu;

pub use globe_view::GlobeView;
pub use radar_view::RadarView;

/// Installs the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
    Ok(())
}
