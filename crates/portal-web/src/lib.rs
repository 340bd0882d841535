//! Portal Web - browser entry point for the portal scene
//!
//! Bundles the Bevy app with a `web-sys` document host so overlays and
//! navigation reach the real page.

pub mod app;
pub mod document;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // wgpu is noisy below WARN
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    app::run();
}
