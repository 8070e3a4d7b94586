/// Tab Recall - WebExtension popup for tab management
/// Built with Rust + WASM + Yew

pub mod actions;
pub mod browser;
pub mod selector;
pub mod tab_data;
pub mod ui;
pub mod view;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export host extraction for JavaScript access
#[wasm_bindgen]
pub fn extract_host(url: &str) -> String {
    selector::host_of(url).unwrap_or_else(|_| selector::UNKNOWN_HOST.to_string())
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
