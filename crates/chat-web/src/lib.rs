//! Chat message view frontend
//!
//! Leptos-based WASM frontend rendering chat messages and opening their
//! attached documents.
//!
//! The host page supplies the conversation as a JSON array of messages in
//! `<script id="chat-transcript" type="application/json">`.

mod app;
mod browser;
mod components;
mod logging;
mod pages;

pub use app::{App, TRANSCRIPT_ELEMENT_ID};
pub use browser::{BrowserTimer, BrowserViewer};
pub use components::MessageView;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    leptos::mount::mount_to_body(App);
}
