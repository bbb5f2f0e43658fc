use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod confirm;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod markdown;
pub mod speech;
pub mod state;
pub mod types;

use app::{App, AppProps};
use config::Config;

/// Blocking browser alert.
pub fn alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.alert_with_message(message) {
                log::warn!("alert failed: {:?}", err);
            }
        }
        None => log::warn!("no window for alert: {}", message),
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    console_error_panic_hook::set_once();

    let config = Config::from_env();
    logging::init(config.log_level);
    log::info!("starting NK-Traveler client (api base: {:?})", config.api_base);

    let props = AppProps { config: Rc::new(config) };
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("root"));
    match root {
        Some(root) => {
            yew::Renderer::<App>::with_root_and_props(root, props).render();
        }
        None => {
            log::warn!("#root not found, mounting on <body>");
            yew::Renderer::<App>::with_props(props).render();
        }
    }
}
