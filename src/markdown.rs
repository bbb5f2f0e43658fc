use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use yew::prelude::*;

/// Renders Markdown with the page's `marked` library, if the page loaded one.
pub fn render(source: &str) -> Option<String> {
    let window = web_sys::window()?;
    let marked = Reflect::get(&window, &JsValue::from_str("marked")).ok()?;
    if marked.is_undefined() || marked.is_null() {
        return None;
    }
    let parse: Function = Reflect::get(&marked, &JsValue::from_str("parse"))
        .ok()?
        .dyn_into()
        .ok()?;
    match parse.call1(&marked, &JsValue::from_str(source)) {
        Ok(html) => html.as_string(),
        Err(err) => {
            log::warn!("markdown render failed: {:?}", err);
            None
        }
    }
}

/// Formatted HTML when a renderer is present, escaped text otherwise.
pub fn to_html(source: &str) -> Html {
    match render(source) {
        Some(rendered) => Html::from_html_unchecked(AttrValue::from(rendered)),
        None => html! { { source.to_string() } },
    }
}
