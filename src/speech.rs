use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;

const RECOGNIZERS: [&str; 2] = ["webkitSpeechRecognition", "SpeechRecognition"];

/// One-shot speech-to-text over the browser's (webkit)SpeechRecognition.
pub struct VoiceInput {
    recognition: JsValue,
    _on_result: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl VoiceInput {
    /// Returns `None` when the browser has no speech recognition.
    pub fn detect(lang: &str, on_transcript: impl Fn(String) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let constructor: Function = RECOGNIZERS.iter().find_map(|name| {
            Reflect::get(&window, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.dyn_into::<Function>().ok())
        })?;

        let recognition = match Reflect::construct(&constructor, &Array::new()) {
            Ok(recognition) => recognition,
            Err(err) => {
                log::warn!("speech recognition unavailable: {:?}", err);
                return None;
            }
        };

        let on_result = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match first_transcript(&event) {
                Some(text) => on_transcript(text),
                None => log::warn!("speech result carried no transcript"),
            }
        });
        let on_error = Closure::<dyn FnMut(JsValue)>::new(|event: JsValue| {
            let code = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default();
            crate::alert(&format!("语音识别出错: {}", code));
        });

        let configured = set(&recognition, "lang", &JsValue::from_str(lang))
            .and_then(|_| set(&recognition, "continuous", &JsValue::FALSE))
            .and_then(|_| set(&recognition, "interimResults", &JsValue::FALSE))
            .and_then(|_| set(&recognition, "onresult", on_result.as_ref()))
            .and_then(|_| set(&recognition, "onerror", on_error.as_ref()));
        if let Err(err) = configured {
            log::warn!("failed to configure speech recognition: {:?}", err);
            return None;
        }

        Some(Self { recognition, _on_result: on_result, _on_error: on_error })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        let start: Function = Reflect::get(&self.recognition, &JsValue::from_str("start"))?.dyn_into()?;
        start.call0(&self.recognition)?;
        Ok(())
    }
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &JsValue::from_str("results")).ok()?;
    let result = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&result, 0).ok()?;
    Reflect::get(&alternative, &JsValue::from_str("transcript"))
        .ok()?
        .as_string()
}
