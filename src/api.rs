use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::Config;
use crate::error::ApiError;
use crate::lookup::{RouteQuery, RouteResponse, WeatherQuery, WeatherResponse};
use crate::types::{Message, RenameResponse, SearchStatus, SendRequest, Session, TitleRequest};

/// Thin client over the backend's JSON endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    config: Config,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let resp = self.send("GET", &self.url("/sessions"), None).await?;
        json_ok(resp).await
    }

    pub async fn session_history(&self, id: i64) -> Result<Vec<Message>, ApiError> {
        let resp = self.send("GET", &self.url(&format!("/session/{}", id)), None).await?;
        json_ok(resp).await
    }

    /// The reply body is not used; the transcript is re-fetched afterwards.
    pub async fn send_message(&self, request: &SendRequest<'_>) -> Result<(), ApiError> {
        let resp = self.send("POST", &self.url("/send"), Some(encode(request)?)).await?;
        let _: serde_json::Value = json_ok(resp).await?;
        Ok(())
    }

    pub async fn create_session(&self, title: &str) -> Result<Session, ApiError> {
        let body = encode(&TitleRequest { title })?;
        let resp = self.send("POST", &self.url("/session/new"), Some(body)).await?;
        json_ok(resp).await
    }

    pub async fn delete_session(&self, id: i64) -> Result<(), ApiError> {
        let resp = self.send("DELETE", &self.url(&format!("/session/{}", id)), None).await?;
        status_ok(&resp)
    }

    pub async fn clear_sessions(&self) -> Result<(), ApiError> {
        let resp = self.send("POST", &self.url("/sessions/clear"), None).await?;
        status_ok(&resp)
    }

    /// Failure responses carry `{success: false, message}` with a 4xx status.
    pub async fn rename_session(&self, id: i64, title: &str) -> Result<RenameResponse, ApiError> {
        let body = encode(&TitleRequest { title })?;
        let url = self.url(&format!("/session/{}/rename", id));
        let resp = self.send("POST", &url, Some(body)).await?;
        json_any(resp).await
    }

    pub async fn weather(&self, query: &WeatherQuery, days: u32) -> Result<WeatherResponse, ApiError> {
        let url = self.url(&format!(
            "/api/weather?city={}&days={}",
            encode_component(&query.city),
            days
        ));
        let resp = self.send("GET", &url, None).await?;
        json_any(resp).await
    }

    pub async fn route(&self, query: &RouteQuery) -> Result<RouteResponse, ApiError> {
        let url = self.url(&format!(
            "/api/route?origin={}&dest={}&mode={}",
            encode_component(&query.origin),
            encode_component(&query.dest),
            encode_component(query.mode.as_str())
        ));
        let resp = self.send("GET", &url, None).await?;
        json_any(resp).await
    }

    pub async fn search_status(&self) -> Result<SearchStatus, ApiError> {
        let resp = self.send("GET", &self.url("/search_status"), None).await?;
        json_ok(resp).await
    }

    async fn send(&self, method: &str, url: &str, body: Option<String>) -> Result<web_sys::Response, ApiError> {
        let opts = web_sys::RequestInit::new();
        opts.set_method(method);
        if let Some(body) = body {
            let headers = web_sys::Headers::new()?;
            headers.set("Content-Type", "application/json")?;
            opts.set_headers(&headers);
            opts.set_body(&JsValue::from_str(&body));
        }

        let request = web_sys::Request::new_with_str_and_init(url, &opts)?;
        let window = web_sys::window().ok_or(ApiError::NoWindow)?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: web_sys::Response = resp_value.dyn_into()?;
        log::debug!("{} {} -> {}", method, url, resp.status());
        Ok(resp)
    }
}

fn encode<T: Serialize>(body: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string(body)?)
}

fn encode_component(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

fn status_ok(resp: &web_sys::Response) -> Result<(), ApiError> {
    if resp.ok() {
        Ok(())
    } else {
        Err(ApiError::Status { status: resp.status(), url: resp.url() })
    }
}

async fn json_ok<T: DeserializeOwned>(resp: web_sys::Response) -> Result<T, ApiError> {
    status_ok(&resp)?;
    json_any(resp).await
}

/// Decodes the body regardless of status.
async fn json_any<T: DeserializeOwned>(resp: web_sys::Response) -> Result<T, ApiError> {
    let json = JsFuture::from(resp.json()?)
        .await
        .map_err(|err| ApiError::Decode(format!("{:?}", err)))?;
    Ok(serde_wasm_bindgen::from_value(json)?)
}
