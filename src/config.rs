use log::LevelFilter;

pub const INTRO_MESSAGE: &str = "你好，我是NK-Traveler，我是一个基于通义千问大模型构建起来的旅游规划助手，我们可以帮助你规划行程，实施规划行程路径等等，很高兴能够帮助你。";
pub const DEFAULT_SESSION_TITLE: &str = "新会话";
pub const NEW_SESSION_SELECT_DELAY_MS: u32 = 200;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub speech_lang: String,
    pub forecast_days: u32,
    pub log_level: LevelFilter,
}

impl Config {
    /// Values are baked in at build time; a wasm module has no process environment.
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("NK_TRAVELER_API_BASE"),
            option_env!("NK_TRAVELER_SPEECH_LANG"),
            option_env!("NK_TRAVELER_FORECAST_DAYS"),
            option_env!("NK_TRAVELER_LOG_LEVEL"),
        )
    }

    fn from_values(
        api_base: Option<&str>,
        speech_lang: Option<&str>,
        forecast_days: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        Self {
            api_base: api_base.unwrap_or("").trim_end_matches('/').to_string(),
            speech_lang: speech_lang.unwrap_or("zh-CN").to_string(),
            forecast_days: forecast_days
                .and_then(|v| v.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(3),
            log_level: log_level
                .and_then(|v| v.parse().ok())
                .unwrap_or(LevelFilter::Info),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}
