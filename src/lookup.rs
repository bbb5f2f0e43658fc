use serde::Deserialize;

pub const QUERYING: &str = "查询中...";
pub const QUERY_FAILED: &str = "查询失败，请重试";
pub const CITY_REQUIRED: &str = "请输入城市名";
pub const ROUTE_ENDPOINTS_REQUIRED: &str = "请输入起点和终点";
pub const NO_WEATHER: &str = "未查询到天气信息";
pub const NO_ROUTE: &str = "未查询到路径";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LookupTab {
    #[default]
    Weather,
    Route,
}

impl LookupTab {
    pub fn shows(self, panel: LookupTab) -> bool {
        self == panel
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
    Transit,
    Walking,
    Riding,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Transit,
        TravelMode::Walking,
        TravelMode::Riding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
            TravelMode::Walking => "walking",
            TravelMode::Riding => "riding",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Driving => "驾车",
            TravelMode::Transit => "公交",
            TravelMode::Walking => "步行",
            TravelMode::Riding => "骑行",
        }
    }

    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: &str) -> Result<Self, &'static str> {
        let city = city.trim();
        if city.is_empty() {
            return Err(CITY_REQUIRED);
        }
        Ok(Self { city: city.to_string() })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteQuery {
    pub origin: String,
    pub dest: String,
    pub mode: TravelMode,
}

impl RouteQuery {
    pub fn new(origin: &str, dest: &str, mode: TravelMode) -> Result<Self, &'static str> {
        let (origin, dest) = (origin.trim(), dest.trim());
        if origin.is_empty() || dest.is_empty() {
            return Err(ROUTE_ENDPOINTS_REQUIRED);
        }
        Ok(Self { origin: origin.to_string(), dest: dest.to_string(), mode })
    }
}

/// One day of the provider's forecast. Values arrive as strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastDay {
    pub date: String,
    pub dayweather: String,
    pub daytemp: String,
    pub nighttemp: String,
    pub daywind: String,
    pub daypower: String,
}

impl ForecastDay {
    pub fn summary(&self) -> String {
        format!(
            "{}：{}，最高{}℃，最低{}℃，{}风{}级",
            self.date, self.dayweather, self.daytemp, self.nighttemp, self.daywind, self.daypower
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherResponse {
    pub success: bool,
    pub message: Option<String>,
    pub current: Option<String>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteResponse {
    pub success: bool,
    pub message: Option<String>,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub current: String,
    pub forecast: Vec<ForecastDay>,
}

/// What a lookup panel's result area currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupView<T> {
    Empty,
    /// Plain text: validation errors, the querying placeholder, retry prompts.
    Notice(String),
    /// Backend-reported failure, shown inside an output bubble.
    Failure(String),
    Found(T),
}

impl<T> Default for LookupView<T> {
    fn default() -> Self {
        LookupView::Empty
    }
}

impl WeatherResponse {
    pub fn into_view(self) -> LookupView<WeatherReport> {
        if !self.success {
            return LookupView::Failure(non_empty(self.message).unwrap_or_else(|| NO_WEATHER.to_string()));
        }
        LookupView::Found(WeatherReport {
            current: self.current.unwrap_or_default(),
            forecast: self.forecast,
        })
    }
}

impl RouteResponse {
    /// Yields the Markdown answer on success.
    pub fn into_view(self) -> LookupView<String> {
        if !self.success {
            // Route failures are plain text, unlike weather failures.
            return LookupView::Notice(non_empty(self.message).unwrap_or_else(|| NO_ROUTE.to_string()));
        }
        LookupView::Found(non_empty(self.answer).unwrap_or_else(|| NO_ROUTE.to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
