use std::rc::Rc;

use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::config::Config;
use crate::lookup::{
    LookupTab, LookupView, RouteQuery, TravelMode, WeatherQuery, WeatherReport, QUERYING,
    QUERY_FAILED,
};
use crate::markdown;

#[derive(Properties, PartialEq)]
pub struct LookupSidebarProps {
    pub collapsed: bool,
    pub on_toggle: Callback<MouseEvent>,
}

fn text_setter(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        let target = event.target_unchecked_into::<HtmlInputElement>();
        state.set(target.value());
    })
}

fn render_view<T>(view: &LookupView<T>, found: impl Fn(&T) -> Html) -> Html {
    match view {
        LookupView::Empty => html! {},
        LookupView::Notice(text) => html! { { text.clone() } },
        LookupView::Failure(text) => html! { <div class="bubble-output">{ text.clone() }</div> },
        LookupView::Found(value) => found(value),
    }
}

/// Weather and route lookups. Independent of the chat session.
#[function_component(LookupSidebar)]
pub fn lookup_sidebar(props: &LookupSidebarProps) -> Html {
    let config = use_context::<Rc<Config>>().unwrap_or_default();
    let tab = use_state(LookupTab::default);

    let city = use_state(String::new);
    let weather = use_state(LookupView::<WeatherReport>::default);

    let origin = use_state(String::new);
    let dest = use_state(String::new);
    let mode = use_state(TravelMode::default);
    let route = use_state(LookupView::<String>::default);

    let on_weather_search = {
        let api = ApiClient::new(&config);
        let days = config.forecast_days;
        let city = city.clone();
        let weather = weather.clone();
        Callback::from(move |_: MouseEvent| {
            let query = match WeatherQuery::new(&city) {
                Ok(query) => query,
                Err(message) => {
                    weather.set(LookupView::Notice(message.to_string()));
                    return;
                }
            };
            weather.set(LookupView::Notice(QUERYING.to_string()));
            let api = api.clone();
            let weather = weather.clone();
            spawn_local(async move {
                match api.weather(&query, days).await {
                    Ok(resp) => weather.set(resp.into_view()),
                    Err(err) => {
                        log::warn!("weather lookup for {} failed: {}", query.city, err);
                        weather.set(LookupView::Notice(QUERY_FAILED.to_string()));
                    }
                }
            });
        })
    };

    let on_route_search = {
        let api = ApiClient::new(&config);
        let origin = origin.clone();
        let dest = dest.clone();
        let mode = mode.clone();
        let route = route.clone();
        Callback::from(move |_: MouseEvent| {
            let query = match RouteQuery::new(&origin, &dest, *mode) {
                Ok(query) => query,
                Err(message) => {
                    route.set(LookupView::Notice(message.to_string()));
                    return;
                }
            };
            route.set(LookupView::Notice(QUERYING.to_string()));
            let api = api.clone();
            let route = route.clone();
            spawn_local(async move {
                match api.route(&query).await {
                    Ok(resp) => route.set(resp.into_view()),
                    Err(err) => {
                        log::warn!("route lookup {} -> {} failed: {}", query.origin, query.dest, err);
                        route.set(LookupView::Notice(QUERY_FAILED.to_string()));
                    }
                }
            });
        })
    };

    let on_mode_change = {
        let mode = mode.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlSelectElement>();
            mode.set(TravelMode::parse(&target.value()));
        })
    };

    let select_tab = |target: LookupTab| {
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| tab.set(target))
    };

    let visibility = |panel: LookupTab| if tab.shows(panel) { "" } else { "display:none;" };

    let forecast_days = config.forecast_days;
    let weather_html = render_view(&*weather, |report| html! {
        <div class="bubble-output">
            <div style="margin-bottom:8px;">{ report.current.clone() }</div>
            if !report.forecast.is_empty() {
                <>
                    <div>{ format!("未来{}天天气预报：", forecast_days) }</div>
                    <ul style="padding-left:18px;">
                        { for report.forecast.iter().map(|day| html! { <li>{ day.summary() }</li> }) }
                    </ul>
                </>
            }
        </div>
    });
    let route_html = render_view(&*route, |answer| html! {
        <div class="bubble-output">{ markdown::to_html(answer) }</div>
    });

    html! {
        <aside id="weather-sidebar" class={classes!("weather-sidebar", props.collapsed.then_some("collapsed"))}>
            <button id="toggle-weather-sidebar-btn" type="button" onclick={props.on_toggle.clone()}>{ "☰" }</button>
            <div class="lookup-tabs">
                <button
                    id="tab-weather"
                    type="button"
                    class={classes!("lookup-tab", tab.shows(LookupTab::Weather).then_some("active"))}
                    onclick={select_tab(LookupTab::Weather)}
                >
                    { "天气查询" }
                </button>
                <button
                    id="tab-route"
                    type="button"
                    class={classes!("lookup-tab", tab.shows(LookupTab::Route).then_some("active"))}
                    onclick={select_tab(LookupTab::Route)}
                >
                    { "路线规划" }
                </button>
            </div>

            <div id="weather-tab-content" style={visibility(LookupTab::Weather)}>
                <input
                    id="weather-city-input"
                    type="text"
                    placeholder="请输入城市名"
                    value={(*city).clone()}
                    oninput={text_setter(&city)}
                />
                <button id="weather-search-btn" type="button" onclick={on_weather_search}>{ "查询" }</button>
                <div id="weather-result">{ weather_html }</div>
            </div>

            <div id="route-tab-content" style={visibility(LookupTab::Route)}>
                <input
                    id="route-origin-input"
                    type="text"
                    placeholder="起点"
                    value={(*origin).clone()}
                    oninput={text_setter(&origin)}
                />
                <input
                    id="route-dest-input"
                    type="text"
                    placeholder="终点"
                    value={(*dest).clone()}
                    oninput={text_setter(&dest)}
                />
                <select id="route-mode-input" onchange={on_mode_change}>
                    { for TravelMode::ALL.into_iter().map(|option| html! {
                        <option value={option.as_str()} selected={*mode == option}>{ option.label() }</option>
                    }) }
                </select>
                <button id="route-search-btn" type="button" onclick={on_route_search}>{ "查询" }</button>
                <div id="route-result">{ route_html }</div>
            </div>
        </aside>
    }
}
