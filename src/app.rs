use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::{ChatView, LookupSidebar, Modals, SessionList};
use crate::config::{Config, NEW_SESSION_SELECT_DELAY_MS};
use crate::confirm::{ConfirmReply, ConfirmRequest};
use crate::speech::VoiceInput;
use crate::state::{AppAction, AppState, Modal};
use crate::types::SendRequest;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<Config>,
}

fn refresh_sessions(api: ApiClient, dispatcher: UseReducerDispatcher<AppState>) {
    spawn_local(async move {
        match api.list_sessions().await {
            Ok(sessions) => dispatcher.dispatch(AppAction::SessionsLoaded(sessions)),
            Err(err) => log::warn!("failed to load sessions: {}", err),
        }
    });
}

/// Closes any open session menu when a click lands outside every menu.
fn listen_outside_clicks(dispatcher: UseReducerDispatcher<AppState>) -> Option<(web_sys::Document, Closure<dyn FnMut(web_sys::Event)>)> {
    let document = web_sys::window()?.document()?;
    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let inside_menu = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| element.closest(".session-menu-btn, .session-menu-dropdown").ok().flatten())
            .is_some();
        if !inside_menu {
            dispatcher.dispatch(AppAction::CloseMenus);
        }
    });
    if let Err(err) = document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref()) {
        log::warn!("failed to register outside-click listener: {:?}", err);
        return None;
    }
    Some((document, listener))
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    let api = ApiClient::new(&config);
    let state = use_reducer(AppState::default);
    let input = use_state(String::new);
    let rag = use_state(|| false);
    let search = use_state(|| false);
    let voice = use_mut_ref(|| None::<VoiceInput>);

    // Startup: session list, search availability, menu listener, voice input.
    {
        let api = api.clone();
        let dispatcher = state.dispatcher();
        let voice = voice.clone();
        let input = input.setter();
        let speech_lang = config.speech_lang.clone();
        use_effect_with((), move |_| {
            refresh_sessions(api.clone(), dispatcher.clone());

            {
                let dispatcher = dispatcher.clone();
                spawn_local(async move {
                    match api.search_status().await {
                        Ok(status) => dispatcher.dispatch(AppAction::SearchStatusLoaded(status)),
                        Err(err) => log::debug!("search status unavailable: {}", err),
                    }
                });
            }

            *voice.borrow_mut() = VoiceInput::detect(&speech_lang, move |text| input.set(text));

            let outside_clicks = listen_outside_clicks(dispatcher);
            move || {
                if let Some((document, listener)) = outside_clicks {
                    if let Err(err) =
                        document.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
                    {
                        log::warn!("failed to remove outside-click listener: {:?}", err);
                    }
                }
            }
        });
    }

    // Fetch the transcript whenever the selection or its generation changes.
    {
        let api = api.clone();
        let dispatcher = state.dispatcher();
        use_effect_with(state.transcript_request(), move |request| {
            if let Some((session_id, generation)) = *request {
                spawn_local(async move {
                    match api.session_history(session_id).await {
                        Ok(history) => dispatcher.dispatch(AppAction::TranscriptLoaded {
                            session_id,
                            generation,
                            history,
                        }),
                        Err(err) => log::warn!("failed to load session {}: {}", session_id, err),
                    }
                });
            }
            || ()
        });
    }

    let on_select = {
        let dispatcher = state.dispatcher();
        Callback::from(move |id: i64| dispatcher.dispatch(AppAction::Select(id)))
    };

    let on_open_menu = {
        let dispatcher = state.dispatcher();
        Callback::from(move |id: i64| dispatcher.dispatch(AppAction::OpenMenu(id)))
    };

    let on_open_modal = {
        let dispatcher = state.dispatcher();
        Callback::from(move |modal: Modal| dispatcher.dispatch(AppAction::OpenModal(modal)))
    };

    let on_cancel_modal = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(AppAction::CloseModal))
    };

    let on_confirm_modal = {
        let api = api.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |(modal, text): (Modal, String)| {
            let Some(request) = ConfirmRequest::from_dialog(&modal, &text) else {
                return;
            };
            if request.closes_immediately() {
                dispatcher.dispatch(AppAction::CloseModal);
            }
            let api = api.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                let result = match &request {
                    ConfirmRequest::Create { title } => {
                        api.create_session(title).await.map(ConfirmReply::Created)
                    }
                    ConfirmRequest::Rename { id, title } => {
                        api.rename_session(*id, title).await.map(ConfirmReply::Renamed)
                    }
                    ConfirmRequest::Delete { id } => {
                        api.delete_session(*id).await.map(|()| ConfirmReply::Done)
                    }
                    ConfirmRequest::ClearAll => api.clear_sessions().await.map(|()| ConfirmReply::Done),
                };
                let outcome = request.outcome(result);
                for action in outcome.actions {
                    dispatcher.dispatch(action);
                }
                if let Some(message) = outcome.alert {
                    crate::alert(&message);
                }
                if outcome.refresh_sessions {
                    refresh_sessions(api, dispatcher.clone());
                }
                if let Some(id) = outcome.select_after_delay {
                    TimeoutFuture::new(NEW_SESSION_SELECT_DELAY_MS).await;
                    dispatcher.dispatch(AppAction::Select(id));
                }
            });
        })
    };

    // Post whatever the reducer accepted; it alone decides whether a submit goes out.
    {
        let api = api.clone();
        let dispatcher = state.dispatcher();
        let input = input.setter();
        use_effect_with(state.outgoing.clone(), move |outgoing| {
            if let Some(outgoing) = outgoing.clone() {
                spawn_local(async move {
                    let request = SendRequest {
                        message: &outgoing.text,
                        session_id: outgoing.session_id,
                        rag: outgoing.rag,
                        search: outgoing.search,
                    };
                    match api.send_message(&request).await {
                        Ok(()) => {
                            dispatcher.dispatch(AppAction::SendCompleted);
                            input.set(String::new());
                        }
                        Err(err) => {
                            log::warn!("failed to send message to session {}: {}", outgoing.session_id, err);
                            dispatcher.dispatch(AppAction::SendFailed);
                        }
                    }
                });
            }
            || ()
        });
    }

    let send = {
        let dispatcher = state.dispatcher();
        let input = input.clone();
        let rag = *rag;
        let search = *search;
        Callback::from(move |_: ()| {
            dispatcher.dispatch(AppAction::MessageSubmitted { text: (*input).clone(), rag, search });
        })
    };

    let on_send_click = send.reform(|_: MouseEvent| ());
    let on_input_keydown = {
        let send = send.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                send.emit(());
            }
        })
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            input.set(target.value());
        })
    };

    let on_rag_change = {
        let rag = rag.clone();
        Callback::from(move |event: Event| {
            rag.set(event.target_unchecked_into::<HtmlInputElement>().checked());
        })
    };

    let on_search_change = {
        let search = search.clone();
        Callback::from(move |event: Event| {
            search.set(event.target_unchecked_into::<HtmlInputElement>().checked());
        })
    };

    let on_voice = {
        let voice = voice.clone();
        Callback::from(move |_: MouseEvent| match voice.borrow().as_ref() {
            Some(voice) => {
                if let Err(err) = voice.start() {
                    log::warn!("failed to start speech recognition: {:?}", err);
                }
            }
            None => crate::alert("当前浏览器不支持语音识别"),
        })
    };

    let on_new_session = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(AppAction::OpenModal(Modal::NewSession)))
    };

    let on_clear_history = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(AppAction::OpenModal(Modal::ClearAll)))
    };

    let on_toggle_sidebar = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(AppAction::ToggleSidebar))
    };

    let on_toggle_weather_sidebar = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(AppAction::ToggleWeatherSidebar))
    };

    let clear_history_style = if state.clear_history_visible() { "" } else { "display:none;" };

    html! {
        <ContextProvider<Rc<Config>> context={config}>
            <div class="app-container">
                <aside id="sidebar" class={classes!("sidebar", state.sidebar_collapsed.then_some("collapsed"))}>
                    <button id="toggle-sidebar-btn" type="button" onclick={on_toggle_sidebar}>{ "☰" }</button>
                    <button id="new-session-btn" type="button" onclick={on_new_session}>{ "＋ 新建会话" }</button>
                    <SessionList
                        sessions={state.sessions.clone()}
                        current={state.current_session_id}
                        open_menu={state.open_menu}
                        {on_select}
                        {on_open_menu}
                        {on_open_modal}
                    />
                    <button id="clear-history-btn" type="button" style={clear_history_style} onclick={on_clear_history}>
                        { "清空历史" }
                    </button>
                </aside>

                <main class="chat-main">
                    <ChatView entries={state.transcript.clone()} />
                    <div class="chat-options">
                        <label>
                            <input id="option-rag" type="checkbox" checked={*rag} onchange={on_rag_change} />
                            { "知识库增强" }
                        </label>
                        <label>
                            <input
                                id="option-search"
                                type="checkbox"
                                checked={*search && state.search_available}
                                disabled={!state.search_available}
                                onchange={on_search_change}
                            />
                            { "联网搜索" }
                        </label>
                    </div>
                    <div class="input-area">
                        <input
                            id="user-input"
                            type="text"
                            placeholder="请输入你的旅行问题..."
                            value={(*input).clone()}
                            oninput={on_input}
                            onkeydown={on_input_keydown}
                        />
                        <button id="voice-btn" type="button" title="语音输入" onclick={on_voice}>{ "🎤" }</button>
                        <button id="send-btn" type="button" disabled={state.is_sending()} onclick={on_send_click}>{ "发送" }</button>
                    </div>
                </main>

                <LookupSidebar collapsed={state.weather_sidebar_collapsed} on_toggle={on_toggle_weather_sidebar} />

                <Modals
                    modal={state.modal.clone()}
                    on_confirm={on_confirm_modal}
                    on_cancel={on_cancel_modal}
                />
            </div>
        </ContextProvider<Rc<Config>>>
    }
}
