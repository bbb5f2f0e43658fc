use yew::prelude::*;

use crate::state::Modal;
use crate::types::Session;

#[derive(Properties, PartialEq)]
pub struct SessionListProps {
    pub sessions: Vec<Session>,
    pub current: Option<i64>,
    pub open_menu: Option<i64>,
    pub on_select: Callback<i64>,
    pub on_open_menu: Callback<i64>,
    pub on_open_modal: Callback<Modal>,
}

#[function_component(SessionList)]
pub fn session_list(props: &SessionListProps) -> Html {
    html! {
        <ul id="session-list">
            { for props.sessions.iter().map(|session| {
                let id = session.id;
                let is_open = props.open_menu == Some(id);

                let on_click = {
                    let on_select = props.on_select.clone();
                    Callback::from(move |_: MouseEvent| on_select.emit(id))
                };

                // Menu clicks must not reach the item's select handler.
                let on_menu = {
                    let on_open_menu = props.on_open_menu.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_open_menu.emit(id);
                    })
                };

                let on_rename = {
                    let on_open_modal = props.on_open_modal.clone();
                    let title = session.title.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_open_modal.emit(Modal::Rename { id, title: title.clone() });
                    })
                };

                let on_delete = {
                    let on_open_modal = props.on_open_modal.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_open_modal.emit(Modal::Delete { id });
                    })
                };

                html! {
                    <li
                        key={id}
                        class={classes!("session-item", (props.current == Some(id)).then_some("active"))}
                        data-session-id={id.to_string()}
                        onclick={on_click}
                    >
                        { &session.title }
                        <button
                            class="session-menu-btn"
                            type="button"
                            title="更多操作"
                            tabindex="-1"
                            onclick={on_menu}
                        >
                            { "..." }
                            <div
                                class="session-menu-dropdown"
                                style={if is_open { "display:flex;" } else { "display:none;" }}
                            >
                                <button type="button" onclick={on_rename}>{ "重命名" }</button>
                                <button type="button" onclick={on_delete}>{ "删除" }</button>
                            </div>
                        </button>
                    </li>
                }
            }) }
        </ul>
    }
}
