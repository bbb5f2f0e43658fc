use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::state::Modal;

#[derive(Properties, PartialEq)]
pub struct ModalsProps {
    pub modal: Option<Modal>,
    /// Emits the open dialog together with its title input, if it has one.
    pub on_confirm: Callback<(Modal, String)>,
    pub on_cancel: Callback<()>,
}

fn overlay_style(visible: bool) -> &'static str {
    if visible {
        "display:flex;"
    } else {
        "display:none;"
    }
}

#[function_component(Modals)]
pub fn modals(props: &ModalsProps) -> Html {
    let draft = use_state(String::new);
    let new_title_ref = use_node_ref();
    let rename_title_ref = use_node_ref();

    // Seed the title input each time a dialog opens.
    {
        let draft = draft.clone();
        let new_title_ref = new_title_ref.clone();
        let rename_title_ref = rename_title_ref.clone();
        use_effect_with(props.modal.clone(), move |modal| {
            let focus = match modal {
                Some(Modal::NewSession) => {
                    draft.set(String::new());
                    Some(new_title_ref)
                }
                Some(Modal::Rename { title, .. }) => {
                    draft.set(title.clone());
                    Some(rename_title_ref)
                }
                _ => None,
            };
            if let Some(input) = focus.and_then(|node| node.cast::<HtmlInputElement>()) {
                if let Err(err) = input.focus() {
                    log::debug!("could not focus modal input: {:?}", err);
                }
            }
            || ()
        });
    }

    let confirm = {
        let modal = props.modal.clone();
        let draft = draft.clone();
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: ()| {
            if let Some(modal) = modal.clone() {
                on_confirm.emit((modal, (*draft).clone()));
            }
        })
    };

    let on_click_confirm = confirm.reform(|_: MouseEvent| ());
    let on_click_cancel = props.on_cancel.reform(|_: MouseEvent| ());

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            draft.set(target.value());
        })
    };

    let on_keydown = {
        let confirm = confirm.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                confirm.emit(());
            }
        })
    };

    let modal = props.modal.as_ref();
    let is_new = matches!(modal, Some(Modal::NewSession));
    let is_rename = matches!(modal, Some(Modal::Rename { .. }));
    let is_delete = matches!(modal, Some(Modal::Delete { .. }));
    let is_clear = matches!(modal, Some(Modal::ClearAll));

    html! {
        <>
            <div id="modal-overlay" class="modal-overlay" style={overlay_style(is_new)}>
                <div class="modal">
                    <div class="modal-title">{ "新建会话" }</div>
                    <input
                        id="modal-session-title"
                        type="text"
                        placeholder="请输入会话标题"
                        ref={new_title_ref}
                        value={if is_new { (*draft).clone() } else { String::new() }}
                        oninput={on_input.clone()}
                        onkeydown={on_keydown.clone()}
                    />
                    <div class="modal-actions">
                        <button id="modal-cancel-btn" type="button" onclick={on_click_cancel.clone()}>{ "取消" }</button>
                        <button id="modal-confirm-btn" type="button" onclick={on_click_confirm.clone()}>{ "确定" }</button>
                    </div>
                </div>
            </div>

            <div id="rename-modal-overlay" class="modal-overlay" style={overlay_style(is_rename)}>
                <div class="modal">
                    <div class="modal-title">{ "重命名会话" }</div>
                    <input
                        id="rename-session-title"
                        type="text"
                        ref={rename_title_ref}
                        value={if is_rename { (*draft).clone() } else { String::new() }}
                        oninput={on_input}
                        onkeydown={on_keydown}
                    />
                    <div class="modal-actions">
                        <button id="rename-modal-cancel-btn" type="button" onclick={on_click_cancel.clone()}>{ "取消" }</button>
                        <button id="rename-modal-confirm-btn" type="button" onclick={on_click_confirm.clone()}>{ "确定" }</button>
                    </div>
                </div>
            </div>

            <div id="delete-modal-overlay" class="modal-overlay" style={overlay_style(is_delete)}>
                <div class="modal">
                    <div class="modal-title">{ "确定要删除该会话吗？" }</div>
                    <div class="modal-actions">
                        <button id="delete-modal-cancel-btn" type="button" onclick={on_click_cancel.clone()}>{ "取消" }</button>
                        <button id="delete-modal-confirm-btn" type="button" onclick={on_click_confirm.clone()}>{ "删除" }</button>
                    </div>
                </div>
            </div>

            <div id="clear-modal-overlay" class="modal-overlay" style={overlay_style(is_clear)}>
                <div class="modal">
                    <div class="modal-title">{ "确定要清空所有聊天记录吗？" }</div>
                    <div class="modal-actions">
                        <button id="clear-modal-cancel-btn" type="button" onclick={on_click_cancel}>{ "取消" }</button>
                        <button id="clear-modal-confirm-btn" type="button" onclick={on_click_confirm}>{ "清空" }</button>
                    </div>
                </div>
            </div>
        </>
    }
}
