use yew::prelude::*;

use crate::markdown;
use crate::types::{ChatEntry, Message, Role};

#[derive(Properties, PartialEq)]
pub struct ChatViewProps {
    pub entries: Vec<ChatEntry>,
}

/// The transcript panel. Scrolls to the newest entry whenever the entries change.
#[function_component(ChatView)]
pub fn chat_view(props: &ChatViewProps) -> Html {
    let chat_box = use_node_ref();

    {
        let chat_box = chat_box.clone();
        use_effect_with(props.entries.clone(), move |_| {
            if let Some(element) = chat_box.cast::<web_sys::Element>() {
                element.set_scroll_top(element.scroll_height());
            }
            || ()
        });
    }

    html! {
        <div id="chat-box" ref={chat_box}>
            { for props.entries.iter().map(|entry| match entry {
                ChatEntry::Message(message) => html! { <MessageBubble message={message.clone()} /> },
                ChatEntry::Thinking => thinking_bubble(),
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MessageBubbleProps {
    pub message: Message,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let role = props.message.role;
    let text = if role.renders_markdown() {
        markdown::to_html(&props.message.message)
    } else {
        html! { { props.message.message.clone() } }
    };
    bubble_row(role, text)
}

fn thinking_bubble() -> Html {
    bubble_row(
        Role::Bot,
        html! {
            <>
                <span class="thinking-dot">{ "●" }</span>{ " " }
                <span class="thinking-dot">{ "●" }</span>{ " " }
                <span class="thinking-dot">{ "●" }</span>{ " 正在思考..." }
            </>
        },
    )
}

fn bubble_row(role: Role, text: Html) -> Html {
    let alignment = role.alignment();
    let style = format!(
        "display:flex; justify-content:{}; text-align:{};",
        alignment.justify(),
        alignment.text_align()
    );
    let avatar = html! {
        <img class="avatar" src={role.avatar()} alt={role.display_name()} />
    };
    let bubble = html! {
        <div class="bubble">
            <span class="nickname">{ role.display_name() }</span>
            <span class="text">{ text }</span>
        </div>
    };

    let row = if role.avatar_first() { [avatar, bubble] } else { [bubble, avatar] };

    html! {
        <div class={classes!("message", role.css_class())} {style}>
            { for row }
        </div>
    }
}
