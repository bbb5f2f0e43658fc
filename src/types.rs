use serde::{Deserialize, Serialize};

pub const USER_AVATAR: &str = "/static/avatars/user.png";
pub const BOT_AVATAR: &str = "/static/avatars/bot.png";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Session {
    pub id: i64,
    pub title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

impl Alignment {
    pub fn justify(self) -> &'static str {
        match self {
            Alignment::Left => "flex-start",
            Alignment::Right => "flex-end",
        }
    }

    pub fn text_align(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
        }
    }
}

/// Per-role layout and formatting rules for a chat bubble.
impl Role {
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    pub fn avatar(self) -> &'static str {
        match self {
            Role::User => USER_AVATAR,
            Role::Bot => BOT_AVATAR,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "你",
            Role::Bot => "NK-Traveler",
        }
    }

    pub fn alignment(self) -> Alignment {
        match self {
            Role::User => Alignment::Right,
            Role::Bot => Alignment::Left,
        }
    }

    /// Bot avatars sit before the bubble, user avatars after it.
    pub fn avatar_first(self) -> bool {
        matches!(self, Role::Bot)
    }

    /// User text is always shown verbatim.
    pub fn renders_markdown(self) -> bool {
        matches!(self, Role::Bot)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub message: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, message: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { role: Role::Bot, message: text.into() }
    }
}

/// One row of the chat panel. `Thinking` never leaves the client.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    Message(Message),
    Thinking,
}

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub message: &'a str,
    pub session_id: i64,
    pub rag: bool,
    pub search: bool,
}

#[derive(Debug, Serialize)]
pub struct TitleRequest<'a> {
    pub title: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RenameResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SearchStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub available: bool,
}
