mod chat_view;
mod lookup_sidebar;
mod modals;
mod session_list;

pub use chat_view::{ChatView, MessageBubble};
pub use lookup_sidebar::LookupSidebar;
pub use modals::Modals;
pub use session_list::SessionList;
