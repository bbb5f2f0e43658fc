use std::rc::Rc;

use yew::Reducible;

use crate::config::INTRO_MESSAGE;
use crate::types::{ChatEntry, Message, SearchStatus, Session};

/// A message the reducer accepted for sending. The app posts it from an effect.
#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingMessage {
    pub seq: u64,
    pub session_id: i64,
    pub text: String,
    pub rag: bool,
    pub search: bool,
}

/// Which confirmation dialog is open, and the session it applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    NewSession,
    Rename { id: i64, title: String },
    Delete { id: i64 },
    ClearAll,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    SessionsLoaded(Vec<Session>),
    Select(i64),
    TranscriptLoaded {
        session_id: i64,
        generation: u64,
        history: Vec<Message>,
    },
    MessageSubmitted { text: String, rag: bool, search: bool },
    SendCompleted,
    SendFailed,
    SessionDeleted(i64),
    HistoryCleared,
    OpenMenu(i64),
    CloseMenus,
    OpenModal(Modal),
    CloseModal,
    ToggleSidebar,
    ToggleWeatherSidebar,
    SearchStatusLoaded(SearchStatus),
}

/// Page-wide UI state. Every change goes through [`AppState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub sessions: Vec<Session>,
    pub current_session_id: Option<i64>,
    pub transcript: Vec<ChatEntry>,
    /// Bumped on every transcript (re)load; responses from older generations are dropped.
    pub generation: u64,
    /// Generation whose responses are ignored because the view was cleared.
    pub discarded: Option<u64>,
    pub open_menu: Option<i64>,
    pub modal: Option<Modal>,
    /// Set while a send is in flight.
    pub outgoing: Option<OutgoingMessage>,
    send_seq: u64,
    pub sidebar_collapsed: bool,
    pub weather_sidebar_collapsed: bool,
    pub search_available: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            current_session_id: None,
            transcript: Vec::new(),
            generation: 0,
            discarded: None,
            open_menu: None,
            modal: None,
            outgoing: None,
            send_seq: 0,
            sidebar_collapsed: false,
            weather_sidebar_collapsed: false,
            search_available: true,
        }
    }
}

impl AppState {
    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::SessionsLoaded(sessions) => {
                self.sessions = sessions;
                if self.current_session_id.is_none() {
                    if let Some(first) = self.sessions.first() {
                        let id = first.id;
                        self.select(id);
                    }
                }
            }
            AppAction::Select(id) => self.select(id),
            AppAction::TranscriptLoaded { session_id, generation, history } => {
                if generation != self.generation
                    || self.discarded == Some(generation)
                    || self.current_session_id != Some(session_id)
                {
                    log::debug!(
                        "dropping stale transcript for session {} (generation {}, now {})",
                        session_id,
                        generation,
                        self.generation
                    );
                    return;
                }
                self.transcript = std::iter::once(ChatEntry::Message(Message::bot(INTRO_MESSAGE)))
                    .chain(history.into_iter().map(ChatEntry::Message))
                    .collect();
            }
            AppAction::MessageSubmitted { text, rag, search } => {
                let text = text.trim();
                let session_id = match self.current_session_id {
                    Some(id) if self.can_send(text) => id,
                    _ => return,
                };
                self.transcript.push(ChatEntry::Message(Message::user(text)));
                self.transcript.push(ChatEntry::Thinking);
                self.send_seq += 1;
                self.outgoing = Some(OutgoingMessage {
                    seq: self.send_seq,
                    session_id,
                    text: text.to_string(),
                    rag,
                    search: search && self.search_available,
                });
            }
            AppAction::SendCompleted => {
                self.remove_thinking();
                self.outgoing = None;
                self.generation += 1;
            }
            AppAction::SendFailed => {
                self.remove_thinking();
                self.outgoing = None;
            }
            AppAction::SessionDeleted(id) => {
                if self.current_session_id == Some(id) {
                    self.current_session_id = None;
                }
                if self.open_menu == Some(id) {
                    self.open_menu = None;
                }
                // The view stays empty; the next selection starts a new generation.
                self.transcript.clear();
                self.discarded = Some(self.generation);
            }
            AppAction::HistoryCleared => {
                self.sessions.clear();
                self.current_session_id = None;
                self.open_menu = None;
                self.transcript.clear();
                self.generation += 1;
            }
            AppAction::OpenMenu(id) => self.open_menu = Some(id),
            AppAction::CloseMenus => self.open_menu = None,
            AppAction::OpenModal(modal) => {
                self.open_menu = None;
                self.modal = Some(modal);
            }
            AppAction::CloseModal => self.modal = None,
            AppAction::ToggleSidebar => self.sidebar_collapsed = !self.sidebar_collapsed,
            AppAction::ToggleWeatherSidebar => {
                self.weather_sidebar_collapsed = !self.weather_sidebar_collapsed
            }
            AppAction::SearchStatusLoaded(status) => self.search_available = status.available,
        }
    }

    fn select(&mut self, id: i64) {
        self.current_session_id = Some(id);
        self.generation += 1;
    }

    fn remove_thinking(&mut self) {
        self.transcript.retain(|entry| !matches!(entry, ChatEntry::Thinking));
    }

    /// A send needs text, a selected session and no send already in flight.
    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && self.current_session_id.is_some() && !self.is_sending()
    }

    pub fn is_sending(&self) -> bool {
        self.outgoing.is_some()
    }

    pub fn is_current(&self, id: i64) -> bool {
        self.current_session_id == Some(id)
    }

    pub fn is_menu_open(&self, id: i64) -> bool {
        self.open_menu == Some(id)
    }

    pub fn clear_history_visible(&self) -> bool {
        !self.sidebar_collapsed
    }

    /// The session and generation the chat panel should be showing.
    pub fn transcript_request(&self) -> Option<(i64, u64)> {
        self.current_session_id.map(|id| (id, self.generation))
    }
}

impl Reducible for AppState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions(ids: &[i64]) -> Vec<Session> {
        ids.iter()
            .map(|id| Session { id: *id, title: format!("会话{}", id) })
            .collect()
    }

    fn loaded(state: &mut AppState, history: Vec<Message>) {
        let (session_id, generation) = state.transcript_request().unwrap();
        state.apply(AppAction::TranscriptLoaded { session_id, generation, history });
    }

    fn submit(state: &mut AppState, text: &str) {
        state.apply(AppAction::MessageSubmitted { text: text.to_string(), rag: false, search: false });
    }

    fn messages(state: &AppState) -> Vec<Message> {
        state
            .transcript
            .iter()
            .filter_map(|entry| match entry {
                ChatEntry::Message(message) => Some(message.clone()),
                ChatEntry::Thinking => None,
            })
            .collect()
    }

    #[test]
    fn test_first_load_selects_first_session() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[4, 9])));
        assert_eq!(state.current_session_id, Some(4));
        assert!(state.is_current(4));
        assert!(!state.is_current(9));
    }

    #[test]
    fn test_reload_keeps_existing_selection() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2])));
        state.apply(AppAction::Select(2));
        let generation = state.generation;
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2, 3])));
        assert_eq!(state.current_session_id, Some(2));
        assert_eq!(state.generation, generation);
    }

    #[test]
    fn test_empty_load_selects_nothing() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(Vec::new()));
        assert_eq!(state.current_session_id, None);
        assert!(state.transcript_request().is_none());
    }

    #[test]
    fn test_intro_precedes_history() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(1));
        loaded(&mut state, vec![Message::user("北京三日游"), Message::bot("好的")]);

        let shown = messages(&state);
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[0], Message::bot(INTRO_MESSAGE));
        assert_eq!(shown[1], Message::user("北京三日游"));
    }

    #[test]
    fn test_intro_shown_for_empty_history() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(5));
        loaded(&mut state, Vec::new());
        assert_eq!(messages(&state), vec![Message::bot(INTRO_MESSAGE)]);
    }

    #[test]
    fn test_stale_transcript_is_dropped() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(1));
        let (old_id, old_generation) = state.transcript_request().unwrap();
        state.apply(AppAction::Select(2));
        state.apply(AppAction::TranscriptLoaded {
            session_id: old_id,
            generation: old_generation,
            history: vec![Message::user("old")],
        });
        assert!(state.transcript.is_empty());

        loaded(&mut state, vec![Message::user("new")]);
        assert_eq!(messages(&state)[1], Message::user("new"));
    }

    #[test]
    fn test_send_is_optimistic_then_reloads() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(3));
        loaded(&mut state, Vec::new());

        submit(&mut state, "  去上海  ");
        assert!(state.is_sending());
        assert_eq!(state.transcript.len(), 3);
        assert_eq!(state.transcript[1], ChatEntry::Message(Message::user("去上海")));
        assert_eq!(state.transcript[2], ChatEntry::Thinking);

        let before = state.generation;
        state.apply(AppAction::SendCompleted);
        assert!(!state.is_sending());
        assert!(!state.transcript.contains(&ChatEntry::Thinking));
        assert_eq!(state.generation, before + 1);

        // The reload replaces the optimistic view wholesale.
        let fresh = vec![Message::user("去上海"), Message::bot("上海推荐外滩")];
        loaded(&mut state, fresh.clone());
        let shown = messages(&state);
        assert_eq!(shown[0], Message::bot(INTRO_MESSAGE));
        assert_eq!(&shown[1..], fresh.as_slice());
    }

    #[test]
    fn test_send_requires_text_and_session() {
        let mut state = AppState::default();
        submit(&mut state, "hello");
        assert!(state.transcript.is_empty());
        assert!(!state.is_sending());

        state.apply(AppAction::Select(1));
        submit(&mut state, "   ");
        assert!(state.transcript.is_empty());
        assert!(!state.can_send(""));
        assert!(state.can_send("hi"));
    }

    #[test]
    fn test_duplicate_submit_ignored_while_sending() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(1));
        submit(&mut state, "one");
        submit(&mut state, "one");
        let thinking = state
            .transcript
            .iter()
            .filter(|entry| matches!(entry, ChatEntry::Thinking))
            .count();
        assert_eq!(thinking, 1);
        assert_eq!(state.transcript.len(), 2);
    }

    #[test]
    fn test_accepted_submit_carries_outgoing_message() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(7));
        state.apply(AppAction::MessageSubmitted { text: " 天津 ".to_string(), rag: true, search: true });
        let first = state.outgoing.clone().unwrap();
        assert_eq!(first.session_id, 7);
        assert_eq!(first.text, "天津");
        assert!(first.rag && first.search);

        // A rejected submit leaves the in-flight message untouched.
        state.apply(AppAction::MessageSubmitted { text: "again".to_string(), rag: false, search: false });
        assert_eq!(state.outgoing, Some(first.clone()));

        state.apply(AppAction::SendCompleted);
        assert_eq!(state.outgoing, None);

        // A later send gets a fresh sequence number even with identical content.
        state.apply(AppAction::MessageSubmitted { text: "天津".to_string(), rag: true, search: true });
        assert_ne!(state.outgoing.as_ref().unwrap().seq, first.seq);
    }

    #[test]
    fn test_search_flag_ignored_when_unavailable() {
        let mut state = AppState::default();
        state.apply(AppAction::SearchStatusLoaded(SearchStatus { enabled: false, available: false }));
        state.apply(AppAction::Select(1));
        state.apply(AppAction::MessageSubmitted { text: "hi".to_string(), rag: false, search: true });
        assert!(!state.outgoing.unwrap().search);
    }

    #[test]
    fn test_failed_send_drops_placeholder() {
        let mut state = AppState::default();
        state.apply(AppAction::Select(1));
        submit(&mut state, "hi");
        let generation = state.generation;
        state.apply(AppAction::SendFailed);
        assert!(!state.is_sending());
        assert_eq!(state.transcript, vec![ChatEntry::Message(Message::user("hi"))]);
        assert_eq!(state.generation, generation);
    }

    #[test]
    fn test_delete_current_session_clears_selection() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2])));
        loaded(&mut state, vec![Message::user("x")]);

        state.apply(AppAction::SessionDeleted(1));
        assert_eq!(state.current_session_id, None);
        assert!(state.transcript.is_empty());

        // The following reload picks the first remaining session.
        state.apply(AppAction::SessionsLoaded(sessions(&[2])));
        assert_eq!(state.current_session_id, Some(2));
    }

    #[test]
    fn test_delete_other_session_keeps_selection() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2])));
        state.apply(AppAction::SessionDeleted(2));
        assert_eq!(state.current_session_id, Some(1));
    }

    #[test]
    fn test_delete_other_session_leaves_view_empty() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2])));
        loaded(&mut state, vec![Message::user("x")]);
        let request = state.transcript_request();
        let in_flight = state.transcript_request().unwrap();

        state.apply(AppAction::SessionDeleted(2));
        assert!(state.transcript.is_empty());
        // Same request key, so no refetch refills the view.
        assert_eq!(state.transcript_request(), request);

        // A response issued before the delete is ignored too.
        state.apply(AppAction::TranscriptLoaded {
            session_id: in_flight.0,
            generation: in_flight.1,
            history: vec![Message::user("x")],
        });
        assert!(state.transcript.is_empty());

        // The list reload that follows keeps the selection and the empty view.
        state.apply(AppAction::SessionsLoaded(sessions(&[1])));
        assert_eq!(state.current_session_id, Some(1));
        assert!(state.transcript.is_empty());

        // Selecting again loads normally.
        state.apply(AppAction::Select(1));
        loaded(&mut state, vec![Message::user("x")]);
        assert_eq!(messages(&state).len(), 2);
    }

    #[test]
    fn test_clear_history_empties_everything() {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(sessions(&[1, 2])));
        loaded(&mut state, vec![Message::user("x")]);

        state.apply(AppAction::HistoryCleared);
        assert!(state.sessions.is_empty());
        assert!(state.transcript.is_empty());
        assert_eq!(state.current_session_id, None);
    }

    #[test]
    fn test_opening_menu_closes_others() {
        let mut state = AppState::default();
        state.apply(AppAction::OpenMenu(1));
        state.apply(AppAction::OpenMenu(2));
        assert!(state.is_menu_open(2));
        assert!(!state.is_menu_open(1));

        state.apply(AppAction::CloseMenus);
        assert_eq!(state.open_menu, None);
    }

    #[test]
    fn test_opening_modal_closes_menu() {
        let mut state = AppState::default();
        state.apply(AppAction::OpenMenu(8));
        state.apply(AppAction::OpenModal(Modal::Rename { id: 8, title: "旧".to_string() }));
        assert_eq!(state.open_menu, None);
        assert_eq!(state.modal, Some(Modal::Rename { id: 8, title: "旧".to_string() }));

        state.apply(AppAction::CloseModal);
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_sidebar_toggle_hides_clear_history() {
        let mut state = AppState::default();
        assert!(state.clear_history_visible());
        state.apply(AppAction::ToggleSidebar);
        assert!(!state.clear_history_visible());
        assert!(!state.weather_sidebar_collapsed);
        state.apply(AppAction::ToggleSidebar);
        assert!(state.clear_history_visible());

        state.apply(AppAction::ToggleWeatherSidebar);
        assert!(state.weather_sidebar_collapsed);
        assert!(!state.sidebar_collapsed);
    }

    #[test]
    fn test_search_status() {
        let mut state = AppState::default();
        assert!(state.search_available);
        state.apply(AppAction::SearchStatusLoaded(SearchStatus { enabled: false, available: false }));
        assert!(!state.search_available);
    }

    #[test]
    fn test_reduce_returns_same_rc_on_noop() {
        let state = Rc::new(AppState::default());
        let next = state.clone().reduce(AppAction::CloseMenus);
        assert!(Rc::ptr_eq(&state, &next));

        let next = state.clone().reduce(AppAction::OpenMenu(1));
        assert!(!Rc::ptr_eq(&state, &next));
        assert!(next.is_menu_open(1));
    }
}
