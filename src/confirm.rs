use crate::config::DEFAULT_SESSION_TITLE;
use crate::error::ApiError;
use crate::state::{AppAction, Modal};
use crate::types::{RenameResponse, Session};

pub const RENAME_FAILED: &str = "重命名失败";

/// What a confirmed dialog asks the backend to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmRequest {
    Create { title: String },
    Rename { id: i64, title: String },
    Delete { id: i64 },
    ClearAll,
}

/// The backend's answer to a [`ConfirmRequest`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmReply {
    Created(Session),
    Renamed(RenameResponse),
    Done,
}

/// What the page does once a confirm request settles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfirmOutcome {
    pub actions: Vec<AppAction>,
    pub refresh_sessions: bool,
    /// Selected after the post-create delay.
    pub select_after_delay: Option<i64>,
    pub alert: Option<String>,
}

impl ConfirmRequest {
    /// `None` when the dialog input makes confirming a no-op.
    pub fn from_dialog(modal: &Modal, text: &str) -> Option<Self> {
        let text = text.trim();
        match modal {
            Modal::NewSession => {
                let title = if text.is_empty() { DEFAULT_SESSION_TITLE } else { text };
                Some(ConfirmRequest::Create { title: title.to_string() })
            }
            Modal::Rename { id, .. } if !text.is_empty() => {
                Some(ConfirmRequest::Rename { id: *id, title: text.to_string() })
            }
            Modal::Rename { .. } => None,
            Modal::Delete { id } => Some(ConfirmRequest::Delete { id: *id }),
            Modal::ClearAll => Some(ConfirmRequest::ClearAll),
        }
    }

    /// Destructive dialogs close before the request goes out. Title dialogs stay
    /// open until the backend accepts.
    pub fn closes_immediately(&self) -> bool {
        matches!(self, ConfirmRequest::Delete { .. } | ConfirmRequest::ClearAll)
    }

    pub fn outcome(&self, result: Result<ConfirmReply, ApiError>) -> ConfirmOutcome {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("{} failed: {}", self.describe(), err);
                return ConfirmOutcome::default();
            }
        };
        match (self, reply) {
            (ConfirmRequest::Create { .. }, ConfirmReply::Created(session)) => ConfirmOutcome {
                actions: vec![AppAction::CloseModal],
                refresh_sessions: true,
                select_after_delay: Some(session.id),
                alert: None,
            },
            (ConfirmRequest::Rename { .. }, ConfirmReply::Renamed(resp)) if resp.success => ConfirmOutcome {
                actions: vec![AppAction::CloseModal],
                refresh_sessions: true,
                ..ConfirmOutcome::default()
            },
            (ConfirmRequest::Rename { .. }, ConfirmReply::Renamed(resp)) => ConfirmOutcome {
                alert: Some(
                    resp.message
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| RENAME_FAILED.to_string()),
                ),
                ..ConfirmOutcome::default()
            },
            (ConfirmRequest::Delete { id }, ConfirmReply::Done) => ConfirmOutcome {
                actions: vec![AppAction::SessionDeleted(*id)],
                refresh_sessions: true,
                ..ConfirmOutcome::default()
            },
            (ConfirmRequest::ClearAll, ConfirmReply::Done) => ConfirmOutcome {
                actions: vec![AppAction::HistoryCleared],
                refresh_sessions: true,
                ..ConfirmOutcome::default()
            },
            (request, reply) => {
                log::warn!("unexpected reply {:?} to {:?}", reply, request);
                ConfirmOutcome::default()
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfirmRequest::Create { title } => format!("creating session {:?}", title),
            ConfirmRequest::Rename { id, .. } => format!("renaming session {}", id),
            ConfirmRequest::Delete { id } => format!("deleting session {}", id),
            ConfirmRequest::ClearAll => "clearing history".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::types::Message;

    fn network_error() -> ApiError {
        ApiError::Network("connection reset".to_string())
    }

    fn state_with_modal(modal: Modal) -> AppState {
        let mut state = AppState::default();
        state.apply(AppAction::SessionsLoaded(vec![
            Session { id: 1, title: "天津".to_string() },
            Session { id: 2, title: "北京".to_string() },
        ]));
        let (session_id, generation) = state.transcript_request().unwrap();
        state.apply(AppAction::TranscriptLoaded {
            session_id,
            generation,
            history: vec![Message::user("去哪玩")],
        });
        state.apply(AppAction::OpenModal(modal));
        state
    }

    fn run(state: &mut AppState, modal: &Modal, text: &str, result: Result<ConfirmReply, ApiError>) -> ConfirmOutcome {
        let request = ConfirmRequest::from_dialog(modal, text).unwrap();
        if request.closes_immediately() {
            state.apply(AppAction::CloseModal);
        }
        let outcome = request.outcome(result);
        for action in outcome.actions.clone() {
            state.apply(action);
        }
        outcome
    }

    #[test]
    fn test_dialog_titles() {
        assert_eq!(
            ConfirmRequest::from_dialog(&Modal::NewSession, "  "),
            Some(ConfirmRequest::Create { title: DEFAULT_SESSION_TITLE.to_string() })
        );
        assert_eq!(
            ConfirmRequest::from_dialog(&Modal::NewSession, " 周末 "),
            Some(ConfirmRequest::Create { title: "周末".to_string() })
        );
        let rename = Modal::Rename { id: 3, title: "旧".to_string() };
        assert_eq!(ConfirmRequest::from_dialog(&rename, "   "), None);
        assert_eq!(
            ConfirmRequest::from_dialog(&rename, "新"),
            Some(ConfirmRequest::Rename { id: 3, title: "新".to_string() })
        );
    }

    #[test]
    fn test_create_success_closes_and_selects() {
        let mut state = state_with_modal(Modal::NewSession);
        let session = Session { id: 9, title: "新会话".to_string() };
        let outcome = run(&mut state, &Modal::NewSession, "", Ok(ConfirmReply::Created(session)));
        assert_eq!(state.modal, None);
        assert!(outcome.refresh_sessions);
        assert_eq!(outcome.select_after_delay, Some(9));
    }

    #[test]
    fn test_create_failure_keeps_modal_open() {
        let mut state = state_with_modal(Modal::NewSession);
        let outcome = run(&mut state, &Modal::NewSession, "周末", Err(network_error()));
        assert_eq!(outcome, ConfirmOutcome::default());
        assert_eq!(state.modal, Some(Modal::NewSession));
    }

    #[test]
    fn test_rename_success_closes_and_refreshes() {
        let modal = Modal::Rename { id: 1, title: "天津".to_string() };
        let mut state = state_with_modal(modal.clone());
        let resp = RenameResponse { success: true, message: None };
        let outcome = run(&mut state, &modal, "天津两日", Ok(ConfirmReply::Renamed(resp)));
        assert_eq!(state.modal, None);
        assert!(outcome.refresh_sessions);
        assert_eq!(outcome.alert, None);
    }

    #[test]
    fn test_rename_rejected_alerts_and_keeps_modal() {
        let modal = Modal::Rename { id: 1, title: "天津".to_string() };

        let mut state = state_with_modal(modal.clone());
        let resp = RenameResponse { success: false, message: Some("标题重复".to_string()) };
        let outcome = run(&mut state, &modal, "北京", Ok(ConfirmReply::Renamed(resp)));
        assert_eq!(outcome.alert.as_deref(), Some("标题重复"));
        assert!(!outcome.refresh_sessions);
        assert_eq!(state.modal, Some(modal.clone()));

        let mut state = state_with_modal(modal.clone());
        let resp = RenameResponse { success: false, message: Some(String::new()) };
        let outcome = run(&mut state, &modal, "北京", Ok(ConfirmReply::Renamed(resp)));
        assert_eq!(outcome.alert.as_deref(), Some(RENAME_FAILED));

        let outcome = run(&mut state, &modal, "北京", Ok(ConfirmReply::Renamed(RenameResponse::default())));
        assert_eq!(outcome.alert.as_deref(), Some("重命名失败"));
    }

    #[test]
    fn test_rename_error_keeps_modal_open() {
        let modal = Modal::Rename { id: 1, title: "天津".to_string() };
        let mut state = state_with_modal(modal.clone());
        let err = ApiError::Status { status: 500, url: "/sessions/1/rename".to_string() };
        let outcome = run(&mut state, &modal, "北京", Err(err));
        assert_eq!(outcome, ConfirmOutcome::default());
        assert_eq!(state.modal, Some(modal));
    }

    #[test]
    fn test_delete_success_and_failure() {
        let modal = Modal::Delete { id: 1 };

        let mut state = state_with_modal(modal.clone());
        let outcome = run(&mut state, &modal, "", Ok(ConfirmReply::Done));
        assert!(outcome.refresh_sessions);
        assert_eq!(state.modal, None);
        assert_eq!(state.current_session_id, None);
        assert!(state.transcript.is_empty());

        let mut state = state_with_modal(modal.clone());
        let before = state.transcript.clone();
        let outcome = run(&mut state, &modal, "", Err(network_error()));
        assert!(!outcome.refresh_sessions);
        assert_eq!(state.modal, None);
        assert_eq!(state.current_session_id, Some(1));
        assert_eq!(state.transcript, before);
    }

    #[test]
    fn test_clear_all_success_empties_state() {
        let mut state = state_with_modal(Modal::ClearAll);
        let outcome = run(&mut state, &Modal::ClearAll, "", Ok(ConfirmReply::Done));
        assert!(outcome.refresh_sessions);
        assert!(state.sessions.is_empty());
        assert!(state.transcript.is_empty());
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_clear_all_failure_leaves_state_unchanged() {
        let mut state = state_with_modal(Modal::ClearAll);
        let sessions = state.sessions.clone();
        let transcript = state.transcript.clone();
        let outcome = run(&mut state, &Modal::ClearAll, "", Err(network_error()));
        assert_eq!(outcome, ConfirmOutcome::default());
        assert_eq!(state.sessions, sessions);
        assert_eq!(state.transcript, transcript);
        assert_eq!(state.current_session_id, Some(1));
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_mismatched_reply_does_nothing() {
        let request = ConfirmRequest::Delete { id: 1 };
        let session = Session { id: 2, title: "x".to_string() };
        assert_eq!(request.outcome(Ok(ConfirmReply::Created(session))), ConfirmOutcome::default());
    }
}
