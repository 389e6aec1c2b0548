//! Session state record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConnectionStatus;

/// Identity of the account the session is logged into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountInfo {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl AccountInfo {
    /// Own chat address (`<number>@c.us`), if the number is known
    pub fn chat_id(&self) -> Option<String> {
        self.number
            .as_deref()
            .map(|n| format!("{}{}", n, crate::utils::CHAT_SUFFIX))
    }
}

/// The mutable status record of one session.
///
/// Fields are private so the QR and identity invariants can only be
/// changed through [`SessionState::set_status`] and friends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    status: ConnectionStatus,
    qr: Option<String>,
    account: Option<AccountInfo>,
    connected_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn qr(&self) -> Option<&str> {
        self.qr.as_deref()
    }

    pub fn account(&self) -> Option<&AccountInfo> {
        self.account.as_ref()
    }

    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Move to `status`, dropping whatever the new status may not carry.
    ///
    /// Entering `Connected` stamps `connected_at` unless already set.
    pub fn set_status(&mut self, status: ConnectionStatus) {
        if status != ConnectionStatus::QrPending {
            self.qr = None;
        }
        if status == ConnectionStatus::Connected {
            self.connected_at.get_or_insert_with(Utc::now);
            self.last_error = None;
        } else {
            self.account = None;
            self.connected_at = None;
        }
        self.status = status;
    }

    /// Store a QR payload and move to `QrPending`
    pub fn set_qr(&mut self, payload: String) {
        self.set_status(ConnectionStatus::QrPending);
        self.qr = Some(payload);
    }

    /// Record the account identity; ignored unless connected
    pub fn set_account(&mut self, account: AccountInfo) {
        if self.status == ConnectionStatus::Connected {
            self.account = Some(account);
        }
    }

    /// Move to `Error` with a reason
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.set_status(ConnectionStatus::Error);
        self.last_error = Some(reason.into());
    }

    /// Back to a fresh `Disconnected` record
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_state() -> SessionState {
        let mut state = SessionState::new();
        state.set_status(ConnectionStatus::Connected);
        state.set_account(AccountInfo {
            name: Some("Loja".to_string()),
            number: Some("5511988887777".to_string()),
        });
        state
    }

    #[test]
    fn test_qr_only_kept_while_pending() {
        let mut state = SessionState::new();
        state.set_qr("ABC".to_string());
        assert_eq!(state.status(), ConnectionStatus::QrPending);
        assert_eq!(state.qr(), Some("ABC"));

        state.set_status(ConnectionStatus::Authenticated);
        assert_eq!(state.qr(), None);
    }

    #[test]
    fn test_identity_cleared_when_leaving_connected() {
        let mut state = connected_state();
        assert!(state.connected_at().is_some());
        assert_eq!(state.account().unwrap().number.as_deref(), Some("5511988887777"));

        state.set_status(ConnectionStatus::Disconnected);
        assert!(state.account().is_none());
        assert!(state.connected_at().is_none());
    }

    #[test]
    fn test_connected_at_kept_on_reentry() {
        let mut state = connected_state();
        let first = state.connected_at();
        state.set_status(ConnectionStatus::Connected);
        assert_eq!(state.connected_at(), first);
    }

    #[test]
    fn test_account_ignored_when_not_connected() {
        let mut state = SessionState::new();
        state.set_account(AccountInfo::default());
        assert!(state.account().is_none());
    }

    #[test]
    fn test_fail_records_reason() {
        let mut state = connected_state();
        state.fail("bad credentials");
        assert_eq!(state.status(), ConnectionStatus::Error);
        assert_eq!(state.last_error(), Some("bad credentials"));
        assert!(state.account().is_none());
    }

    #[test]
    fn test_chat_id() {
        let info = AccountInfo {
            name: None,
            number: Some("5511".to_string()),
        };
        assert_eq!(info.chat_id().as_deref(), Some("5511@c.us"));
        assert_eq!(AccountInfo::default().chat_id(), None);
    }
}
