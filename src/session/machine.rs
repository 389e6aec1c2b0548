//! Connection state transitions
//!
//! | From | Event | To |
//! |---|---|---|
//! | initializing, qr_pending | qr | qr_pending |
//! | initializing, qr_pending | authenticated | authenticated |
//! | authenticated | ready | connected |
//! | any but disconnected | disconnected | disconnected |
//! | any | auth_failure | error |
//! | disconnected, error | loading_screen | initializing (the bridge drops it unless an init is pending) |
//!
//! Everything else leaves the status as it is.

use crate::client::ClientEvent;
use crate::types::ConnectionStatus;

use ConnectionStatus::*;

/// Status after `event`, or `None` when the event does not move the session
pub fn next_status(current: ConnectionStatus, event: &ClientEvent) -> Option<ConnectionStatus> {
    match (current, event) {
        (Initializing | QrPending, ClientEvent::Qr { .. }) => Some(QrPending),
        // A restored session authenticates without ever showing a QR
        (Initializing | QrPending, ClientEvent::Authenticated) => Some(Authenticated),
        (Authenticated, ClientEvent::Ready) => Some(Connected),
        (Disconnected, ClientEvent::Disconnected { .. }) => None,
        (_, ClientEvent::Disconnected { .. }) => Some(Disconnected),
        (_, ClientEvent::AuthFailure { .. }) => Some(Error),
        (Disconnected | Error, ClientEvent::LoadingScreen { .. }) => Some(Initializing),
        _ => None,
    }
}

/// Fold a sequence of events over a starting status
pub fn replay<'a, I>(start: ConnectionStatus, events: I) -> ConnectionStatus
where
    I: IntoIterator<Item = &'a ClientEvent>,
{
    events
        .into_iter()
        .fold(start, |status, event| next_status(status, event).unwrap_or(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientMessage;

    const ALL: [ConnectionStatus; 6] =
        [Disconnected, Initializing, QrPending, Authenticated, Connected, Error];

    fn qr() -> ClientEvent {
        ClientEvent::Qr { qr: "ABC".to_string() }
    }

    fn dropped() -> ClientEvent {
        ClientEvent::Disconnected { reason: "NAVIGATION".to_string() }
    }

    fn auth_failure() -> ClientEvent {
        ClientEvent::AuthFailure { error: "bad session".to_string() }
    }

    fn message() -> ClientEvent {
        ClientEvent::Message {
            message: ClientMessage {
                id: "1".to_string(),
                from: "55@c.us".to_string(),
                to: None,
                body: String::new(),
                timestamp: 0,
                kind: "chat".to_string(),
                from_me: false,
                marker: None,
            },
        }
    }

    #[test]
    fn test_happy_path() {
        let events = [qr(), ClientEvent::Authenticated, ClientEvent::Ready];
        assert_eq!(replay(Initializing, &events), Connected);
    }

    #[test]
    fn test_restored_session_skips_qr() {
        let events = [ClientEvent::Authenticated, ClientEvent::Ready];
        assert_eq!(replay(Initializing, &events), Connected);
    }

    #[test]
    fn test_ready_needs_authenticated() {
        for status in [Disconnected, Initializing, QrPending, Error] {
            assert_eq!(next_status(status, &ClientEvent::Ready), None, "{}", status);
        }
    }

    #[test]
    fn test_auth_failure_from_anywhere() {
        for status in ALL {
            assert_eq!(next_status(status, &auth_failure()), Some(Error));
        }
    }

    #[test]
    fn test_disconnect_from_anywhere_but_disconnected() {
        for status in ALL {
            let expected = if status == Disconnected { None } else { Some(Disconnected) };
            assert_eq!(next_status(status, &dropped()), expected, "{}", status);
        }
    }

    #[test]
    fn test_messages_never_move_status() {
        for status in ALL {
            assert_eq!(next_status(status, &message()), None);
        }
    }

    #[test]
    fn test_qr_ignored_once_authenticated() {
        assert_eq!(next_status(Authenticated, &qr()), None);
        assert_eq!(next_status(Connected, &qr()), None);
    }

    #[test]
    fn test_loading_screen_restarts_from_idle() {
        let loading = ClientEvent::LoadingScreen {
            percent: 40,
            message: "WhatsApp".to_string(),
        };
        assert_eq!(next_status(Error, &loading), Some(Initializing));
        assert_eq!(next_status(Connected, &loading), None);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = [
            qr(),
            qr(),
            ClientEvent::Authenticated,
            ClientEvent::Ready,
            message(),
            dropped(),
            auth_failure(),
        ];
        assert_eq!(replay(Initializing, &events), Error);
        assert_eq!(replay(Initializing, &events[..5]), Connected);
        assert_eq!(replay(Initializing, &events[..6]), Disconnected);
    }
}
