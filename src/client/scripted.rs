//! In-process messaging client with programmable outcomes
//!
//! Useful for embedding the bridge without a real automation driver and for
//! exercising the bridge in tests. It never emits lifecycle events on its
//! own, except the optional `message_create` echo of sent messages.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{ClientEvent, Contact, MessagingClient, SendOptions, SentMessage};
use crate::types::{AccountInfo, ClientError, ClientMessage, ClientResult};
use crate::utils::current_timestamp;

/// A send recorded by [`ScriptedClient`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedSend {
    pub chat_id: String,
    pub body: String,
    pub options: SendOptions,
}

#[derive(Default)]
struct Script {
    ready: bool,
    account: AccountInfo,
    init_failures: u32,
    fail_destroy: bool,
    fail_send: bool,
    registered: Option<bool>,
    contacts: HashMap<String, Contact>,
    echo: Option<mpsc::Sender<ClientEvent>>,
    init_calls: u32,
    destroy_calls: u32,
    sends: Vec<RecordedSend>,
    next_id: u64,
}

/// Messaging client driven entirely by its script
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<Script>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account returned by `account_info`
    pub fn with_account(self, name: &str, number: &str) -> Self {
        self.script.lock().account = AccountInfo {
            name: Some(name.to_string()),
            number: Some(number.to_string()),
        };
        self
    }

    /// Make the next `count` initialize calls fail
    pub fn fail_initialize(&self, count: u32) {
        self.script.lock().init_failures = count;
    }

    pub fn fail_destroy(&self, fail: bool) {
        self.script.lock().fail_destroy = fail;
    }

    pub fn fail_send(&self, fail: bool) {
        self.script.lock().fail_send = fail;
    }

    /// What the live handle reports from `is_ready`
    pub fn set_ready(&self, ready: bool) {
        self.script.lock().ready = ready;
    }

    /// Outcome of `is_registered_user`; `None` makes the probe fail
    pub fn set_registered(&self, registered: Option<bool>) {
        self.script.lock().registered = registered;
    }

    pub fn add_contact(&self, chat_id: &str, contact: Contact) {
        self.script.lock().contacts.insert(chat_id.to_string(), contact);
    }

    /// Echo every successful send as a `message_create` event on `tx`
    pub fn echo_sends_to(&self, tx: mpsc::Sender<ClientEvent>) {
        self.script.lock().echo = Some(tx);
    }

    pub fn initialize_calls(&self) -> u32 {
        self.script.lock().init_calls
    }

    pub fn destroy_calls(&self) -> u32 {
        self.script.lock().destroy_calls
    }

    pub fn sends(&self) -> Vec<RecordedSend> {
        self.script.lock().sends.clone()
    }
}

#[async_trait]
impl MessagingClient for ScriptedClient {
    async fn initialize(&self) -> ClientResult<()> {
        let mut script = self.script.lock();
        script.init_calls += 1;
        if script.init_failures > 0 {
            script.init_failures -= 1;
            return Err(ClientError::Unavailable("browser failed to launch".to_string()));
        }
        Ok(())
    }

    async fn destroy(&self) -> ClientResult<()> {
        let mut script = self.script.lock();
        script.destroy_calls += 1;
        if script.fail_destroy {
            return Err(ClientError::Rejected("session is locked".to_string()));
        }
        script.ready = false;
        Ok(())
    }

    async fn send_message(
        &self,
        chat_id: &str,
        body: &str,
        options: SendOptions,
    ) -> ClientResult<SentMessage> {
        let mut script = self.script.lock();
        if script.fail_send {
            return Err(ClientError::Rejected("send failed".to_string()));
        }

        script.next_id += 1;
        let id = format!("3EB0{:08X}", script.next_id);
        script.sends.push(RecordedSend {
            chat_id: chat_id.to_string(),
            body: body.to_string(),
            options: options.clone(),
        });

        if let Some(tx) = &script.echo {
            let echo = ClientEvent::MessageCreate {
                message: ClientMessage {
                    id: id.clone(),
                    from: script.account.chat_id().unwrap_or_default(),
                    to: Some(chat_id.to_string()),
                    body: body.to_string(),
                    timestamp: current_timestamp(),
                    kind: "chat".to_string(),
                    from_me: true,
                    marker: options.marker,
                },
            };
            if let Err(e) = tx.try_send(echo) {
                tracing::debug!(error = %e, "echo dropped");
            }
        }

        Ok(SentMessage { id })
    }

    async fn account_info(&self) -> ClientResult<AccountInfo> {
        Ok(self.script.lock().account.clone())
    }

    async fn is_ready(&self) -> bool {
        self.script.lock().ready
    }

    async fn is_registered_user(&self, _chat_id: &str) -> ClientResult<bool> {
        self.script
            .lock()
            .registered
            .ok_or_else(|| ClientError::Unavailable("session not initialized".to_string()))
    }

    async fn contact(&self, chat_id: &str) -> ClientResult<Option<Contact>> {
        Ok(self.script.lock().contacts.get(chat_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_failures_are_consumed() {
        let client = ScriptedClient::new();
        client.fail_initialize(2);

        assert!(client.initialize().await.is_err());
        assert!(client.initialize().await.is_err());
        assert!(client.initialize().await.is_ok());
        assert_eq!(client.initialize_calls(), 3);
    }

    #[tokio::test]
    async fn test_send_echoes_marker() {
        let client = ScriptedClient::new().with_account("Loja", "5511000");
        let (tx, mut rx) = mpsc::channel(4);
        client.echo_sends_to(tx);

        let options = SendOptions {
            marker: Some("relay-7".to_string()),
        };
        let sent = client.send_message("55@c.us", "oi", options).await.unwrap();

        match rx.recv().await.unwrap() {
            ClientEvent::MessageCreate { message } => {
                assert_eq!(message.id, sent.id);
                assert_eq!(message.from, "5511000@c.us");
                assert_eq!(message.marker.as_deref(), Some("relay-7"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(client.sends().len(), 1);
    }

    #[tokio::test]
    async fn test_registered_probe_fails_when_unset() {
        let client = ScriptedClient::new();
        assert!(client.is_registered_user("1@c.us").await.is_err());
        client.set_registered(Some(true));
        assert!(client.is_registered_user("1@c.us").await.unwrap());
    }

    #[tokio::test]
    async fn test_full_echo_channel_does_not_fail_send() {
        let client = ScriptedClient::new().with_account("Loja", "5511988887777");
        let (tx, mut rx) = mpsc::channel(1);
        client.echo_sends_to(tx);

        let first = client
            .send_message("5511999999999@c.us", "one", SendOptions::default())
            .await
            .unwrap();
        assert!(client
            .send_message("5511999999999@c.us", "two", SendOptions::default())
            .await
            .is_ok());

        assert_eq!(client.sends().len(), 2);
        match rx.recv().await {
            Some(ClientEvent::MessageCreate { message }) => assert_eq!(message.id, first.id),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
