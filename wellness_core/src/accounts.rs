//! User registration and newsletter subscription.
//!
//! Both are single-record writes. Subscription additionally sends a
//! confirmation notice through a `Notifier`; delivery problems are logged and
//! do not undo the subscription.

use crate::normalize::{required_text, Payload};
use crate::{Error, Record, RecordSink, Result};
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use rand_core::OsRng;
use uuid::Uuid;

/// Outbound message to a single recipient
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl Notification {
    /// Newsletter subscription confirmation
    pub fn subscription_confirmation(from: &str, to: &str, first_name: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: "Subscription Confirmation".into(),
            text: format!(
                "Hello {},\n\nThank you for subscribing to our newsletter!",
                first_name
            ),
            html: format!(
                "<html>\n<head></head>\n<body>\n  <h1>Hello {},</h1>\n  <p>Thank you for subscribing to our newsletter!</p>\n</body>\n</html>\n",
                first_name
            ),
        }
    }
}

/// Delivery channel for notifications; returns a message id
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<String>;
}

/// Notifier that records the message in the log instead of delivering it
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<String> {
        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            "Notification {} to {}: {}",
            message_id,
            notification.to,
            notification.subject
        );
        Ok(message_id)
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))
}

/// Validate a registration payload and store the account record
pub async fn register(sink: &dyn RecordSink, payload: &Payload) -> Result<()> {
    let fields = ["email", "firstName", "lastName", "password"];
    if fields.iter().any(|f| required_text(payload, f).is_err()) {
        return Err(Error::validation("email, firstName, lastName and password", "are required"));
    }

    let email = required_text(payload, "email")?;
    let record = Record::new()
        .with("email", email.as_str())
        .with("firstName", required_text(payload, "firstName")?)
        .with("lastName", required_text(payload, "lastName")?)
        .with("passwordHash", hash_password(&required_text(payload, "password")?)?)
        .with("created_at", Utc::now().to_rfc3339());

    sink.put(record).await?;
    tracing::info!("Registered user {}", email);
    Ok(())
}

/// Validate a subscription payload, store it and send the confirmation
pub async fn subscribe(
    sink: &dyn RecordSink,
    notifier: &dyn Notifier,
    sender: &str,
    payload: &Payload,
) -> Result<()> {
    if required_text(payload, "email").is_err() || required_text(payload, "firstName").is_err() {
        return Err(Error::validation("email and firstName", "are required"));
    }

    let email = required_text(payload, "email")?;
    let first_name = required_text(payload, "firstName")?;
    let record = Record::new()
        .with("email", email.as_str())
        .with("firstName", first_name.as_str())
        .with("subscribed_at", Utc::now().to_rfc3339());

    sink.put(record).await?;

    let notification = Notification::subscription_confirmation(sender, &email, &first_name);
    match notifier.send(&notification).await {
        Ok(message_id) => tracing::info!("Confirmation sent, message id {}", message_id),
        Err(e) => tracing::error!("Error sending confirmation to {}: {}", email, e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<String> {
            if self.fail {
                return Err(Error::Notify("MessageRejected".into()));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok("msg-1".into())
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let store = MemoryStore::new("email");
        let p = payload(json!({
            "email": "ana@example.com",
            "firstName": "Ana",
            "lastName": "Lima",
            "password": "hunter22"
        }));

        register(&store, &p).await.unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        let stored = &records[0];
        assert!(stored.get("password").is_none());
        let hash = stored.text("passwordHash").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("hunter22"));
        assert!(stored.text("created_at").is_some());
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let store = MemoryStore::new("email");
        let p = payload(json!({"email": "ana@example.com", "firstName": "Ana"}));
        let err = register(&store, &p).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_sends_confirmation() {
        let store = MemoryStore::new("email");
        let notifier = RecordingNotifier::default();
        let p = payload(json!({"email": "ana@example.com", "firstName": "Ana"}));

        subscribe(&store, &notifier, "info@dyadic.health", &p)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
        assert!(sent[0].text.starts_with("Hello Ana,"));
    }

    #[tokio::test]
    async fn test_subscribe_survives_notifier_failure() {
        let store = MemoryStore::new("email");
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let p = payload(json!({"email": "ana@example.com", "firstName": "Ana"}));

        assert!(subscribe(&store, &notifier, "info@dyadic.health", &p)
            .await
            .is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_log_notifier_returns_id() {
        let n = Notification::subscription_confirmation("a@b.c", "d@e.f", "Dee");
        let id = LogNotifier.send(&n).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
