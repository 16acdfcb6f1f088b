//! Fan-out delivery engine.
//!
//! One sequential pass over a registry snapshot. Per destination: rich
//! attempt when the snapshot carries an image, one synchronous text-only
//! fallback on rich failure, straight to text when there is no image.
//! A destination's failure is recorded and the batch continues.

use async_trait::async_trait;
use tracing::{info, warn};

use epiwatch_core::{ChatIdentity, Destination, ScheduleSnapshot};

use crate::error::TransportError;

/// Outbound delivery primitives, implemented by the chat transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        chat: &ChatIdentity,
        topic_id: Option<i64>,
        body: &str,
    ) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        chat: &ChatIdentity,
        topic_id: Option<i64>,
        image_url: &str,
        caption: &str,
    ) -> Result<(), TransportError>;
}

/// Outcome of delivery to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Rich delivery (or plain, when no image existed) succeeded.
    Sent,
    /// Rich delivery failed; the text-only fallback succeeded.
    SentDegraded,
    /// Both tiers failed.
    Failed(String),
}

/// Per-destination outcomes of one fan-out run.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub entries: Vec<(ChatIdentity, DeliveryOutcome)>,
}

impl DeliveryReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Sent))
    }

    pub fn degraded(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::SentDegraded))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Complete an image URL to an absolute, scheme-qualified form.
///
/// The source serves protocol-relative URLs (`//static.…`); anything not
/// already `https://` gets the secure scheme prepended.
pub fn normalize_image_url(url: &str) -> String {
    if url.starts_with("https://") {
        url.to_string()
    } else if url.starts_with("//") {
        format!("https:{url}")
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// Deliver `message` to every destination in `destinations`.
///
/// Destinations are contacted in the given order; the order carries no
/// meaning, but each destination is handled independently.
pub async fn deliver_all<T: Transport + ?Sized>(
    transport: &T,
    snapshot: &ScheduleSnapshot,
    message: &str,
    destinations: &[Destination],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for dest in destinations {
        let outcome = deliver_one(transport, snapshot, message, dest).await;
        report.entries.push((dest.chat.clone(), outcome));
    }

    info!(
        total = report.len(),
        sent = report.sent(),
        degraded = report.degraded(),
        failed = report.failed(),
        "delivery run complete"
    );
    report
}

/// Two-tier delivery to a single destination.
///
/// Also the `/update` path: the manual command targets exactly one
/// destination with the identical degrade logic.
pub async fn deliver_one<T: Transport + ?Sized>(
    transport: &T,
    snapshot: &ScheduleSnapshot,
    message: &str,
    dest: &Destination,
) -> DeliveryOutcome {
    if let Some(raw_url) = snapshot.featured_image_url.as_deref() {
        let image_url = normalize_image_url(raw_url);
        match transport
            .send_photo(&dest.chat, dest.topic_id, &image_url, message)
            .await
        {
            Ok(()) => {
                info!(chat = %dest.chat, topic = ?dest.topic_id, "digest sent with image");
                return DeliveryOutcome::Sent;
            }
            Err(e) => {
                warn!(chat = %dest.chat, error = %e, "image send failed, falling back to text");
            }
        }

        return match transport.send_text(&dest.chat, dest.topic_id, message).await {
            Ok(()) => {
                info!(chat = %dest.chat, topic = ?dest.topic_id, "digest sent as text fallback");
                DeliveryOutcome::SentDegraded
            }
            Err(e) => {
                warn!(chat = %dest.chat, error = %e, "text fallback failed");
                DeliveryOutcome::Failed(e.to_string())
            }
        };
    }

    match transport.send_text(&dest.chat, dest.topic_id, message).await {
        Ok(()) => {
            info!(chat = %dest.chat, topic = ?dest.topic_id, "digest sent as text");
            DeliveryOutcome::Sent
        }
        Err(e) => {
            warn!(chat = %dest.chat, error = %e, "text send failed");
            DeliveryOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use epiwatch_core::ShowEntry;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Photo(ChatIdentity, Option<i64>, String),
        Text(ChatIdentity, Option<i64>),
    }

    /// Scripted transport: photo sends fail for the listed chats.
    #[derive(Default)]
    struct MockTransport {
        photo_fails_for: Vec<ChatIdentity>,
        text_fails_for: Vec<ChatIdentity>,
        calls: Mutex<Vec<Call>>,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_text(
            &self,
            chat: &ChatIdentity,
            topic_id: Option<i64>,
            _body: &str,
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Text(chat.clone(), topic_id));
            if self.text_fails_for.contains(chat) {
                return Err(TransportError::Text("chat blocked".to_string()));
            }
            Ok(())
        }

        async fn send_photo(
            &self,
            chat: &ChatIdentity,
            topic_id: Option<i64>,
            image_url: &str,
            _caption: &str,
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Photo(chat.clone(), topic_id, image_url.to_string()));
            if self.photo_fails_for.contains(chat) {
                return Err(TransportError::Image("media rejected".to_string()));
            }
            Ok(())
        }
    }

    fn snapshot_with_image(url: &str) -> ScheduleSnapshot {
        ScheduleSnapshot {
            yesterday: vec![],
            today: vec![ShowEntry {
                title: "T".to_string(),
                time: "8 PM".to_string(),
                episode_label: String::new(),
            }],
            tomorrow: vec![],
            featured_image_url: Some(url.to_string()),
        }
    }

    fn dest(id: i64, topic: Option<i64>) -> Destination {
        Destination {
            chat: ChatIdentity::Int(id),
            topic_id: topic,
        }
    }

    #[test]
    fn protocol_relative_url_gets_https_scheme() {
        assert_eq!(
            normalize_image_url("//cdn.example/img.jpg"),
            "https://cdn.example/img.jpg"
        );
        assert_eq!(
            normalize_image_url("https://cdn.example/img.jpg"),
            "https://cdn.example/img.jpg"
        );
        assert_eq!(
            normalize_image_url("cdn.example/img.jpg"),
            "https://cdn.example/img.jpg"
        );
    }

    #[tokio::test]
    async fn one_photo_failure_degrades_only_that_destination() {
        let transport = MockTransport {
            photo_fails_for: vec![ChatIdentity::Int(2)],
            ..Default::default()
        };
        let snap = snapshot_with_image("//cdn.example/img.jpg");
        let dests = vec![dest(1, None), dest(2, Some(9)), dest(3, None)];

        let report = deliver_all(&transport, &snap, "body", &dests).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report.sent(), 2);
        assert_eq!(report.degraded(), 1);
        assert_eq!(report.failed(), 0);

        // The degraded destination received a text send on its own topic.
        let calls = transport.calls.lock().unwrap();
        assert!(calls.contains(&Call::Text(ChatIdentity::Int(2), Some(9))));
        // The others never needed the fallback.
        assert!(!calls.contains(&Call::Text(ChatIdentity::Int(1), None)));
        assert!(!calls.contains(&Call::Text(ChatIdentity::Int(3), None)));
    }

    #[tokio::test]
    async fn photo_primitive_receives_normalized_url() {
        let transport = MockTransport::default();
        let snap = snapshot_with_image("//cdn.example/img.jpg");

        deliver_one(&transport, &snap, "body", &dest(1, None)).await;

        let calls = transport.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            Call::Photo(
                ChatIdentity::Int(1),
                None,
                "https://cdn.example/img.jpg".to_string()
            )
        );
    }

    #[tokio::test]
    async fn no_image_goes_straight_to_text() {
        let transport = MockTransport::default();
        let mut snap = snapshot_with_image("//x");
        snap.featured_image_url = None;

        let outcome = deliver_one(&transport, &snap, "body", &dest(1, Some(4))).await;

        assert_eq!(outcome, DeliveryOutcome::Sent);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(*calls, vec![Call::Text(ChatIdentity::Int(1), Some(4))]);
    }

    #[tokio::test]
    async fn both_tiers_failing_never_aborts_the_batch() {
        let transport = MockTransport {
            photo_fails_for: vec![ChatIdentity::Int(1)],
            text_fails_for: vec![ChatIdentity::Int(1)],
            ..Default::default()
        };
        let snap = snapshot_with_image("//cdn.example/img.jpg");
        let dests = vec![dest(1, None), dest(2, None)];

        let report = deliver_all(&transport, &snap, "body", &dests).await;

        assert_eq!(report.len(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.sent(), 1);
        assert!(matches!(
            report.entries[0].1,
            DeliveryOutcome::Failed(ref reason) if reason.contains("chat blocked")
        ));
    }

    #[tokio::test]
    async fn empty_destination_list_yields_empty_report() {
        let transport = MockTransport::default();
        let snap = snapshot_with_image("//x");
        let report = deliver_all(&transport, &snap, "body", &[]).await;
        assert!(report.is_empty());
    }
}
