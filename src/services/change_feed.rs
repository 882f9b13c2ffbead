// src/services/change_feed.rs
use actix_web::web::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt};
use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::models::provider::ProviderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

/// One row-level write made through this service.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub table: &'static str,
    pub event: ChangeKind,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProviderStatus>,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(table: &'static str, event: ChangeKind, id: impl ToString) -> Self {
        Self { table, event, id: id.to_string(), status: None, at: Utc::now() }
    }

    pub fn with_status(mut self, status: ProviderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Server-Sent Events frame.
    pub fn to_sse(&self) -> Bytes {
        let data = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        Bytes::from(format!("event: {}\ndata: {}\n\n", self.event.as_str(), data))
    }
}

/// Fan-out of write notifications to connected listeners.
///
/// Delivery is best effort: a listener that falls behind the channel capacity skips ahead.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // no listeners is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// SSE byte stream of events, optionally limited to one table.
    /// The subscription ends when the stream is dropped.
    pub fn sse_stream(
        &self,
        table: Option<String>,
    ) -> impl Stream<Item = Result<Bytes, actix_web::Error>> + 'static {
        let rx = self.subscribe();
        let hello = stream::once(async { Ok::<_, actix_web::Error>(Bytes::from_static(b": connected\n\n")) });

        let events = stream::unfold((rx, table), |(mut rx, table)| async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        if table.as_deref().is_some_and(|t| t != ev.table) {
                            continue;
                        }
                        let frame = ev.to_sse();
                        return Some((Ok(frame), (rx, table)));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("change listener lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        hello.chain(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();
        feed.publish(ChangeEvent::new("service_providers", ChangeKind::Update, "abc").with_status(ProviderStatus::Approved));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.id, "abc");
        assert_eq!(ev.status, Some(ProviderStatus::Approved));
    }

    #[tokio::test]
    async fn sse_stream_filters_by_table() {
        let feed = ChangeFeed::new(8);
        let mut s = Box::pin(feed.sse_stream(Some("service_categories".to_string())));

        let hello = s.next().await.unwrap().unwrap();
        assert_eq!(&hello[..], b": connected\n\n");

        feed.publish(ChangeEvent::new("service_providers", ChangeKind::Insert, "p1"));
        feed.publish(ChangeEvent::new("service_categories", ChangeKind::Delete, "c1"));

        let frame = s.next().await.unwrap().unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("event: delete\n"));
        assert!(text.contains("\"id\":\"c1\""));
    }

    #[test]
    fn publishing_without_listeners_is_harmless() {
        let feed = ChangeFeed::new(1);
        feed.publish(ChangeEvent::new("reviews", ChangeKind::Insert, 1));
        assert_eq!(feed.tx.receiver_count(), 0);
    }
}
