/*
Notification Store Port

Contract for notification persistence. Infrastructure adapters implement
this trait; the feed service depends only on it. The page and count
operations share the same recipient/read filter shape so the paginator and
the unread aggregator can never structurally diverge.
*/

use async_trait::async_trait;

use crate::domain::entities::notification::{NewNotification, Notification};
use crate::error::FeedError;

/// One bounded page request against the store.
///
/// `take` is the exact number of rows to request; the feed service has
/// already added the over-fetch row when it builds this value. `cursor`
/// anchors the keyset position at an already-observed row (inclusive);
/// `skip` is a positional offset applied after the anchor, which is not
/// keyset-stable under concurrent insertion ahead of the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub take: i64,
    pub skip: i64,
    pub cursor: Option<i64>,
    pub read: Option<bool>,
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Fetch up to `query.take` rows for a recipient, ordered by
    /// `(created_at DESC, id DESC)`.
    async fn fetch_page(
        &self,
        recipient_id: i64,
        query: PageQuery,
    ) -> Result<Vec<Notification>, FeedError>;

    /// Count unread rows for a recipient, using the same filter shape as
    /// `fetch_page` with `read = Some(false)`.
    async fn count_unread(&self, recipient_id: i64) -> Result<u64, FeedError>;

    /// Flip a row to read and return it. Idempotent; the row keeps
    /// `read = true` on repeated calls.
    async fn mark_read(&self, notification_id: i64) -> Result<Notification, FeedError>;

    /// Insert a new row. Creation belongs to external producers; this
    /// exists for them and for tests.
    async fn create(&self, new: NewNotification) -> Result<Notification, FeedError>;
}
