/*
Notification Feed Service

Application service over the NotificationStore port: paginated retrieval
with a forward-only cursor, unread counting, and the false-to-read state
transition. All operations are request-scoped; the only shared state is
the compile-time taxonomy.

Pagination uses over-fetch-then-trim: request one row beyond the page
size, and if it comes back, pop it and surface its id as the next cursor.
The two halves are named procedures (`fetch_bounded_plus_one`,
`trim_overfetch`) so the off-by-one contract stays auditable.
*/

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use serde::Serialize;

use crate::application::storage::notification_store::{NotificationStore, PageQuery};
use crate::domain::entities::notification::Notification;
use crate::domain::services::resolver::{enrich, EnrichedNotification};
use crate::error::FeedError;

/// Authenticated identity for one request. The recipient id is mandatory:
/// a request without one is rejected at the boundary and never reaches
/// the store as an undefined filter value.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub recipient_id: i64,
}

impl RequestContext {
    pub fn new(recipient_id: i64) -> Self {
        Self { recipient_id }
    }
}

/// Parameters for one feed page.
#[derive(Debug, Clone, Default)]
pub struct GetAllInput {
    pub limit: i64,
    pub skip: Option<i64>,
    pub cursor: Option<i64>,
    pub read: Option<bool>,
}

/// One enriched feed page. `next_cursor` is absent at the end of the feed.
#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub list: Vec<EnrichedNotification>,
    pub next_cursor: Option<i64>,
}

pub struct NotificationFeedService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationFeedService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Fetch one page of the recipient's feed, newest first.
    ///
    /// `limit = 0` still requests a single row; if the feed is non-empty
    /// that row becomes the next cursor over an empty item list.
    pub async fn get_all(
        &self,
        ctx: &RequestContext,
        input: GetAllInput,
    ) -> Result<FeedPage, FeedError> {
        if input.limit < 0 {
            return Err(FeedError::Validation("limit must not be negative".into()));
        }
        if input.skip.is_some_and(|skip| skip < 0) {
            return Err(FeedError::Validation("skip must not be negative".into()));
        }

        let rows = self.fetch_bounded_plus_one(ctx.recipient_id, &input).await?;
        let (rows, next_cursor) = trim_overfetch(rows, input.limit as usize);

        debug!(
            "feed page for recipient {}: {} item(s), next_cursor={:?}",
            ctx.recipient_id,
            rows.len(),
            next_cursor
        );

        let now = Utc::now();
        Ok(FeedPage {
            list: rows.iter().map(|n| enrich(n, now)).collect(),
            next_cursor,
        })
    }

    /// Count the recipient's unread notifications.
    pub async fn count_unread(&self, ctx: &RequestContext) -> Result<u64, FeedError> {
        self.store.count_unread(ctx.recipient_id).await
    }

    /// Flip a notification to read and return the enriched record.
    ///
    /// Idempotent: marking an already-read notification succeeds with no
    /// observable change. Ownership is the caller's obligation; the
    /// transition itself does not match `notification_id` against the
    /// context identity.
    pub async fn mark_as_read(
        &self,
        _ctx: &RequestContext,
        notification_id: i64,
    ) -> Result<EnrichedNotification, FeedError> {
        let updated = self.store.mark_read(notification_id).await?;
        Ok(enrich(&updated, Utc::now()))
    }

    /// Request `limit + 1` rows so the presence of a following page is
    /// observable without a second query.
    async fn fetch_bounded_plus_one(
        &self,
        recipient_id: i64,
        input: &GetAllInput,
    ) -> Result<Vec<Notification>, FeedError> {
        // The over-fetch row must not wrap the limit around.
        let take = input
            .limit
            .checked_add(1)
            .ok_or_else(|| FeedError::Validation("limit is too large".into()))?;

        let query = PageQuery {
            take,
            skip: input.skip.unwrap_or(0),
            cursor: input.cursor,
            read: input.read,
        };
        self.store.fetch_page(recipient_id, query).await
    }
}

/// Trim the over-fetched row and derive the next cursor from it.
///
/// The store returned at most `limit + 1` rows; if the extra row is
/// present, it is popped off and its id marks where the next page starts.
fn trim_overfetch(mut rows: Vec<Notification>, limit: usize) -> (Vec<Notification>, Option<i64>) {
    if rows.len() > limit {
        let next_cursor = rows.pop().map(|extra| extra.id);
        (rows, next_cursor)
    } else {
        (rows, None)
    }
}
