/*
Message & Link Resolver

Builds the display message and navigation target for a single notification
from its KindSpec. Resolution is infallible over valid notifications:
missing optional relations (a deleted post or comment) degrade the link to
a weaker one or to no link at all, never to an error.
*/

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::notification::{
    LinkRule, Notification, NotificationKind, POST_NAME_PLACEHOLDER,
};
use crate::domain::services::timestamp::format_created_at;

/// The display-facing parts derived from one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub message: String,
    pub href: Option<String>,
    pub is_system: bool,
}

/// A stored notification plus everything the caller needs to render it.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedNotification {
    pub id: i64,
    pub kind: NotificationKind,
    pub read: bool,
    pub recipient_id: i64,
    pub actor_id: Option<i64>,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub post_title: String,
    pub message: String,
    pub href: Option<String>,
    pub is_system: bool,
    /// Smart-formatted display timestamp, not the raw instant.
    pub created_at: String,
}

/// Resolve the message, link target and partition flag for a notification.
pub fn resolve(notification: &Notification) -> Resolution {
    let spec = notification.kind.spec();

    let message = spec
        .template
        .replace(POST_NAME_PLACEHOLDER, &notification.post_title);

    let href = match spec.link {
        LinkRule::Post => notification.post_id.map(|post| format!("/posts/{post}")),
        LinkRule::PostCommentAnchor => match (notification.post_id, notification.comment_id) {
            (Some(post), Some(comment)) => {
                Some(format!("/posts/{post}?highlightedComment={comment}"))
            }
            // Comment gone: fall back to the post itself.
            (Some(post), None) => Some(format!("/posts/{post}")),
            (None, _) => None,
        },
        LinkRule::UserProfile => {
            // Social kinds point at the acting user, self-referential
            // system kinds at the recipient's own profile.
            let target = if spec.social {
                notification.actor_id
            } else {
                Some(notification.recipient_id)
            };
            target.map(|user| format!("/users/{user}"))
        }
        LinkRule::Fixed(route) => Some(route.to_string()),
        LinkRule::None => None,
    };

    Resolution {
        message,
        href,
        is_system: !spec.social,
    }
}

/// Combine a stored row with its resolution and display timestamp.
pub fn enrich(notification: &Notification, now: DateTime<Utc>) -> EnrichedNotification {
    let resolution = resolve(notification);

    EnrichedNotification {
        id: notification.id,
        kind: notification.kind,
        read: notification.read,
        recipient_id: notification.recipient_id,
        actor_id: notification.actor_id,
        post_id: notification.post_id,
        comment_id: notification.comment_id,
        post_title: notification.post_title.clone(),
        message: resolution.message,
        href: resolution.href,
        is_system: resolution.is_system,
        created_at: format_created_at(notification.created_at, now, true),
    }
}
