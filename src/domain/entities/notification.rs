/*
Notification Entity

The central entity of the feed: one row per event a recipient should see,
plus the closed taxonomy of notification kinds. Each kind carries exactly
one message template, one link-resolution rule and one system/social flag,
merged into a single KindSpec so the three concerns cannot drift apart.
The registry is compile-time data; the exhaustive match in `spec()` keeps
it total over the enum.
*/

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Placeholder token substituted with the post title when a message
/// template is rendered. Resolved messages never contain it.
pub const POST_NAME_PLACEHOLDER: &str = "{{postName}}";

/// Closed taxonomy of notification kinds.
///
/// Social kinds are triggered by another user and carry an actor identity;
/// system kinds are generated by the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Reply,
    Comment,
    Like,
    Favorite,
    Follow,
    FollowingPost,
    FirstPost,
    Welcome,
    NoUsername,
    NoAvatar,
}

/// How a kind resolves to a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// `/posts/{post_id}`, no link when the post is gone.
    Post,
    /// `/posts/{post_id}?highlightedComment={comment_id}`; degrades to the
    /// plain post link when the comment is gone, to no link when the post is.
    PostCommentAnchor,
    /// `/users/{actor_id}` for social kinds, `/users/{recipient_id}` for
    /// self-referential system kinds.
    UserProfile,
    /// A constant route independent of the record.
    Fixed(&'static str),
    /// Never links anywhere.
    None,
}

/// The registered entry for one kind: message template, link rule and
/// partition flag, always created together.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub template: &'static str,
    pub link: LinkRule,
    pub social: bool,
}

impl NotificationKind {
    /// Every registered kind, in declaration order.
    pub const ALL: [NotificationKind; 10] = [
        NotificationKind::Reply,
        NotificationKind::Comment,
        NotificationKind::Like,
        NotificationKind::Favorite,
        NotificationKind::Follow,
        NotificationKind::FollowingPost,
        NotificationKind::FirstPost,
        NotificationKind::Welcome,
        NotificationKind::NoUsername,
        NotificationKind::NoAvatar,
    ];

    /// Canonical wire string for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Reply => "reply",
            NotificationKind::Comment => "comment",
            NotificationKind::Like => "like",
            NotificationKind::Favorite => "favorite",
            NotificationKind::Follow => "follow",
            NotificationKind::FollowingPost => "following-post",
            NotificationKind::FirstPost => "first-post",
            NotificationKind::Welcome => "welcome",
            NotificationKind::NoUsername => "no-username",
            NotificationKind::NoAvatar => "no-avatar",
        }
    }

    /// The merged registry entry for this kind. One exhaustive match keeps
    /// template, link rule and partition flag total across the taxonomy.
    pub const fn spec(self) -> KindSpec {
        match self {
            NotificationKind::Reply => KindSpec {
                template: "replied to your comment in {{postName}}",
                link: LinkRule::PostCommentAnchor,
                social: true,
            },
            NotificationKind::Comment => KindSpec {
                template: "commented on your post {{postName}}",
                link: LinkRule::PostCommentAnchor,
                social: true,
            },
            NotificationKind::Like => KindSpec {
                template: "liked your post {{postName}}",
                link: LinkRule::UserProfile,
                social: true,
            },
            NotificationKind::Favorite => KindSpec {
                template: "favorited your post {{postName}}",
                link: LinkRule::UserProfile,
                social: true,
            },
            NotificationKind::Follow => KindSpec {
                template: "just followed you",
                link: LinkRule::UserProfile,
                social: true,
            },
            NotificationKind::FollowingPost => KindSpec {
                template: "from your following just posted: {{postName}}",
                link: LinkRule::Post,
                social: true,
            },
            NotificationKind::FirstPost => KindSpec {
                template:
                    "Start by writing your first post! Share a link, create a poll, and more!",
                link: LinkRule::Fixed("/posts/new"),
                social: false,
            },
            NotificationKind::Welcome => KindSpec {
                template: "Welcome! We are very pleased to have you here!",
                link: LinkRule::None,
                social: false,
            },
            NotificationKind::NoUsername => KindSpec {
                template: "You have no username! Set one for yourself on your account page",
                link: LinkRule::UserProfile,
                social: false,
            },
            NotificationKind::NoAvatar => KindSpec {
                template: "You have no avatar! You can add one on your account page",
                link: LinkRule::UserProfile,
                social: false,
            },
        }
    }

    /// True iff the kind is triggered by another user's action.
    pub const fn is_social(self) -> bool {
        self.spec().social
    }
}

impl FromStr for NotificationKind {
    type Err = FeedError;

    /// Classify a raw kind string. Kinds are stored case-insensitively and
    /// normalized here; an unregistered string is a hard error rather than
    /// a silently dropped row.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "reply" => Ok(NotificationKind::Reply),
            "comment" => Ok(NotificationKind::Comment),
            "like" => Ok(NotificationKind::Like),
            "favorite" => Ok(NotificationKind::Favorite),
            "follow" => Ok(NotificationKind::Follow),
            "following-post" => Ok(NotificationKind::FollowingPost),
            "first-post" => Ok(NotificationKind::FirstPost),
            "welcome" => Ok(NotificationKind::Welcome),
            "no-username" => Ok(NotificationKind::NoUsername),
            "no-avatar" => Ok(NotificationKind::NoAvatar),
            _ => Err(FeedError::UnrecognizedKind(raw.to_string())),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub recipient_id: i64,
    /// Present iff the kind is social.
    pub actor_id: Option<i64>,
    /// May be null when the referenced post was removed.
    pub post_id: Option<i64>,
    /// May be null when the referenced comment was removed.
    pub comment_id: Option<i64>,
    /// Denormalized post title, empty when the post is gone.
    pub post_title: String,
}

/// Insert-shaped value used by external producers (and tests). `read`
/// always starts false; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub recipient_id: i64,
    pub actor_id: Option<i64>,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub post_title: String,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, recipient_id: i64) -> Self {
        Self {
            kind,
            created_at: Utc::now(),
            recipient_id,
            actor_id: None,
            post_id: None,
            comment_id: None,
            post_title: String::new(),
        }
    }
}
