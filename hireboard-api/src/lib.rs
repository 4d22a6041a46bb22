mod comment;
mod envelope;
mod error;
mod remote;

pub use comment::{Author, Comment, CommentFeed, NestedComment};
pub use envelope::{Envelope, EnvelopeStatus};
pub use error::Error;
pub use remote::Remote;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<chrono::Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// Id of a commentable content item (a forum post or a lecture).
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ContentId(pub Uuid);

impl ContentId {
    pub fn stub() -> ContentId {
        ContentId(STUB_UUID)
    }
}

/// Id of a likable entity (resume, job posting, transfer, ...).
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn stub() -> TargetId {
        TargetId(STUB_UUID)
    }
}

/// Comment feeds for forums come back flat and need tree reconstruction;
/// lecture feeds come back already nested.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ContentKind {
    Forum,
    Lecture,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: ContentId,
}

impl ContentRef {
    pub fn forum(id: ContentId) -> ContentRef {
        ContentRef {
            kind: ContentKind::Forum,
            id,
        }
    }

    pub fn lecture(id: ContentId) -> ContentRef {
        ContentRef {
            kind: ContentKind::Lecture,
            id,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);

impl AuthToken {
    pub fn stub() -> AuthToken {
        AuthToken(STUB_UUID)
    }
}

/// The signed-in viewer, as established by the session layer. Determining
/// the session is out of scope here; it arrives as an input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub viewer: UserId,
    pub token: AuthToken,
}
