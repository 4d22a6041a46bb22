use crate::{CommentId, ContentId, Time, UserId};

/// Comment author, denormalized at read time by the server.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,

    /// Content item this comment belongs to
    pub content_id: ContentId,

    /// Absent for root comments. Parent and author are immutable after
    /// creation; only `text` and `updated_at` change on edit.
    pub parent_id: Option<CommentId>,

    pub author: Author,
    pub text: String,

    pub created_at: Time,
    pub updated_at: Time,
}

/// Wire shape of a pre-nested comment, as served for lecture content.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NestedComment {
    #[serde(flatten)]
    pub comment: Comment,

    #[serde(default)]
    pub replies: Vec<NestedComment>,
}

/// What a comments fetch yields, depending on the content kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommentFeed {
    Flat(Vec<Comment>),
    Nested(Vec<NestedComment>),
}
