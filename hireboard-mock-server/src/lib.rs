use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;

use hireboard_api::{
    Author, AuthToken, Comment, CommentFeed, CommentId, ContentId, ContentKind, ContentRef, Error,
    NestedComment, Remote, TargetId, UserId, Uuid,
};

/// In-memory stand-in for the remote interaction service. Cheap to clone;
/// clones share state, so a test can hand one to a coordinator and keep
/// another for seeding and inspection.
#[derive(Clone)]
pub struct MockServer {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, MockUser>,
    sessions: HashMap<AuthToken, UserId>,
    contents: HashMap<ContentId, MockContent>,
    likes: HashMap<UserId, HashSet<TargetId>>,
    targets: HashSet<TargetId>,
    requests: u32,
    fail_next: Option<Error>,
    hold_next: Option<Arc<Notify>>,
}

struct MockUser {
    name: String,
}

struct MockContent {
    kind: ContentKind,
    // creation order, flat; nesting is reconstructed at serve time
    comments: Vec<Comment>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn add_user(&self, name: &str) -> UserId {
        let id = UserId(Uuid::new_v4());
        self.inner.lock().users.insert(
            id,
            MockUser {
                name: name.to_owned(),
            },
        );
        id
    }

    pub fn login(&self, user: UserId) -> AuthToken {
        let token = AuthToken(Uuid::new_v4());
        self.inner.lock().sessions.insert(token, user);
        token
    }

    pub fn add_content(&self, kind: ContentKind) -> ContentRef {
        let id = ContentId(Uuid::new_v4());
        self.inner.lock().contents.insert(
            id,
            MockContent {
                kind,
                comments: Vec::new(),
            },
        );
        ContentRef { kind, id }
    }

    pub fn add_target(&self) -> TargetId {
        let id = TargetId(Uuid::new_v4());
        self.inner.lock().targets.insert(id);
        id
    }

    /// Registers a like server-side without going through the protocol, to
    /// set up already-liked races.
    pub fn seed_like(&self, user: UserId, target: TargetId) {
        self.inner.lock().likes.entry(user).or_default().insert(target);
    }

    /// Number of requests that reached the server so far.
    pub fn request_count(&self) -> u32 {
        self.inner.lock().requests
    }

    /// Makes the next request fail with `error` after it is counted.
    pub fn fail_next(&self, error: Error) {
        self.inner.lock().fail_next = Some(error);
    }

    /// Parks the next request until the returned handle is notified, keeping
    /// it in flight for as long as the test needs.
    pub fn hold_next(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().hold_next = Some(gate.clone());
        gate
    }

    /// Counts the request, honors the gate and the injected failure. The
    /// lock is released before parking on the gate.
    async fn begin(&self) -> Result<(), Error> {
        let (gate, fail) = {
            let mut inner = self.inner.lock();
            inner.requests += 1;
            (inner.hold_next.take(), inner.fail_next.take())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match fail {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

impl Inner {
    fn resolve(&self, auth: AuthToken) -> Result<UserId, Error> {
        self.sessions.get(&auth).copied().ok_or(Error::PermissionDenied)
    }

    fn content_mut(&mut self, content: &ContentRef) -> Result<&mut MockContent, Error> {
        self.contents.get_mut(&content.id).ok_or(Error::NotFound)
    }
}

fn nest(flat: &[Comment], parent: Option<CommentId>) -> Vec<NestedComment> {
    flat.iter()
        .filter(|c| c.parent_id == parent)
        .map(|c| NestedComment {
            comment: c.clone(),
            replies: nest(flat, Some(c.id)),
        })
        .collect()
}

#[async_trait]
impl Remote for MockServer {
    async fn fetch_comments(
        &self,
        _auth: Option<AuthToken>,
        content: &ContentRef,
    ) -> Result<CommentFeed, Error> {
        self.begin().await?;
        let inner = self.inner.lock();
        let stored = inner.contents.get(&content.id).ok_or(Error::NotFound)?;
        Ok(match stored.kind {
            ContentKind::Forum => CommentFeed::Flat(stored.comments.clone()),
            ContentKind::Lecture => CommentFeed::Nested(nest(&stored.comments, None)),
        })
    }

    async fn create_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        text: &str,
        parent: Option<CommentId>,
    ) -> Result<(), Error> {
        self.begin().await?;
        if text.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        let mut inner = self.inner.lock();
        let user = inner.resolve(auth)?;
        let author = Author {
            id: user,
            name: inner.users.get(&user).ok_or(Error::PermissionDenied)?.name.clone(),
            avatar: None,
        };
        let stored = inner.content_mut(content)?;
        if let Some(parent) = parent {
            if !stored.comments.iter().any(|c| c.id == parent) {
                return Err(Error::NotFound);
            }
        }
        let now = Utc::now();
        stored.comments.push(Comment {
            id: CommentId(Uuid::new_v4()),
            content_id: content.id,
            parent_id: parent,
            author,
            text: text.to_owned(),
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn edit_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
        text: &str,
    ) -> Result<(), Error> {
        self.begin().await?;
        if text.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        let mut inner = self.inner.lock();
        let user = inner.resolve(auth)?;
        let stored = inner.content_mut(content)?;
        let c = stored
            .comments
            .iter_mut()
            .find(|c| c.id == comment)
            .ok_or(Error::NotFound)?;
        if c.author.id != user {
            return Err(Error::PermissionDenied);
        }
        c.text = text.to_owned();
        c.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
    ) -> Result<(), Error> {
        self.begin().await?;
        let mut inner = self.inner.lock();
        let user = inner.resolve(auth)?;
        let stored = inner.content_mut(content)?;
        let existing = stored
            .comments
            .iter()
            .find(|c| c.id == comment)
            .ok_or(Error::NotFound)?;
        if existing.author.id != user {
            return Err(Error::PermissionDenied);
        }
        // Cascade to all descendants
        let mut doomed = HashSet::new();
        doomed.insert(comment);
        loop {
            let before = doomed.len();
            for c in &stored.comments {
                if let Some(p) = c.parent_id {
                    if doomed.contains(&p) {
                        doomed.insert(c.id);
                    }
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        stored.comments.retain(|c| !doomed.contains(&c.id));
        Ok(())
    }

    async fn like(&self, auth: AuthToken, target: TargetId) -> Result<(), Error> {
        self.begin().await?;
        let mut inner = self.inner.lock();
        let user = inner.resolve(auth)?;
        if !inner.targets.contains(&target) {
            return Err(Error::NotFound);
        }
        let likes = inner.likes.entry(user).or_default();
        if !likes.insert(target) {
            return Err(Error::AlreadyLiked);
        }
        Ok(())
    }

    async fn unlike(&self, auth: AuthToken, target: TargetId) -> Result<(), Error> {
        self.begin().await?;
        let mut inner = self.inner.lock();
        let user = inner.resolve(auth)?;
        if !inner.targets.contains(&target) {
            return Err(Error::NotFound);
        }
        inner.likes.entry(user).or_default().remove(&target);
        Ok(())
    }
}
