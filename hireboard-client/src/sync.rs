use parking_lot::Mutex;

use crate::{
    api::{AuthToken, CommentFeed, CommentId, ContentRef, Error, Remote, Session, TargetId},
    build_threads, flatten_nested, CommentThread, InFlight, InteractionDb,
};

/// How a like toggle settled. Every failure mode is a variant: toggling
/// never panics and never leaves an error to bubble past the coordinator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ToggleOutcome {
    /// The optimistic flip was confirmed by the server.
    Applied { liked: bool },

    /// The server reported the target already liked while the local flag
    /// said not liked. The flag was forced to liked instead of rolled back;
    /// rolling back would contradict what the server just asserted.
    Reconciled { liked: bool },

    /// A mutation for this target is still in flight. Nothing was sent and
    /// nothing changed.
    Busy,

    /// The target no longer exists. Rolled back and logged, nothing more.
    Gone,

    /// No session, or the server answered 401. Rolled back; the viewer
    /// should be sent to the login entry point.
    LoginRequired,

    /// Any other failure. Rolled back, message fit for display.
    Failed(String),
}

/// Runs each logical write (comment create/edit/delete, like toggle) against
/// the remote service, keeping the local `InteractionDb` consistent: comments
/// reload fully after each successful write, likes flip optimistically and
/// roll back on failure.
///
/// One coordinator is scoped to one content view and owns its cache, so a
/// response arriving after the view (and with it the coordinator) is gone
/// has nothing left to touch.
pub struct Coordinator<R> {
    remote: R,
    content: ContentRef,
    session: Option<Session>,
    db: Mutex<InteractionDb>,
    in_flight: InFlight,
}

impl<R: Remote> Coordinator<R> {
    pub fn new(remote: R, content: ContentRef, session: Option<Session>) -> Coordinator<R> {
        Coordinator {
            remote,
            content,
            session,
            db: Mutex::new(InteractionDb::new()),
            in_flight: InFlight::new(),
        }
    }

    pub fn comments(&self) -> Vec<CommentThread> {
        self.db.lock().comments().to_vec()
    }

    pub fn liked(&self, target: TargetId) -> bool {
        self.db.lock().liked(target)
    }

    /// Seeds like flags from the snapshot that came with the containing list.
    pub fn load_like_snapshot(&self, snapshot: impl IntoIterator<Item = (TargetId, bool)>) {
        self.db.lock().load_likes(snapshot);
    }

    fn token(&self) -> Result<AuthToken, Error> {
        self.session.as_ref().map(|s| s.token).ok_or(Error::NotLoggedIn)
    }

    /// Fetches the comment feed for this content and replaces the cached
    /// threads with it. Forum feeds come back flat and get rebuilt into
    /// threads; lecture feeds come back pre-nested and pass through.
    pub async fn refresh_comments(&self) -> Result<(), Error> {
        let auth = self.session.as_ref().map(|s| s.token);
        let feed = self.remote.fetch_comments(auth, &self.content).await?;
        let threads = match feed {
            CommentFeed::Flat(flat) => build_threads(flat),
            CommentFeed::Nested(nested) => flatten_nested(nested),
        };
        self.db.lock().load_comments(threads);
        Ok(())
    }

    /// Comments are multi-writer, so no optimistic insert: the cache is
    /// untouched until the server confirms, then the whole tree reloads.
    /// One extra round trip, in exchange for never diverging from truth.
    pub async fn add_comment(&self, text: &str, parent: Option<CommentId>) -> Result<(), Error> {
        let text = non_empty(text)?;
        let auth = self.token()?;
        let _pending = self
            .in_flight
            .try_begin(self.content.id.0)
            .ok_or(Error::InFlight)?;
        self.remote
            .create_comment(auth, &self.content, text, parent)
            .await?;
        self.refresh_comments().await
    }

    pub async fn edit_comment(&self, comment: CommentId, text: &str) -> Result<(), Error> {
        let text = non_empty(text)?;
        let auth = self.token()?;
        let _pending = self.in_flight.try_begin(comment.0).ok_or(Error::InFlight)?;
        self.remote
            .edit_comment(auth, &self.content, comment, text)
            .await?;
        self.refresh_comments().await
    }

    pub async fn delete_comment(&self, comment: CommentId) -> Result<(), Error> {
        let auth = self.token()?;
        let _pending = self.in_flight.try_begin(comment.0).ok_or(Error::InFlight)?;
        self.remote
            .delete_comment(auth, &self.content, comment)
            .await?;
        self.refresh_comments().await
    }

    /// Likes are single-writer from this viewer's perspective, so the flag
    /// flips before the request resolves and rolls back if the server
    /// disagrees. The in-flight token drops on every path out of here,
    /// releasing the target whichever way the request settles.
    pub async fn toggle_like(&self, target: TargetId) -> ToggleOutcome {
        let session = match &self.session {
            Some(s) => *s,
            None => return ToggleOutcome::LoginRequired,
        };
        let _pending = match self.in_flight.try_begin(target.0) {
            Some(token) => token,
            None => return ToggleOutcome::Busy,
        };

        let liked = self.db.lock().toggle_liked(target);
        let res = if liked {
            self.remote.like(session.token, target).await
        } else {
            self.remote.unlike(session.token, target).await
        };

        match res {
            Ok(()) => ToggleOutcome::Applied { liked },
            Err(Error::AlreadyLiked) => {
                // Benign race, often this very request fired twice: the like
                // exists server-side, so "liked" is the truth to converge on.
                self.db.lock().set_liked(target, true);
                ToggleOutcome::Reconciled { liked: true }
            }
            Err(Error::PermissionDenied) => {
                self.db.lock().set_liked(target, !liked);
                ToggleOutcome::LoginRequired
            }
            Err(Error::NotFound) => {
                self.db.lock().set_liked(target, !liked);
                tracing::warn!(?target, "toggled a like on a target that no longer exists");
                ToggleOutcome::Gone
            }
            Err(e) => {
                self.db.lock().set_liked(target, !liked);
                ToggleOutcome::Failed(e.to_string())
            }
        }
    }
}

fn non_empty(text: &str) -> Result<&str, Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(Error::EmptyContent)
    } else {
        Ok(trimmed)
    }
}
