use std::collections::HashMap;

use crate::{
    api::{CommentId, TargetId, Time},
    CommentThread,
};

/// Local cache of the interaction state for one content view: the comment
/// threads, plus the viewer's like flags for whatever targets are on screen.
///
/// After `load_comments` this is the sole source of truth for rendering;
/// no other component re-derives comment state. All operations are
/// synchronous, so nothing can observe a half-applied change.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InteractionDb {
    comments: Vec<CommentThread>,
    likes: HashMap<TargetId, bool>,
}

impl InteractionDb {
    pub fn new() -> InteractionDb {
        InteractionDb::default()
    }

    /// Full replacement of the cached comment tree, used after every fetch
    /// and after every successful comment mutation.
    pub fn load_comments(&mut self, threads: Vec<CommentThread>) {
        self.comments = threads;
    }

    pub fn comments(&self) -> &[CommentThread] {
        &self.comments
    }

    /// Replaces a comment's text and updated timestamp in place, wherever it
    /// sits in the tree. Purely local; usable for optimistic display even
    /// though the reference comment flow reloads instead.
    pub fn apply_local_edit(&mut self, id: CommentId, text: &str, edited_at: Time) -> bool {
        for t in &mut self.comments {
            if t.root.id == id {
                t.root.text = text.to_owned();
                t.root.updated_at = edited_at;
                return true;
            }
            for r in &mut t.replies {
                if r.id == id {
                    r.text = text.to_owned();
                    r.updated_at = edited_at;
                    return true;
                }
            }
        }
        false
    }

    /// Removes a comment from wherever it appears. Removing a root discards
    /// its replies with it, matching the backend's cascading delete.
    pub fn remove_comment(&mut self, id: CommentId) -> bool {
        if let Some(i) = self.comments.iter().position(|t| t.root.id == id) {
            self.comments.remove(i);
            return true;
        }
        for t in &mut self.comments {
            if let Some(i) = t.replies.iter().position(|r| r.id == id) {
                t.replies.remove(i);
                return true;
            }
        }
        false
    }

    /// Seeds like flags from the server-provided snapshot that came with the
    /// containing list. Full replacement, like `load_comments`: flags for
    /// targets no longer rendered do not linger across list loads.
    pub fn load_likes(&mut self, snapshot: impl IntoIterator<Item = (TargetId, bool)>) {
        self.likes = snapshot.into_iter().collect();
    }

    /// Targets without an entry read as not liked.
    pub fn liked(&self, target: TargetId) -> bool {
        self.likes.get(&target).copied().unwrap_or(false)
    }

    pub fn set_liked(&mut self, target: TargetId, value: bool) {
        self.likes.insert(target, value);
    }

    /// Reads then flips in one call, returning the new value, so callers
    /// never flip based on a stale copy of the flag.
    pub fn toggle_liked(&mut self, target: TargetId) -> bool {
        let now = !self.liked(target);
        self.likes.insert(target, now);
        now
    }
}
