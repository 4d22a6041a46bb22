use async_trait::async_trait;

use crate::{AuthToken, CommentFeed, CommentId, ContentRef, Error, TargetId};

/// Interface of the remote interaction service, as consumed by the client.
///
/// Implementations: `HttpRemote` in hireboard-client for the real REST
/// endpoints, `MockServer` in hireboard-mock-server for tests.
#[async_trait]
pub trait Remote {
    async fn fetch_comments(
        &self,
        auth: Option<AuthToken>,
        content: &ContentRef,
    ) -> Result<CommentFeed, Error>;

    async fn create_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        text: &str,
        parent: Option<CommentId>,
    ) -> Result<(), Error>;

    async fn edit_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
        text: &str,
    ) -> Result<(), Error>;

    async fn delete_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
    ) -> Result<(), Error>;

    async fn like(&self, auth: AuthToken, target: TargetId) -> Result<(), Error>;

    async fn unlike(&self, auth: AuthToken, target: TargetId) -> Result<(), Error>;
}
