use async_trait::async_trait;

use crate::api::{
    AuthToken, Comment, CommentFeed, CommentId, ContentKind, ContentRef, Envelope, Error,
    NestedComment, Remote, TargetId,
};

/// `Remote` implementation over the platform's REST endpoints. Thin by
/// design: build the request, parse the envelope, classify the rest.
pub struct HttpRemote {
    host: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(host: impl Into<String>) -> HttpRemote {
        HttpRemote {
            host: host.into(),
            client: reqwest::Client::new(),
        }
    }

    fn comments_url(&self, content: &ContentRef) -> String {
        let scope = match content.kind {
            ContentKind::Forum => "forums",
            ContentKind::Lecture => "lectures",
        };
        format!("{}/api/{}/{}/comments", self.host, scope, content.id.0)
    }

    fn comment_url(&self, content: &ContentRef, comment: CommentId) -> String {
        format!("{}/{}", self.comments_url(content), comment.0)
    }

    fn like_url(&self, target: TargetId) -> String {
        format!("{}/api/likes/{}", self.host, target.0)
    }

    async fn finish<T>(resp: reqwest::Response) -> Result<Option<T>, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let code = resp.status();
        let body = resp.bytes().await.map_err(net)?;
        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) => envelope.into_result(code),
            // Proxies and load balancers answer without the envelope; the
            // status code still tells us what happened
            Err(_) if !code.is_success() => Err(Error::classify(code, "")),
            Err(e) => Err(Error::Network(format!("invalid response body: {e}"))),
        }
    }
}

fn net(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

#[async_trait]
impl Remote for HttpRemote {
    async fn fetch_comments(
        &self,
        auth: Option<AuthToken>,
        content: &ContentRef,
    ) -> Result<CommentFeed, Error> {
        let mut req = self.client.get(self.comments_url(content));
        if let Some(token) = auth {
            req = req.bearer_auth(token.0);
        }
        let resp = req.send().await.map_err(net)?;
        match content.kind {
            ContentKind::Forum => {
                let data = Self::finish::<Vec<Comment>>(resp).await?;
                Ok(CommentFeed::Flat(data.unwrap_or_default()))
            }
            ContentKind::Lecture => {
                let data = Self::finish::<Vec<NestedComment>>(resp).await?;
                Ok(CommentFeed::Nested(data.unwrap_or_default()))
            }
        }
    }

    async fn create_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        text: &str,
        parent: Option<CommentId>,
    ) -> Result<(), Error> {
        let body = serde_json::json!({
            "content": text,
            "parentId": parent.map(|p| p.0),
        });
        let resp = self
            .client
            .post(self.comments_url(content))
            .bearer_auth(auth.0)
            .json(&body)
            .send()
            .await
            .map_err(net)?;
        Self::finish::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn edit_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
        text: &str,
    ) -> Result<(), Error> {
        let body = serde_json::json!({ "content": text });
        let resp = self
            .client
            .put(self.comment_url(content, comment))
            .bearer_auth(auth.0)
            .json(&body)
            .send()
            .await
            .map_err(net)?;
        Self::finish::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn delete_comment(
        &self,
        auth: AuthToken,
        content: &ContentRef,
        comment: CommentId,
    ) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.comment_url(content, comment))
            .bearer_auth(auth.0)
            .send()
            .await
            .map_err(net)?;
        Self::finish::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn like(&self, auth: AuthToken, target: TargetId) -> Result<(), Error> {
        let resp = self
            .client
            .post(self.like_url(target))
            .bearer_auth(auth.0)
            .send()
            .await
            .map_err(net)?;
        Self::finish::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn unlike(&self, auth: AuthToken, target: TargetId) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.like_url(target))
            .bearer_auth(auth.0)
            .send()
            .await
            .map_err(net)?;
        Self::finish::<serde_json::Value>(resp).await.map(|_| ())
    }
}
