use http::StatusCode;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Comment content is empty")]
    EmptyContent,

    #[error("Viewer is not logged in")]
    NotLoggedIn,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Target does not exist")]
    NotFound,

    #[error("Target is already liked")]
    AlreadyLiked,

    #[error("Another change to this target is still in flight")]
    InFlight,

    #[error("Network failure: {0}")]
    Network(String),
}

impl Error {
    /// Maps a response's HTTP code and envelope message to a typed error.
    /// Only the status code and the message are consulted, never the data
    /// payload.
    pub fn classify(code: StatusCode, message: &str) -> Error {
        match code {
            StatusCode::UNAUTHORIZED => Error::PermissionDenied,
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::BAD_REQUEST => {
                let msg = message.to_ascii_lowercase();
                if msg.contains("already liked") {
                    Error::AlreadyLiked
                } else if msg.contains("empty") {
                    Error::EmptyContent
                } else {
                    Error::Unknown(message.to_string())
                }
            }
            _ => Error::Unknown(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_distinguished_codes() {
        assert_eq!(
            Error::classify(StatusCode::UNAUTHORIZED, "login required"),
            Error::PermissionDenied,
        );
        assert_eq!(
            Error::classify(StatusCode::NOT_FOUND, "no such resume"),
            Error::NotFound,
        );
    }

    #[test]
    fn classify_already_liked_is_message_based() {
        assert_eq!(
            Error::classify(StatusCode::BAD_REQUEST, "Already liked this resume"),
            Error::AlreadyLiked,
        );
        // Same code, different message: not the distinguished case
        assert_eq!(
            Error::classify(StatusCode::BAD_REQUEST, "malformed id"),
            Error::Unknown("malformed id".to_string()),
        );
    }

    #[test]
    fn classify_falls_back_to_message() {
        assert_eq!(
            Error::classify(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Error::Unknown("boom".to_string()),
        );
    }
}
