use http::StatusCode;

use crate::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Uniform response envelope of the remote interaction service. Turned into
/// a tagged result at the transport boundary so everything downstream can
/// match exhaustively instead of comparing strings.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,

    #[serde(default)]
    pub message: String,

    // No serde(default) here: the derive would demand T: Default, and a
    // missing field already deserializes to None
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_result(self, code: StatusCode) -> Result<Option<T>, Error> {
        match self.status {
            EnvelopeStatus::Success if code.is_success() => Ok(self.data),
            _ => Err(Error::classify(code, &self.message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_with_data() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success","message":"ok","data":[1,2]}"#)
                .expect("parsing envelope");
        assert_eq!(env.status, EnvelopeStatus::Success);
        assert_eq!(env.into_result(StatusCode::OK), Ok(Some(vec![1, 2])));
    }

    #[test]
    fn parses_success_without_data_or_message() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success"}"#).expect("parsing envelope");
        assert_eq!(env.into_result(StatusCode::OK), Ok(None));
    }

    #[test]
    fn error_status_wins_even_on_2xx() {
        let env: Envelope<()> =
            serde_json::from_str(r#"{"status":"error","message":"boom"}"#).expect("parsing envelope");
        assert_eq!(
            env.into_result(StatusCode::OK),
            Err(Error::Unknown("boom".to_string())),
        );
    }

    #[test]
    fn success_envelope_on_error_code_is_an_error() {
        let env: Envelope<()> =
            serde_json::from_str(r#"{"status":"success","message":""}"#).expect("parsing envelope");
        assert_eq!(
            env.into_result(StatusCode::UNAUTHORIZED),
            Err(Error::PermissionDenied),
        );
    }
}
