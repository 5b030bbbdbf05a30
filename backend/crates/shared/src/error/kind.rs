//! Error Kind - Classification of errors
//!
//! [`ErrorKind`] is the closed set of outcomes the API reports. Each kind
//! owns its HTTP status, its reason phrase and the `type` URI placed in
//! problem documents.

use serde::Serialize;

/// Error classification mapped onto HTTP statuses.
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Conflict;
/// assert_eq!(kind.status_code(), 409);
/// assert_eq!(kind.as_str(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Request failed the validation gate
    BadRequest,
    /// Path id does not resolve to a record
    NotFound,
    /// Unique value already taken
    Conflict,
    /// Body exceeded the gate's read limit
    PayloadTooLarge,
    /// Well-formed input that breaks a domain invariant
    UnprocessableEntity,
    InternalServerError,
    /// Persistence client could not serve the request
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Standard reason phrase, used as the problem `title`.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::PayloadTooLarge => "Payload Too Large",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Problem `type` URI for this kind.
    pub fn problem_type(&self) -> String {
        format!("https://httpstatuses.io/{}", self.status_code())
    }

    /// 5xx kinds are logged server-side when rendered.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorKind; 7] = [
        ErrorKind::BadRequest,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::PayloadTooLarge,
        ErrorKind::UnprocessableEntity,
        ErrorKind::InternalServerError,
        ErrorKind::ServiceUnavailable,
    ];

    #[test]
    fn statuses_match_reason_phrases() {
        for kind in ALL {
            let phrase = reason_phrase(kind.status_code());
            assert_eq!(kind.as_str(), phrase, "{kind:?}");
        }
    }

    fn reason_phrase(code: u16) -> &'static str {
        match code {
            400 => "Bad Request",
            404 => "Not Found",
            409 => "Conflict",
            413 => "Payload Too Large",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        }
    }

    #[test]
    fn only_5xx_kinds_are_server_errors() {
        let server: Vec<_> = ALL.into_iter().filter(ErrorKind::is_server_error).collect();
        assert_eq!(
            server,
            vec![ErrorKind::InternalServerError, ErrorKind::ServiceUnavailable]
        );
    }

    #[test]
    fn problem_type_embeds_status() {
        assert_eq!(
            ErrorKind::UnprocessableEntity.problem_type(),
            "https://httpstatuses.io/422"
        );
    }

    #[test]
    fn serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::PayloadTooLarge).unwrap();
        assert_eq!(json, "\"PAYLOAD_TOO_LARGE\"");
    }
}
