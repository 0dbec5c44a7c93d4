//! Form decoding module
//!
//! Explicit decode step for `application/x-www-form-urlencoded` request
//! bodies, replacing any notion of automatic model binding. Decoding is
//! lenient about content: unknown fields pass through and absent fields are
//! left to the caller's defaults. It is strict about form: a wrong content
//! type or a non-UTF-8 body is an error the router turns into 400.

use std::fmt;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Why a request body could not be decoded as a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDecodeError {
    /// Content-Type was present but not form-urlencoded
    UnsupportedContentType(String),
    /// Body bytes are not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for FormDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedContentType(mime) => {
                write!(f, "Unsupported content type: {mime}")
            }
            Self::InvalidUtf8 => write!(f, "Request body is not valid UTF-8"),
        }
    }
}

impl std::error::Error for FormDecodeError {}

/// Decode a form-urlencoded body into name/value pairs
///
/// An absent Content-Type is accepted (browsers always send one for form
/// posts, curl does not have to). Parameters after the media type, such as
/// `; charset=UTF-8`, are ignored.
pub fn decode_form(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Vec<(String, String)>, FormDecodeError> {
    if let Some(header) = content_type {
        let mime = header.split(';').next().unwrap_or("").trim();
        if !mime.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
            return Err(FormDecodeError::UnsupportedContentType(mime.to_string()));
        }
    }

    if std::str::from_utf8(body).is_err() {
        return Err(FormDecodeError::InvalidUtf8);
    }

    Ok(form_urlencoded::parse(body)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect())
}
