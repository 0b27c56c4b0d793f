use std::error::Error as _;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("<tr class=\"style1\"> not found")]
    RowNotFound,
    #[error("course row has {len} tokens, needs at least {needed}")]
    RowTooShort { len: usize, needed: usize },
    #[error("malformed semester {0:?}, expected \"<year> <season>\"")]
    MalformedSemester(String),
    #[error("unknown season {0:?}")]
    UnknownSeason(String),
    #[error("unknown session code {0:?}")]
    UnknownSessionCode(String),
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ScrapeError {
    pub(crate) fn request(url: &str, source: anyhow::Error) -> Self {
        Self::Request {
            url: url.to_owned(),
            source,
        }
    }

    /// This error and its causes on one line.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
