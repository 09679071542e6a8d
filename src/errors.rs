use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Failed to fetch {url} ({status})")]
    Fetch { status: u16, url: String },

    #[error("Unable to get data from source\nFrom: {0}")]
    Network(String),

    #[error("{message}")]
    Handler { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Page number must be at least 1")]
    InvalidPage,
}

impl Error {
    /// HTTP-style status carried by the error, 500 when there is none.
    pub fn status(&self) -> u16 {
        match self {
            Error::Fetch { status, .. } | Error::Handler { status, .. } => *status,
            Error::InvalidPage => 400,
            _ => 500,
        }
    }

    pub fn into_handler_failure(self) -> Self {
        match self {
            Error::Handler { .. } => self,
            err => Error::Handler {
                status: err.status(),
                message: err.to_string(),
            },
        }
    }

    /// Maps a transport failure while requesting `url`, timeouts become 504
    pub fn transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            return Error::Fetch {
                status: 504,
                url: url.to_string(),
            };
        }

        err.into()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let err = Error::Fetch {
            status: 404,
            url: "https://site/anime/x/".into(),
        };
        assert_eq!(err.status(), 404);
        assert_eq!(Error::Network("reset".into()).status(), 500);
        assert_eq!(Error::InvalidPage.status(), 400);
    }

    #[test]
    fn test_into_handler_failure() {
        let err = Error::Fetch {
            status: 403,
            url: "https://site/watch/x/".into(),
        }
        .into_handler_failure();

        assert_eq!(
            err,
            Error::Handler {
                status: 403,
                message: "Failed to fetch https://site/watch/x/ (403)".into()
            }
        );

        let err = Error::Network("connection reset".into()).into_handler_failure();
        assert_eq!(err.status(), 500);

        let same = err.clone().into_handler_failure();
        assert_eq!(same, err);
    }
}
