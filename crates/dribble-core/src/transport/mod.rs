//! Template transport.
//!
//! A [`Transport`] performs one blocking fetch. The [`FetchDispatcher`] runs
//! prefetch fetches on the blocking pool, stores successful bodies in the
//! template cache and reports every completion, success or failure, to the
//! activity bus. Foreground requests go through [`ObservedTransport`] so they
//! reach the same bus.

mod dispatch;
mod http;
mod observed;

pub use dispatch::{Dispatcher, FetchDispatcher};
pub use http::HttpTransport;
pub use observed::ObservedTransport;

#[cfg(test)]
pub(crate) use dispatch::testing;

use thiserror::Error;

/// Failure of a single template fetch. Never retried; the sequencer treats it
/// as a completion like any other.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid location {location:?}: {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
}

pub trait Transport: Send + Sync {
    /// Fetch `location` and return the response body.
    /// Blocks the calling thread; async callers go through `spawn_blocking`.
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages() {
        assert_eq!(FetchError::Http(404).to_string(), "HTTP 404");
        let err = FetchError::InvalidLocation {
            location: "http://[::1".to_string(),
            source: url::ParseError::InvalidIpv6Address,
        };
        assert!(err.to_string().starts_with("invalid location"));
    }
}
