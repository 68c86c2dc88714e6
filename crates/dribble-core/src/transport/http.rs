//! HTTP GET transport over libcurl.
//!
//! Template locations are usually relative (`/views/home.html`) and are
//! resolved against the base URL of the host application.

use std::time::Duration;
use url::Url;

use super::{FetchError, Transport};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const TOTAL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: CONNECT_TIMEOUT,
            timeout: TOTAL_TIMEOUT,
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a template location. Absolute locations pass through.
    pub fn resolve(&self, location: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(location)
            .map_err(|source| FetchError::InvalidLocation {
                location: location.to_string(),
                source,
            })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.resolve(location)?;
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}
