use bollard::{API_DEFAULT_VERSION, ClientVersion, Docker};
use core::str::FromStr;
use std::fmt;

use crate::error::SanityError;

/// An engine address, as accepted on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointAddr {
    /// `unix:///var/run/docker.sock` or a bare absolute socket path
    Unix(String),
    /// `tcp://host:port` or `http://host:port`
    Http(String),
}

impl FromStr for EndpointAddr {
    type Err = SanityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(SanityError::InvalidEndpoint(s.to_string()));
            }
            return Ok(EndpointAddr::Unix(path.to_string()));
        }
        if s.starts_with('/') {
            return Ok(EndpointAddr::Unix(s.to_string()));
        }

        let host = s
            .strip_prefix("tcp://")
            .or_else(|| s.strip_prefix("http://"))
            .ok_or_else(|| SanityError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(SanityError::InvalidEndpoint(s.to_string()));
        }

        Ok(EndpointAddr::Http(format!("http://{host}")))
    }
}

impl fmt::Display for EndpointAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointAddr::Unix(path) => write!(f, "unix://{}", path),
            EndpointAddr::Http(addr) => write!(f, "{}", addr),
        }
    }
}

/// Parse an API version token such as `v1.22` or `1.22`
pub fn parse_api_version(token: &str) -> Result<ClientVersion, SanityError> {
    let invalid = || SanityError::InvalidApiVersion(token.to_string());

    let digits = token.strip_prefix('v').unwrap_or(token);
    let (major, minor) = digits.split_once('.').ok_or_else(invalid)?;

    Ok(ClientVersion {
        major_version: major.parse().map_err(|_| invalid())?,
        minor_version: minor.parse().map_err(|_| invalid())?,
    })
}

/// An engine we hold a session with
#[derive(Debug)]
pub struct Endpoint<C> {
    addr: String,
    client: C,
}

impl<C> Endpoint<C> {
    pub fn new(addr: impl Into<String>, client: C) -> Self {
        Self {
            addr: addr.into(),
            client,
        }
    }

    /// The address as it was configured
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl Endpoint<Docker> {
    /// Open a session to `addr` and ping the engine
    ///
    /// The client library connects lazily, so the ping is what proves the endpoint is reachable.
    /// When `api_version` is `None` the version is negotiated with the engine first.
    pub async fn connect(
        addr: &str,
        api_version: Option<&ClientVersion>,
        timeout_secs: u64,
    ) -> Result<Self, SanityError> {
        let version = api_version.unwrap_or(API_DEFAULT_VERSION);
        let connect_err = |source| SanityError::Connect {
            addr: addr.to_string(),
            source,
        };

        let client = match addr.parse::<EndpointAddr>()? {
            #[cfg(unix)]
            EndpointAddr::Unix(path) => {
                Docker::connect_with_unix(&path, timeout_secs, version).map_err(connect_err)?
            }
            #[cfg(not(unix))]
            EndpointAddr::Unix(_) => return Err(SanityError::InvalidEndpoint(addr.to_string())),
            EndpointAddr::Http(host) => {
                Docker::connect_with_http(&host, timeout_secs, version).map_err(connect_err)?
            }
        };

        // Without a pinned version, settle on whatever both sides speak
        let client = match api_version {
            Some(_) => client,
            None => client.negotiate_version().await.map_err(connect_err)?,
        };

        if let Err(e) = client.ping().await {
            log::error!("Failed to ping docker server at {}: {}", addr, e);
            return Err(connect_err(e));
        }

        log::info!("Successfully connected to {}", addr);
        Ok(Self::new(addr, client))
    }
}

/// Connect to every address in order; the first becomes the master
pub async fn connect_all(
    addrs: &[String],
    api_version: Option<&str>,
    timeout_secs: u64,
) -> Result<Vec<Endpoint<Docker>>, SanityError> {
    if addrs.is_empty() {
        return Err(SanityError::NoEndpoints);
    }

    let version = api_version.map(parse_api_version).transpose()?;

    let mut endpoints = Vec::with_capacity(addrs.len());
    for addr in addrs {
        endpoints.push(Endpoint::connect(addr, version.as_ref(), timeout_secs).await?);
    }

    Ok(endpoints)
}
