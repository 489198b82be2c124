use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::discovery::filter::HostFilter;
use crate::errors::Error;

// Required settings.
const METADATA_RESOURCE: &str = "METADATA_RESOURCE";
const NODE_FILTER: &str = "NODE_FILTER";
const METADATA_PORT: &str = "METADATA_PORT";

// Optional settings.
const METADATA_SCHEME: &str = "METADATA_SCHEME";
const METADATA_INSECURE_TLS: &str = "METADATA_INSECURE_TLS";
const METADATA_TIMEOUT_SECONDS: &str = "METADATA_TIMEOUT_SECONDS";
const LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Environment-sourced settings, validated once at startup. An invalid or
/// missing required value fails the whole process before any request is
/// served.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resource path of the metadata document on each node.
    pub resource: String,
    /// Which running nodes are reported on.
    pub host_filter: HostFilter,
    /// Port the metadata endpoint listens on.
    pub port: u16,
    /// `https` by default. The endpoints present certificates that are not
    /// expected to validate, hence `insecure_tls`.
    pub scheme: String,
    pub insecure_tls: bool,
    pub fetch_timeout: Duration,
    pub listen_address: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_source(|name| env::var(name).ok())
    }

    fn from_source<F>(get: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resource = required(&get, METADATA_RESOURCE)?;
        let filter_expression = required(&get, NODE_FILTER)?;
        let host_filter = HostFilter::parse(&filter_expression)?;

        let port = required(&get, METADATA_PORT)?;
        let port: u16 = port.parse().map_err(|_| Error::InvalidConfigValue {
            name: METADATA_PORT,
            reason: format!("'{port}' is not a port number"),
        })?;

        let scheme = get(METADATA_SCHEME).unwrap_or_else(|| String::from(DEFAULT_SCHEME));
        if scheme != "http" && scheme != "https" {
            return Err(Error::InvalidConfigValue {
                name: METADATA_SCHEME,
                reason: format!("'{scheme}' is neither 'http' nor 'https'"),
            });
        }

        let insecure_tls = match get(METADATA_INSECURE_TLS) {
            None => true,
            Some(value) => match value.to_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(Error::InvalidConfigValue {
                        name: METADATA_INSECURE_TLS,
                        reason: format!("'{value}' is neither 'true' nor 'false'"),
                    })
                }
            },
        };

        let fetch_timeout = match get(METADATA_TIMEOUT_SECONDS) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            Some(value) => {
                let seconds: u64 = value.parse().map_err(|_| Error::InvalidConfigValue {
                    name: METADATA_TIMEOUT_SECONDS,
                    reason: format!("'{value}' is not a number of seconds"),
                })?;
                Duration::from_secs(seconds)
            }
        };

        let listen_address =
            get(LISTEN_ADDRESS).unwrap_or_else(|| String::from(DEFAULT_LISTEN_ADDRESS));
        let listen_address: SocketAddr =
            listen_address.parse().map_err(|_| Error::InvalidConfigValue {
                name: LISTEN_ADDRESS,
                reason: format!("'{listen_address}' is not a listen address"),
            })?;

        Ok(Self {
            resource,
            host_filter,
            port,
            scheme,
            insecure_tls,
            fetch_timeout,
            listen_address,
        })
    }
}

fn required<F>(get: &F, name: &'static str) -> Result<String, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingConfigValue(name)),
    }
}
