use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::errors::{Error, FetchError};
use crate::metadata::{parse_metadata_body, MetadataMapping, MetadataSource};

/// Fetches metadata documents over HTTP(S). Scheme, port, resource path and
/// TLS policy are fixed per instance; only the address varies per node.
pub struct HttpMetadataSource {
    client: reqwest::Client,
    scheme: String,
    port: u16,
    resource: String,
}

impl HttpMetadataSource {
    pub fn new(config: &Config) -> Result<Self, Error> {
        // The endpoint is addressed by private network identity, not by
        // certificate identity, so certificate validation is an explicit
        // configuration decision.
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            scheme: config.scheme.clone(),
            port: config.port,
            resource: config.resource.clone(),
        })
    }

    fn url_for(&self, address: &str) -> String {
        format!(
            "{}://{}:{}/{}",
            self.scheme, address, self.port, self.resource
        )
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    #[instrument(skip(self))]
    async fn fetch(&self, address: &str) -> Result<MetadataMapping, FetchError> {
        let url = self.url_for(address);
        debug!("Reading {url}");

        // The endpoint reports a missing document in the body, not in the
        // status code, so the status is deliberately not checked here.
        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;
        parse_metadata_body(&body)
    }
}
