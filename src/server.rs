use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, instrument};
use warp::http::StatusCode;
use warp::{reply, Filter, Reply};

use crate::config::Config;
use crate::discovery::filter::HostFilter;
use crate::discovery::NodeDiscovery;
use crate::errors::Error;
use crate::metadata::MetadataSource;
use crate::report::assemble;
use crate::report::collector::collect_all;

const CONTENT_TYPE: &str = "text/json; charset=utf-8";

/// HTTP front of the service. Every GET on the root path produces a fresh
/// report; there is no caching between requests.
pub struct ReportServer {
    listen_address: SocketAddr,
    host_filter: Arc<HostFilter>,
    discovery: Arc<dyn NodeDiscovery>,
    metadata: Arc<dyn MetadataSource>,
}

impl ReportServer {
    pub fn new(
        config: Config,
        discovery: Arc<dyn NodeDiscovery>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            listen_address: config.listen_address,
            host_filter: Arc::new(config.host_filter),
            discovery,
            metadata,
        }
    }

    pub async fn run(self) -> Result<(), Error> {
        let api = routes(self.host_filter, self.discovery, self.metadata).with(warp::log("api"));

        info!("Serving node reports on {}", self.listen_address);
        warp::serve(api).run(self.listen_address).await;
        Err(Error::UnexpectedExit(String::from(
            "node report HTTP API (warp) died",
        )))
    }
}

fn routes(
    host_filter: Arc<HostFilter>,
    discovery: Arc<dyn NodeDiscovery>,
    metadata: Arc<dyn MetadataSource>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    warp::get().and(warp::path::end()).then(move || {
        let host_filter = Arc::clone(&host_filter);
        let discovery = Arc::clone(&discovery);
        let metadata = Arc::clone(&metadata);
        async move { generate_report(host_filter, discovery, metadata).await }
    })
}

#[instrument(skip(host_filter, discovery, metadata))]
async fn generate_report(
    host_filter: Arc<HostFilter>,
    discovery: Arc<dyn NodeDiscovery>,
    metadata: Arc<dyn MetadataSource>,
) -> warp::reply::Response {
    match report_body(&host_filter, discovery.as_ref(), metadata).await {
        Ok(body) => reply::with_header(body, "Content-Type", CONTENT_TYPE).into_response(),
        Err(error) => {
            error!("Failed to produce the node report: {error}");
            reply::with_status(String::new(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

async fn report_body(
    host_filter: &HostFilter,
    discovery: &dyn NodeDiscovery,
    metadata: Arc<dyn MetadataSource>,
) -> Result<String, Error> {
    let nodes = discovery.list_nodes(host_filter).await?;
    info!("Discovered {} matching node(s)", nodes.len());
    let records = collect_all(metadata, nodes).await;
    assemble(&records)
}
