mod config;
mod discovery;
mod errors;
mod logging;
mod metadata;
mod report;
mod server;
mod utils;

use crate::config::Config;
use crate::discovery::kube::KubeNodeDiscovery;
use crate::errors::Error;
use crate::metadata::http::HttpMetadataSource;
use crate::server::ReportServer;
use crate::utils::get_version_string;
use kube::Client;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();

    if args.contains(&String::from("--version")) {
        println!("{}", get_version_string());
    } else {
        println!("Starting node-reporter {}", get_version_string());
        pretty_env_logger::init();
        let _tracer_provider = logging::setup_tracing()?;

        let config = Config::from_env()?;
        let client = Client::try_default().await?;
        let discovery = Arc::new(KubeNodeDiscovery::new(client));
        let metadata = Arc::new(HttpMetadataSource::new(&config)?);
        ReportServer::new(config, discovery, metadata).run().await?;
    }
    Ok(())
}
