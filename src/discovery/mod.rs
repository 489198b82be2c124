use async_trait::async_trait;

use crate::discovery::filter::HostFilter;
use crate::errors::Error;

pub mod filter;
pub mod kube;

/// A running compute node eligible for enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Opaque identifier, unique per node.
    pub id: String,
    /// Private network address the metadata endpoint is reached on.
    pub address: String,
    /// Creation timestamp, opaque to everything downstream.
    pub launch_time: String,
    /// Display name. Absent when the node carries no name label.
    pub name: Option<String>,
}

#[async_trait]
pub trait NodeDiscovery: Send + Sync {
    /// List the currently running nodes whose name matches the filter.
    async fn list_nodes(&self, filter: &HostFilter) -> Result<Vec<Node>, Error>;
}
