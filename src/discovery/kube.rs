use k8s_openapi::api::core::v1::Node as ClusterNode;
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::{debug, instrument, warn};

use async_trait::async_trait;

use crate::discovery::filter::HostFilter;
use crate::discovery::{Node, NodeDiscovery};
use crate::errors::Error;

/// Node label carrying the display name the host filter is matched against.
/// Nodes without it are never eligible for the report.
pub const NODE_NAME_LABEL: &str = "node-reporter.acl.fi/name";

pub trait NodeExt {
    fn is_ready(&self) -> bool;
    fn internal_address(&self) -> Option<String>;
    fn display_name(&self) -> Option<String>;
}

impl NodeExt for ClusterNode {
    fn is_ready(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|status| status.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .any(|condition| condition.type_ == "Ready" && condition.status == "True")
            })
            .unwrap_or(false)
    }

    fn internal_address(&self) -> Option<String> {
        self.status
            .as_ref()
            .and_then(|status| status.addresses.as_ref())
            .and_then(|addresses| {
                addresses
                    .iter()
                    .find(|address| address.type_ == "InternalIP")
            })
            .map(|address| address.address.clone())
    }

    fn display_name(&self) -> Option<String> {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(NODE_NAME_LABEL))
            .cloned()
    }
}

pub struct KubeNodeDiscovery {
    client: Client,
}

impl KubeNodeDiscovery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeDiscovery for KubeNodeDiscovery {
    #[instrument(skip(self, filter))]
    async fn list_nodes(&self, filter: &HostFilter) -> Result<Vec<Node>, Error> {
        let node_api: Api<ClusterNode> = Api::all(self.client.clone());
        // The apiserver pre-filters on label presence, the pattern match
        // against the label value happens here.
        let list_params = ListParams::default().labels(NODE_NAME_LABEL);
        let cluster_nodes = node_api.list(&list_params).await?;

        let mut nodes = Vec::new();
        for cluster_node in cluster_nodes.items {
            if let Some(node) = discovered_node(cluster_node, filter) {
                nodes.push(node);
            }
        }
        debug!("{} node(s) ready and matching the host filter", nodes.len());
        Ok(nodes)
    }
}

fn discovered_node(cluster_node: ClusterNode, filter: &HostFilter) -> Option<Node> {
    if !cluster_node.is_ready() {
        return None;
    }
    let name = cluster_node.display_name()?;
    if !filter.matches(&name) {
        return None;
    }
    let Some(address) = cluster_node.internal_address() else {
        warn!("Node '{name}' has no InternalIP address, skipping");
        return None;
    };
    let Some(id) = cluster_node.metadata.uid.clone() else {
        warn!("Node '{name}' has no uid, skipping");
        return None;
    };
    let launch_time = cluster_node
        .metadata
        .creation_timestamp
        .as_ref()
        .map(|timestamp| timestamp.0.to_rfc3339())
        .unwrap_or_default();

    Some(Node {
        id,
        address,
        launch_time,
        name: Some(name),
    })
}
