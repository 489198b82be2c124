use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use crate::discovery::Node;
use crate::metadata::{MetadataMapping, MetadataSource};

pub const INSTANCE_ID_KEY: &str = "InstanceID";
pub const INSTANCE_IP_KEY: &str = "InstanceIP";
pub const INSTANCE_LAUNCH_TIME_KEY: &str = "InstanceLaunchTime";
pub const INSTANCE_NAME_KEY: &str = "InstanceName";

/// Merged infrastructure + metadata view of one node, serialized as one
/// flat JSON object. Built once by its enrichment task, never updated.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct EnrichedRecord {
    fields: BTreeMap<String, String>,
}

impl EnrichedRecord {
    fn from_parts(node: &Node, metadata: MetadataMapping) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(INSTANCE_ID_KEY.to_string(), node.id.clone());
        fields.insert(INSTANCE_IP_KEY.to_string(), node.address.clone());
        fields.insert(INSTANCE_LAUNCH_TIME_KEY.to_string(), node.launch_time.clone());
        if let Some(name) = &node.name {
            fields.insert(INSTANCE_NAME_KEY.to_string(), name.clone());
        }
        // Metadata is merged second: a colliding key overwrites the
        // infrastructure value.
        fields.extend(metadata);
        Self { fields }
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Combine one node's infrastructure attributes with its fetched metadata.
/// Never fails: a failed fetch downgrades to an infrastructure-only record.
#[instrument(skip(source, node), fields(address = %node.address))]
pub async fn enrich_node(source: &dyn MetadataSource, node: Node) -> EnrichedRecord {
    let metadata = match source.fetch(&node.address).await {
        Ok(metadata) => metadata,
        Err(error) => {
            warn!("No metadata from {}: {}", node.address, error);
            MetadataMapping::new()
        }
    };
    let record = EnrichedRecord::from_parts(&node, metadata);
    debug!("{} field(s) for {}", record.fields().len(), node.address);
    record
}
