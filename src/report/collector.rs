use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, instrument};

use crate::discovery::Node;
use crate::metadata::MetadataSource;
use crate::report::record::enrich_node;
use crate::report::ReportSet;

/// Query every node concurrently and gather one record per node.
///
/// One task per node, each delivering exactly one record; the channel
/// capacity matches the task count so no send can ever block. The receive
/// loop runs until every sender is gone, so the set is complete before this
/// returns, whatever order the fetches finish in.
#[instrument(skip(source, nodes), fields(node_count = nodes.len()))]
pub async fn collect_all(source: Arc<dyn MetadataSource>, nodes: Vec<Node>) -> ReportSet {
    if nodes.is_empty() {
        return ReportSet::new();
    }

    let expected = nodes.len();
    let (record_sender, mut record_receiver) = mpsc::channel(expected);

    for node in nodes {
        let source = Arc::clone(&source);
        let record_sender = record_sender.clone();
        tokio::spawn(async move {
            let record = enrich_node(source.as_ref(), node).await;
            // The receiver outlives every sender, so this only fails if the
            // collector itself has gone away.
            let _ = record_sender.send(record).await;
        });
    }
    drop(record_sender);

    let mut records = ReportSet::with_capacity(expected);
    while let Some(record) = record_receiver.recv().await {
        records.push(record);
    }

    if records.len() != expected {
        error!("Collected {} records for {} nodes", records.len(), expected);
    }
    records
}
