use crate::errors::Error;

pub mod collector;
pub mod record;

pub use record::EnrichedRecord;

/// The complete unordered collection of records for one invocation. Element
/// order follows completion order and carries no meaning.
pub type ReportSet = Vec<EnrichedRecord>;

/// Serialize a report to its wire form: a JSON array of flat string-to-string
/// objects, newline-terminated. Failing here means the invariants upstream
/// were broken, not that the input was bad.
pub fn assemble(records: &ReportSet) -> Result<String, Error> {
    let mut body = serde_json::to_string(records)?;
    body.push('\n');
    Ok(body)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::{assemble, collector::collect_all, ReportSet};
    use crate::discovery::testing::node;
    use crate::metadata::testing::StubMetadataSource;

    #[test]
    fn empty_report_is_an_empty_json_array() {
        assert_eq!(assemble(&ReportSet::new()).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn report_serializes_as_flat_objects_with_a_trailing_newline() {
        let source = Arc::new(
            StubMetadataSource::new()
                .with_mapping("10.0.0.1", &[("role", "web")])
                .with_failure("10.0.0.2"),
        );
        let nodes = vec![
            node("i-1", "10.0.0.1", Some("web-1")),
            node("i-2", "10.0.0.2", None),
        ];

        let body = assemble(&collect_all(source, nodes).await).unwrap();
        assert!(body.ends_with('\n'));

        let mut decoded: Vec<BTreeMap<String, String>> = serde_json::from_str(&body).unwrap();
        decoded.sort_by(|a, b| a["InstanceID"].cmp(&b["InstanceID"]));

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0]["InstanceID"], "i-1");
        assert_eq!(decoded[0]["role"], "web");
        assert_eq!(decoded[1]["InstanceID"], "i-2");
        assert!(!decoded[1].contains_key("role"));
        assert!(!decoded[1].contains_key("InstanceName"));
    }
}
