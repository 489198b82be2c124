use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::errors::FetchError;

pub mod http;

/// The key-value document retrieved from a node's metadata endpoint.
pub type MetadataMapping = BTreeMap<String, String>;

/// Substrings of a missing-resource page. A body containing one means the
/// node is reachable but serves no metadata, which is not a failure.
const NOT_FOUND_MARKERS: [&str; 2] = ["not found", "HTTP Status 404"];

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the metadata document from one node.
    async fn fetch(&self, address: &str) -> Result<MetadataMapping, FetchError>;
}

/// Interpret a response body as a metadata mapping.
///
/// A missing-resource page or an empty document yields an empty mapping.
/// Scalar values coerce to strings, null to the empty string; anything
/// nested is rejected.
pub fn parse_metadata_body(body: &str) -> Result<MetadataMapping, FetchError> {
    if NOT_FOUND_MARKERS.iter().any(|marker| body.contains(marker)) {
        return Ok(MetadataMapping::new());
    }

    let document: Value = serde_yaml::from_str(body)?;
    match document {
        Value::Null => Ok(MetadataMapping::new()),
        Value::Mapping(mapping) => {
            let mut metadata = MetadataMapping::new();
            for (key, value) in mapping {
                let Value::String(key) = key else {
                    return Err(FetchError::InvalidDocument(format!(
                        "key {key:?} is not a string"
                    )));
                };
                let Some(value) = scalar_to_string(&value) else {
                    return Err(FetchError::InvalidDocument(format!(
                        "value of '{key}' is not a scalar"
                    )));
                };
                metadata.insert(key, value);
            }
            Ok(metadata)
        }
        other => Err(FetchError::InvalidDocument(format!(
            "document root is {} rather than a mapping",
            value_kind(&other)
        ))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}


#[cfg(test)]
mod tests {
    use super::{parse_metadata_body, MetadataMapping};
    use crate::errors::FetchError;

    #[test]
    fn flat_document_parses_to_a_mapping() {
        let metadata = parse_metadata_body("role: web\nowner: platform\n").unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["role"], "web");
        assert_eq!(metadata["owner"], "platform");
    }

    #[test]
    fn scalar_values_coerce_to_strings() {
        let metadata =
            parse_metadata_body("replicas: 3\ncanary: true\nweight: 0.25\nnote:\n").unwrap();
        assert_eq!(metadata["replicas"], "3");
        assert_eq!(metadata["canary"], "true");
        assert_eq!(metadata["weight"], "0.25");
        assert_eq!(metadata["note"], "");
    }

    #[test]
    fn missing_resource_pages_yield_an_empty_mapping() {
        let tomcat_page = "<html><h1>HTTP Status 404 - Not Found</h1></html>";
        assert_eq!(parse_metadata_body(tomcat_page).unwrap(), MetadataMapping::new());

        let plain_page = "the page you requested was not found";
        assert_eq!(parse_metadata_body(plain_page).unwrap(), MetadataMapping::new());
    }

    #[test]
    fn empty_and_null_documents_yield_an_empty_mapping() {
        assert_eq!(parse_metadata_body("").unwrap(), MetadataMapping::new());
        assert_eq!(parse_metadata_body("null").unwrap(), MetadataMapping::new());
        assert_eq!(parse_metadata_body("---\n").unwrap(), MetadataMapping::new());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result = parse_metadata_body("role: [unclosed");
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn nested_values_are_rejected() {
        let result = parse_metadata_body("role:\n  tier: frontend\n");
        assert!(matches!(result, Err(FetchError::InvalidDocument(_))));

        let result = parse_metadata_body("role:\n  - web\n  - frontend\n");
        assert!(matches!(result, Err(FetchError::InvalidDocument(_))));
    }

    #[test]
    fn non_mapping_documents_are_rejected() {
        let result = parse_metadata_body("- web\n- db\n");
        assert!(matches!(result, Err(FetchError::InvalidDocument(_))));

        let result = parse_metadata_body("just a sentence with no colon");
        assert!(matches!(result, Err(FetchError::InvalidDocument(_))));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        let result = parse_metadata_body("8080: http\n");
        assert!(matches!(result, Err(FetchError::InvalidDocument(_))));
    }
}
