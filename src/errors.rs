/// Errors that fail a whole invocation. Per-node fetch problems are
/// [`FetchError`]s and never leave the enrichment layer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Configuration
    #[error("Missing configuration value '{0}'")]
    MissingConfigValue(&'static str),
    #[error("Invalid configuration value '{name}': {reason}")]
    InvalidConfigValue { name: &'static str, reason: String },

    // Kubernetes
    #[error("Kubernetes error {0}")]
    Kube(#[from] kube::Error),

    // Report serialization
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),

    // Metadata client construction
    #[error("Failed to build metadata HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Tracing
    #[error("Failed to build OTLP span exporter: {0}")]
    TraceExporter(#[from] opentelemetry::trace::TraceError),
    #[error("Failed to install tracing subscriber: {0}")]
    SetSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    // Custom/generic
    #[error("Task ended unexpectedly: {0}")]
    UnexpectedExit(String),
}

/// Failure of a single node's metadata fetch. Recovered locally: the node
/// still contributes an infrastructure-only record and the batch continues.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metadata document is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("metadata document is not a flat mapping: {0}")]
    InvalidDocument(String),
}
