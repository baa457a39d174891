//! Resource providers served through `resources/read`

use super::types::McpResourceTemplate;
use async_trait::async_trait;

/// A family of resources addressed by a URI template
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Template advertised to clients
    fn template(&self) -> McpResourceTemplate;

    /// Whether this provider serves `uri`
    fn matches(&self, uri: &str) -> bool;

    /// Read the resource as text
    ///
    /// Failures are reported inside the returned text; a provider never
    /// fails the protocol request once it has matched the URI.
    async fn read(&self, uri: &str) -> String;
}
