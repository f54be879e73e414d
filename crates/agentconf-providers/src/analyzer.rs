//! Analysis capability port

use async_trait::async_trait;

use agentconf_domain::{Artifact, PackageConfiguration, VariableDeclaration};

use crate::error::AnalysisError;

/// Core trait every analysis adapter implements
///
/// An adapter owns one outbound call per `extract` invocation and the
/// interpretation of whatever the service sends back. An unparseable
/// response is "no declarations found", not an error; only transport,
/// auth, and service failures surface as `AnalysisError`.
#[async_trait]
pub trait DeclarationAnalyzer: Send + Sync {
    /// The adapter's unique identifier
    fn id(&self) -> &str;

    /// Extract variable declarations from one artifact
    ///
    /// `known` carries the package's already-declared configuration so the
    /// service can be steered toward variables not yet catalogued.
    async fn extract(
        &self,
        artifact: &Artifact,
        known: Option<&PackageConfiguration>,
    ) -> Result<Vec<VariableDeclaration>, AnalysisError>;
}
