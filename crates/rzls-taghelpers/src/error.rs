use thiserror::Error;

use crate::TagHelperKind;

/// A builder was asked to freeze a descriptor that violates its contract.
///
/// These are bugs in the calling provider, not problems with user code.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("{kind} descriptor has no name")]
    MissingName { kind: TagHelperKind },

    #[error("Descriptor '{name}' has no assembly name")]
    MissingAssemblyName { name: String },

    #[error("Descriptor '{descriptor}' has a bound attribute with neither a name nor an indexer prefix")]
    UnnamedBoundAttribute { descriptor: String },

    #[error("Bound attribute '{attribute}' on '{descriptor}' has a parameter with no name")]
    UnnamedParameter {
        descriptor: String,
        attribute: String,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Provider '{provider}' failed")]
    Provider {
        provider: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("Assembly '{name}' is not part of the compilation")]
    UnknownAssembly { name: String },
}
