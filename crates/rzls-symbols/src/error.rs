use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolLoadError {
    #[error("Failed to parse compilation snapshot")]
    Json(#[from] serde_json::Error),

    #[error("Assembly '{name}' is defined more than once")]
    DuplicateAssembly { name: String },

    #[error("Type '{metadata_name}' is defined more than once in assembly '{assembly}'")]
    DuplicateType {
        assembly: String,
        metadata_name: String,
    },

    #[error("Type '{name}' is nested in '{containing}', which assembly '{assembly}' does not define")]
    UnknownContainingType {
        assembly: String,
        name: String,
        containing: String,
    },
}
