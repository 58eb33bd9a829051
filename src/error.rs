use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LocatorError {
    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("document {0} is not in any released dataset")]
    DocumentNotFound(String),

    #[error("no dataset numbered {0} in the registry")]
    UnknownDataset(u32),

    #[error("failed to read registry file at {0}")]
    RegistryRead(PathBuf),

    #[error("failed to parse registry JSON: {0}")]
    RegistryParse(String),

    #[error("invalid registry: {0}")]
    RegistryInvalid(String),

    #[error("failed to build probe HTTP client: {0}")]
    ProbeClient(String),
}
