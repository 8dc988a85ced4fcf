//! Domain-specific errors for package operations

use bpm_schema::{NameError, PackageName};
use thiserror::Error;

use crate::io::download::TransportError;
use crate::registry::RegistryError;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("Invalid package name: {0}")]
    Name(#[from] NameError),

    #[error("Download of {name} failed: {source}")]
    DownloadFailed {
        name: PackageName,
        #[source]
        source: TransportError,
    },

    #[error("Failed to install {name}: {direct} (elevated copy failed: {elevated})")]
    InstallFailed {
        name: PackageName,
        direct: std::io::Error,
        elevated: std::io::Error,
    },

    #[error("Dependency cycle: {}", .0.iter().map(PackageName::as_str).collect::<Vec<_>>().join(" -> "))]
    DependencyCycle(Vec<PackageName>),

    #[error("Dependency {dependency} of {package} failed: {source}")]
    DependencyFailed {
        package: PackageName,
        dependency: PackageName,
        #[source]
        source: Box<InstallError>,
    },

    #[error("Dependency {dependency} of {package} was not confirmed")]
    DependencyDeclined {
        package: PackageName,
        dependency: PackageName,
    },

    #[error("Failed to update registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RemoveError {
    #[error("Failed to update registry: {0}")]
    Registry(#[from] RegistryError),
}
