//! Export generators.
//!
//! Pure transforms from a selection of items to a downloadable artifact. A
//! selection made only of registry items can be exported as one of three
//! registry dialects; any selection containing another category can only be
//! exported generically (one file, or a zip archive for several items).
//! Mixed selections never get the registry dialects.

pub mod bundle;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::item::Item;

pub use registry::RegistryDialect;

/// MIME type used for every text artifact.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// ---------------------------------------------------------------------------
// Formats and dispatch
// ---------------------------------------------------------------------------

/// Export actions a client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Reg,
    Ps1,
    Bat,
    /// Single file for one item, zip archive for several.
    Bundle,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Reg => "reg",
            ExportFormat::Ps1 => "ps1",
            ExportFormat::Bat => "bat",
            ExportFormat::Bundle => "bundle",
        }
    }

    fn registry_dialect(self) -> Option<RegistryDialect> {
        match self {
            ExportFormat::Reg => Some(RegistryDialect::RegFile),
            ExportFormat::Ps1 => Some(RegistryDialect::PowerShell),
            ExportFormat::Bat => Some(RegistryDialect::Batch),
            ExportFormat::Bundle => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a selection may be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportOptions {
    /// Nothing selected.
    Unavailable,
    /// Only registry items: the three registry dialects.
    Registry,
    /// At least one non-registry item: the generic single-file/zip export.
    Generic,
}

impl ExportOptions {
    pub fn for_selection(items: &[Item]) -> Self {
        if items.is_empty() {
            ExportOptions::Unavailable
        } else if items.iter().all(|i| i.category == Category::Registry) {
            ExportOptions::Registry
        } else {
            ExportOptions::Generic
        }
    }

    pub fn formats(self) -> &'static [ExportFormat] {
        match self {
            ExportOptions::Unavailable => &[],
            ExportOptions::Registry => &[ExportFormat::Reg, ExportFormat::Ps1, ExportFormat::Bat],
            ExportOptions::Generic => &[ExportFormat::Bundle],
        }
    }

    pub fn offers(self, format: ExportFormat) -> bool {
        self.formats().contains(&format)
    }
}

impl fmt::Display for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportOptions::Unavailable => "unavailable",
            ExportOptions::Registry => "registry",
            ExportOptions::Generic => "generic",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Artifact and errors
// ---------------------------------------------------------------------------

/// A generated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing selected to export")]
    EmptySelection,

    #[error("Export format '{format}' is not offered for a {options} selection")]
    NotOffered {
        format: ExportFormat,
        options: ExportOptions,
    },

    #[error("Registry item '{id}' has no key path")]
    MissingRegistryPath { id: String },

    #[error(
        "Registry item '{id}' has a line break in its {field}, which a {dialect} script cannot express"
    )]
    LineBreak {
        id: String,
        field: &'static str,
        dialect: RegistryDialect,
    },

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Export `items` in `format`, enforcing the selection dispatch rule.
pub fn export(items: &[Item], format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    let options = ExportOptions::for_selection(items);
    if options == ExportOptions::Unavailable {
        return Err(ExportError::EmptySelection);
    }
    if !options.offers(format) {
        return Err(ExportError::NotOffered { format, options });
    }

    match format.registry_dialect() {
        Some(dialect) => registry::export(items, dialect),
        None => bundle::export(items),
    }
}
