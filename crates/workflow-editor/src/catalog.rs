//! Node-kind catalog boundary
//!
//! The catalog of placeable node kinds is owned by the surrounding
//! dashboard and read-only to the editor core; entries here only supply the
//! arguments handed to `GraphStore::add_node`. The default set mirrors the
//! analysis pipeline palette.

use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

/// A palette entry describing one placeable node kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Kind assigned to nodes created from this entry
    pub kind: NodeKind,
    /// Label shown on the node card
    pub label: String,
    /// Opaque icon reference resolved by the renderer
    pub icon: String,
    /// Palette section this entry is listed under
    pub category: String,
}

impl CatalogEntry {
    pub fn new(
        kind: NodeKind,
        label: impl Into<String>,
        icon: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            icon: icon.into(),
            category: category.into(),
        }
    }
}

/// The built-in analysis pipeline palette
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(NodeKind::Input, "File Input", "upload", "Input"),
        CatalogEntry::new(NodeKind::Input, "Sample Hash", "hash", "Input"),
        CatalogEntry::new(NodeKind::Analysis, "Static Analysis", "microscope", "Analysis"),
        CatalogEntry::new(NodeKind::Analysis, "Deobfuscate", "unlock", "Analysis"),
        CatalogEntry::new(NodeKind::Analysis, "YARA Scan", "radar", "Analysis"),
        CatalogEntry::new(NodeKind::Analysis, "Threat Intel Lookup", "globe", "Analysis"),
        CatalogEntry::new(NodeKind::Condition, "Verdict Branch", "git-branch", "Control"),
        CatalogEntry::new(NodeKind::Output, "Report Output", "file-text", "Output"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_covers_all_kinds() {
        let catalog = default_catalog();
        for kind in [
            NodeKind::Input,
            NodeKind::Analysis,
            NodeKind::Condition,
            NodeKind::Output,
        ] {
            assert!(
                catalog.iter().any(|e| e.kind == kind),
                "missing kind {}",
                kind
            );
        }
    }
}
