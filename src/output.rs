use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;
use crate::target::EnvironmentDocument;

/// Writes one document to `<namespace>.features.yaml` under `dir`,
/// silently overwriting any existing file. Returns the written path.
pub fn write_document(document: &EnvironmentDocument, dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join(format!("{}.features.yaml", document.namespace));

    let yaml = serde_yaml::to_string(document).map_err(|source| Error::Serialize {
        namespace: document.namespace.clone(),
        source,
    })?;

    fs::write(&path, yaml).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), flags = document.flags.len(), segments = document.segments.len(), "wrote document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{TargetFlag, Variant, VARIANT_FLAG_TYPE};

    #[test]
    fn test_write_document_names_file_after_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let document = EnvironmentDocument {
            namespace: "production".to_string(),
            flags: vec![TargetFlag {
                key: "dark-mode".to_string(),
                flag_type: VARIANT_FLAG_TYPE.to_string(),
                name: "Dark Mode".to_string(),
                description: "Toggles the dark theme".to_string(),
                enabled: true,
                variants: vec![
                    Variant {
                        key: "on".to_string(),
                        name: "on".to_string(),
                    },
                    Variant {
                        key: "off".to_string(),
                        name: "off".to_string(),
                    },
                ],
                rules: vec![],
            }],
            segments: vec![],
        };

        let path = write_document(&document, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("production.features.yaml"));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("namespace: production"));
        assert!(contents.contains("key: dark-mode"));
        assert!(contents.contains("type: VARIANT_FLAG_TYPE"));

        // Overwrites on a second run rather than appending.
        write_document(&document, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }
}
