//! Error taxonomy for suite tree construction.

use std::fmt;

/// Which sibling namespace a colliding description belongs to.
///
/// Suites and specs are checked independently: a suite and a spec may share
/// a description at the same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Suite,
    Spec,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Suite => f.write_str("suite"),
            DeclarationKind::Spec => f.write_str("spec"),
        }
    }
}

/// Errors that abort evaluation of a suite tree.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("{kind} with description '{description}' does already exist in {}", render_path(.path))]
    DuplicateDeclaration {
        kind: DeclarationKind,
        description: String,
        path: Vec<String>,
    },

    #[error("declaration of {} failed: {source}", render_path(.path))]
    Declaration {
        path: Vec<String>,
        #[source]
        source: anyhow::Error,
    },
}

impl SuiteError {
    /// Description path (root to offending node) the error is attached to.
    pub fn path(&self) -> &[String] {
        match self {
            SuiteError::DuplicateDeclaration { path, .. } | SuiteError::Declaration { path, .. } => {
                path
            }
        }
    }
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        format!("'{}'", path.join(" > "))
    }
}

/// Result type for suite construction.
pub type SuiteResult<T> = std::result::Result<T, SuiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display_names_kind_and_path() {
        let err = SuiteError::DuplicateDeclaration {
            kind: DeclarationKind::Spec,
            description: "adds".to_string(),
            path: vec!["Calculator".to_string(), "addition".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("spec with description 'adds'"));
        assert!(msg.contains("'Calculator > addition'"));
    }

    #[test]
    fn test_root_path_rendering() {
        let err = SuiteError::Declaration {
            path: Vec::new(),
            source: anyhow::anyhow!("boom"),
        };
        let msg = err.to_string();
        assert!(msg.contains("<root>"));
        assert!(msg.contains("boom"));
        assert!(err.path().is_empty());
    }
}
