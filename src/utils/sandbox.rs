use std::path::{Component, Path, PathBuf};

/// Error for a client-supplied path or name that cannot be used.
#[derive(Debug, PartialEq, Eq)]
pub enum PathError {
    /// Path would escape the sandbox root.
    Traversal,
    /// Name contains separators or parent directory references.
    InvalidName,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::Traversal => write!(f, "Invalid path"),
            PathError::InvalidName => write!(
                f,
                "Invalid name: cannot contain path separators or parent directory references"
            ),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolve a client-supplied relative path against the sandbox root.
///
/// Only plain path components are accepted. Absolute paths, drive prefixes
/// and `..` components are rejected, so the result can never leave `base`.
pub fn resolve_safe(base: &Path, requested: &str) -> Result<PathBuf, PathError> {
    let mut resolved = base.to_path_buf();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return Err(PathError::Traversal),
        }
    }
    Ok(resolved)
}

/// Validate a single file or folder name supplied by a client.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    if name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
    {
        return Err(PathError::InvalidName);
    }
    Ok(())
}

/// Render a path relative to the sandbox root with `/` separators,
/// regardless of platform.
pub fn relative_display(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_resolves_to_base() {
        let base = Path::new("/srv/uploads");
        assert_eq!(resolve_safe(base, "").unwrap(), base);
    }

    #[test]
    fn nested_relative_path_is_joined() {
        let base = Path::new("/srv/uploads");
        assert_eq!(
            resolve_safe(base, "docs/notes.txt").unwrap(),
            base.join("docs").join("notes.txt")
        );
    }

    #[test]
    fn parent_components_are_rejected() {
        let base = Path::new("/srv/uploads");
        assert_eq!(resolve_safe(base, "../etc/passwd"), Err(PathError::Traversal));
        assert_eq!(resolve_safe(base, "docs/../../x"), Err(PathError::Traversal));
    }

    #[test]
    fn absolute_paths_are_rejected() {
        let base = Path::new("/srv/uploads");
        assert_eq!(resolve_safe(base, "/etc/passwd"), Err(PathError::Traversal));
    }

    #[test]
    fn current_dir_components_are_ignored() {
        let base = Path::new("/srv/uploads");
        assert_eq!(
            resolve_safe(base, "./docs/./a.txt").unwrap(),
            base.join("docs").join("a.txt")
        );
    }

    #[test]
    fn name_validation_rejects_separators_and_parents() {
        assert!(validate_name("notes.txt").is_ok());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn relative_display_uses_forward_slashes() {
        let base = Path::new("/srv/uploads");
        let path = base.join("docs").join("a.txt");
        assert_eq!(relative_display(base, &path), "docs/a.txt");
    }
}
