//! Path normalization shared by the client and the filesystem adapter.
//!
//! Remote paths are always relative to the storage zone root, use `/` as
//! the separator, and never carry leading or trailing slashes once
//! normalized.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Path is outside of the storage zone root: {0}")]
    OutsideRoot(String),
}

/// Normalize a relative path.
///
/// Backslashes become slashes, control characters are removed, empty and
/// `.` segments are dropped and `..` consumes the preceding segment.
pub fn normalize_path(path: &str) -> Result<String, PathError> {
    let cleaned: String = path
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '\\' { '/' } else { c })
        .collect();

    let mut parts: Vec<&str> = Vec::new();
    for part in cleaned.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(PathError::OutsideRoot(path.to_string()));
                }
            }
            other => parts.push(other),
        }
    }
    Ok(parts.join("/"))
}

/// Parent directory of a normalized path; empty for top-level names.
pub fn dirname(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// Percent-encode each segment of a path, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("").unwrap(), "");
        assert_eq!(normalize_path("/").unwrap(), "");
        assert_eq!(normalize_path("/a/b/").unwrap(), "a/b");
        assert_eq!(normalize_path("a//b/./c").unwrap(), "a/b/c");
        assert_eq!(normalize_path("a/b/../c").unwrap(), "a/c");
        assert_eq!(normalize_path(r"a\b\c.txt").unwrap(), "a/b/c.txt");
        assert_eq!(normalize_path("a/\u{7}b").unwrap(), "a/b");
    }

    #[test]
    fn test_normalize_path_outside_root() {
        assert_eq!(
            normalize_path("a/../../etc"),
            Err(PathError::OutsideRoot("a/../../etc".to_string()))
        );
        assert!(normalize_path("..").is_err());
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("a/b/c.txt"), "a/b");
        assert_eq!(dirname("c.txt"), "");
        assert_eq!(dirname(""), "");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("photos/summer 2023/a&b.jpg"), "photos/summer%202023/a%26b.jpg");
        assert_eq!(encode_path("dir/"), "dir/");
    }
}
