/// A path segment silently prepended to every adapter path, scoping the
/// adapter to a subtree of the storage zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefix(String);

impl PathPrefix {
    pub fn new(prefix: &str) -> Self {
        Self(prefix.trim_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scope `path` under the prefix. Paths already under the prefix, or
    /// equal to it, are returned unchanged.
    pub fn prepend(&self, path: &str) -> String {
        if self.0.is_empty() || path == self.0 || self.strip(path).is_some() {
            return path.to_string();
        }
        format!("{}/{}", self.0, path)
    }

    /// Scope a path taken from a listing, which is always relative to the
    /// prefix root. Unlike [`PathPrefix::prepend`] this always adds the
    /// prefix, even when `path` itself begins with the prefix name.
    pub fn join(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.0.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", self.0, path)
    }

    /// Inverse of [`PathPrefix::prepend`]: strips `prefix/` from the start of
    /// `path`, if present.
    pub fn remove<'a>(&self, path: &'a str) -> &'a str {
        if self.0.is_empty() {
            return path;
        }
        self.strip(path).unwrap_or(path)
    }

    fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.0.as_str())?.strip_prefix('/')
    }
}
