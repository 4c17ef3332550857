//! Query key definitions.

use std::fmt;

/// Identifies one cached read: operation name plus its canonical arguments.
///
/// Two calls with the same key share one cache entry and one refetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub endpoint: &'static str,
    pub args: String,
}

impl QueryKey {
    pub fn new(endpoint: &'static str, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality_uses_endpoint_and_args() {
        let a = QueryKey::new("learning_path.dashboard", "/learning-paths/p1/dashboard");
        let b = QueryKey::new("learning_path.dashboard", "/learning-paths/p1/dashboard");
        let c = QueryKey::new("learning_path.dashboard", "/learning-paths/p2/dashboard");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_is_readable() {
        let key = QueryKey::new("projects.get", "/projects/p1");
        assert_eq!(key.to_string(), "projects.get(/projects/p1)");
    }
}
