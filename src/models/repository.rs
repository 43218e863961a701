//! Repository identity.

use serde::{Deserialize, Serialize};

/// A source repository that a notification is about.
///
/// Hashable so settings services can key hook configuration on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    /// Project or namespace the repository belongs to
    pub project: String,
    /// Repository name within the project
    pub name: String,
}

impl Repository {
    /// Creates a new repository identity
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
        }
    }

    /// Qualified name used in log output
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.project, self.name)
    }
}
