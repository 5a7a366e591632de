use anyhow::{anyhow, Result};
use std::fmt;

/// A repository with an optional tag, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    repository: String,
    tag: String,
}

impl ImageReference {
    /// An empty `tag` means the bare repository is used for lookups.
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Result<Self> {
        let repository = repository.into();
        if repository.trim().is_empty() {
            return Err(anyhow!("Repository name must not be empty"));
        }

        Ok(Self {
            repository,
            tag: tag.into(),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        if self.tag.is_empty() {
            None
        } else {
            Some(&self.tag)
        }
    }
}

/// `repository` when the tag is empty, `repository:tag` otherwise.
impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "{}:{}", self.repository, tag),
            None => f.write_str(&self.repository),
        }
    }
}
