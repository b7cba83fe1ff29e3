//! Active-configuration link.
//!
//! The proxy reads its configuration through a symlink. Each member has a
//! pre-built configuration file `<config_dir>/<name>.<ext>`; failing over
//! means pointing the symlink at the new primary's file.

use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ProxyConfig;

/// Errors touching the link or the artifact directory.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("configuration for {name} not found at {}: {source}", .path.display())]
    MissingArtifact {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists and is not a symlink; refusing to replace it", .0.display())]
    NotALink(PathBuf),

    #[error("failed to remove old symlink {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to link {} to {}: {source}", .link.display(), .target.display())]
    Create {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The symlink selecting the proxy's active configuration.
#[derive(Debug, Clone)]
pub struct ConfigLink {
    link: PathBuf,
    dir: PathBuf,
    extension: String,
}

impl ConfigLink {
    /// A relative `dir` is resolved against the current directory now;
    /// symlink targets are otherwise read relative to the link's own
    /// directory.
    pub fn new(link: impl Into<PathBuf>, dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        Self {
            link: link.into(),
            dir,
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(&config.config_link, &config.config_dir, &config.artifact_extension)
    }

    pub fn path(&self) -> &Path {
        &self.link
    }

    /// Pre-built configuration file for `name`.
    pub fn artifact_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{}.{}", name, self.extension))
        }
    }

    /// Check that every member has its configuration file.
    pub fn verify_artifacts<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<(), LinkError> {
        for name in names {
            let path = self.artifact_for(name);
            if let Err(source) = fs::metadata(&path) {
                return Err(LinkError::MissingArtifact {
                    name: name.to_string(),
                    path,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Point the link at `name`'s configuration.
    ///
    /// The old link is removed before the new one is created, so a crash in
    /// between leaves no link at all. An already-missing link is not an
    /// error: it is the state such a crash leaves behind.
    pub fn repoint(&self, name: &str) -> Result<(), LinkError> {
        match fs::symlink_metadata(&self.link) {
            Ok(meta) if !meta.file_type().is_symlink() => {
                return Err(LinkError::NotALink(self.link.clone()));
            }
            Ok(_) => fs::remove_file(&self.link).map_err(|source| LinkError::Remove {
                path: self.link.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(link = %self.link.display(), "Active configuration link was missing");
            }
            Err(source) => {
                return Err(LinkError::Remove {
                    path: self.link.clone(),
                    source,
                })
            }
        }

        let target = self.artifact_for(name);
        symlink(&target, &self.link).map_err(|source| LinkError::Create {
            link: self.link.clone(),
            target: target.clone(),
            source,
        })?;

        tracing::debug!(link = %self.link.display(), target = %target.display(), "Symlink updated");
        Ok(())
    }

    /// Fails with [`LinkError::NotALink`] when a regular file sits at the
    /// link path, which [`ConfigLink::repoint`] would refuse to replace.
    pub fn check_replaceable(&self) -> Result<(), LinkError> {
        match fs::symlink_metadata(&self.link) {
            Ok(meta) if !meta.file_type().is_symlink() => Err(LinkError::NotALink(self.link.clone())),
            _ => Ok(()),
        }
    }

    /// Where the link currently points, or `None` if it does not exist.
    pub fn current_target(&self) -> io::Result<Option<PathBuf>> {
        match fs::read_link(&self.link) {
            Ok(target) => Ok(Some(target)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
