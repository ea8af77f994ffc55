use std::path::{Path, PathBuf};

use crate::{error::Error, types::User};

/// Cached profile of the logged in user.
pub struct ProfileManager {
    user: User,
    path: PathBuf,
}

impl ProfileManager {
    /// Wraps a freshly fetched profile that should be stored at `path`.
    pub fn new(user: User, path: PathBuf) -> Self {
        Self { user, path }
    }

    /// Reads the cached profile.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error when nothing was cached yet, callers fall back
    /// to showing no name.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = async_fs::read_to_string(path).await?;
        let user: User = serde_json::from_str(&content)?;
        Ok(Self {
            user,
            path: path.to_path_buf(),
        })
    }

    /// Writes the profile as pretty JSON, creating the cache directory first.
    pub async fn persist(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.user)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the cached profile. Nothing cached is not an error.
    pub async fn clear(path: &Path) -> Result<(), Error> {
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
