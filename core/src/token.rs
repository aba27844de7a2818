//! Where the bearer token lives.
//!
//! # Design
//! `ApiClient` never owns the token. It asks its `TokenSource` at build time,
//! on every authorization-requiring request, so a login or logout performed
//! elsewhere is seen by the very next call. `TokenStore` adds the write side,
//! used only by `Session`.
//!
//! `FileTokenStore` is the persistent variant: the token survives process
//! restarts and carries no expiry, the server alone decides when it stops
//! being valid. The logged-in user is kept next to the token so a restarted
//! session knows who it belongs to.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::types::User;

/// Read access to the current session token.
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

/// A token source the session can write to.
pub trait TokenStore: TokenSource {
    fn store(&self, token: &str) -> io::Result<()>;

    /// Forget the token and the remembered user.
    fn clear(&self) -> io::Result<()>;

    fn remember_user(&self, user: &User) -> io::Result<()>;
    fn remembered_user(&self) -> Option<User>;
}

/// A fixed token, or none.
impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn store(&self, token: &str) -> io::Result<()> {
        (**self).store(token)
    }

    fn clear(&self) -> io::Result<()> {
        (**self).clear()
    }

    fn remember_user(&self, user: &User) -> io::Result<()> {
        (**self).remember_user(user)
    }

    fn remembered_user(&self) -> Option<User> {
        (**self).remembered_user()
    }
}

#[derive(Debug, Default)]
struct Remembered {
    token: Option<String>,
    user: Option<User>,
}

/// In-process token shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<Remembered>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&Remembered) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut Remembered)) {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl TokenSource for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.read(|r| r.token.clone())
    }
}

impl TokenStore for MemoryTokenStore {
    fn store(&self, token: &str) -> io::Result<()> {
        self.write(|r| r.token = Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.write(|r| *r = Remembered::default());
        Ok(())
    }

    fn remember_user(&self, user: &User) -> io::Result<()> {
        self.write(|r| r.user = Some(user.clone()));
        Ok(())
    }

    fn remembered_user(&self) -> Option<User> {
        self.read(|r| r.user.clone())
    }
}

/// Token persisted as the sole content of a file.
///
/// A missing or empty file means "no token". Read errors other than
/// `NotFound` are logged and also treated as no token, so the request still
/// goes out and the server rejects it. The remembered user is JSON in
/// `<path>.user.json`, read with the same leniency.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".user.json");
        PathBuf::from(name)
    }

    fn read_optional(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session file");
                None
            }
        }
    }

    fn write_creating_dirs(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl TokenSource for FileTokenStore {
    fn token(&self) -> Option<String> {
        let contents = self.read_optional(&self.path)?;
        let token = contents.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

impl TokenStore for FileTokenStore {
    fn store(&self, token: &str) -> io::Result<()> {
        self.write_creating_dirs(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        remove_if_present(&self.path)?;
        remove_if_present(&self.user_path())
    }

    fn remember_user(&self, user: &User) -> io::Result<()> {
        let json = serde_json::to_string(user).map_err(io::Error::other)?;
        self.write_creating_dirs(&self.user_path(), &json)
    }

    fn remembered_user(&self) -> Option<User> {
        let path = self.user_path();
        let contents = self.read_optional(&path)?;
        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable remembered user");
                None
            }
        }
    }
}
