use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    // Path access
    #[error("cannot access {}: {}", .path.display(), describe(.source))]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot access {}: {}", .path.display(), describe(.source))]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot access {}: {}", .path.display(), describe(.source))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Directory open
    #[error("cannot open directory {}: {}", .path.display(), describe(.source))]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Owner/group resolution
    #[error("cannot find {what} name for {} (id {id})", .path.display())]
    NameLookup {
        path: PathBuf,
        what: &'static str,
        id:   u32,
    },

    // Output stream
    #[error("write failed")]
    Output(#[from] io::Error),
}

/// What kind of failure a [`ListError`] represents, for exit-status bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    NotFound,
    PermissionDenied,
    Other,
    NameLookup,
}

impl ListError {
    /// Build a path-access error, classifying `source` by its errno.
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match classify(&source) {
            Cause::NotFound         => Self::NotFound { path, source },
            Cause::PermissionDenied => Self::PermissionDenied { path, source },
            _                       => Self::Io { path, source },
        }
    }

    /// Build a directory-open error. The cause still follows the errno.
    pub fn open_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OpenDir { path: path.into(), source }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::Io { path, .. }
            | Self::OpenDir { path, .. }
            | Self::NameLookup { path, .. } => Some(path),
            Self::Output(_) => None,
        }
    }

    pub fn cause(&self) -> Cause {
        match self {
            Self::NotFound { .. }          => Cause::NotFound,
            Self::PermissionDenied { .. }  => Cause::PermissionDenied,
            Self::Io { .. }                => Cause::Other,
            Self::OpenDir { source, .. }   => classify(source),
            Self::NameLookup { .. }        => Cause::NameLookup,
            Self::Output(_)                => Cause::Other,
        }
    }

    /// Whether the entry can still be rendered after this error.
    ///
    /// Name lookups fall back to the numeric id. Path errors abort the
    /// current item but not the run; output errors abort the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NameLookup { .. })
    }
}

/// Map an `io::Error` onto the not-found / permission-denied / other split.
pub fn classify(err: &io::Error) -> Cause {
    match err.kind() {
        io::ErrorKind::NotFound         => Cause::NotFound,
        io::ErrorKind::PermissionDenied => Cause::PermissionDenied,
        _ => match err.raw_os_error() {
            Some(code) if code == nix::libc::EPERM => Cause::PermissionDenied,
            _ => Cause::Other,
        },
    }
}

/// The `strerror` text for an OS error, or the error's own message otherwise.
fn describe(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => nix::errno::Errno::from_raw(code).desc().to_string(),
        None       => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(code: i32) -> io::Error {
        io::Error::from_raw_os_error(code)
    }

    #[test]
    fn classifies_by_errno() {
        assert_eq!(classify(&os(nix::libc::ENOENT)), Cause::NotFound);
        assert_eq!(classify(&os(nix::libc::EACCES)), Cause::PermissionDenied);
        assert_eq!(classify(&os(nix::libc::EPERM)), Cause::PermissionDenied);
        assert_eq!(classify(&os(nix::libc::EIO)), Cause::Other);
    }

    #[test]
    fn access_error_message_uses_strerror_text() {
        let err = ListError::access("missing.txt", os(nix::libc::ENOENT));
        assert_eq!(err.cause(), Cause::NotFound);
        assert_eq!(
            err.to_string(),
            "cannot access missing.txt: No such file or directory"
        );
    }

    #[test]
    fn open_dir_keeps_errno_cause() {
        let err = ListError::open_dir("locked", os(nix::libc::EACCES));
        assert_eq!(err.cause(), Cause::PermissionDenied);
        assert!(err.to_string().starts_with("cannot open directory locked: "));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn name_lookup_is_recoverable() {
        let err = ListError::NameLookup { path: "f".into(), what: "owner", id: 4242 };
        assert_eq!(err.cause(), Cause::NameLookup);
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(Path::new("f")));
    }
}
