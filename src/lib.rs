//! # lsr
//!
//! Directory listing engine: the walk, the per-entry metadata, the rendering,
//! and the exit-status bookkeeping behind an `ls`-style command.
//!
//! lsr does **not** parse command lines or exit the process. Callers hand it
//! targets and flags through [`ListBuilder`], give it two streams, and get an
//! [`Outcome`] back whose [`ExitStatus`] is a bitmask of everything that went
//! wrong.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::write(dir.path().join("a.txt"), "a").unwrap();
//! fs::create_dir(dir.path().join("sub")).unwrap();
//!
//! let mut out = Vec::new();
//! let mut diag = Vec::new();
//! let outcome = lsr::list()
//!     .path(dir.path())
//!     .count_only(true)
//!     .run(&mut out, &mut diag)
//!     .unwrap();
//!
//! assert_eq!(outcome.count, 2);
//! assert!(outcome.status.is_success());
//! assert_eq!(String::from_utf8(out).unwrap(), "2\n");
//! ```
//!
//! # Output
//!
//! Entries appear in directory-stream order; nothing is sorted. Bare mode
//! prints one name per line with `/` after directories. Long mode prints
//!
//! ```text
//! -rw-r--r-- 1 alice    staff        1536 Mar  1 14:02 a.txt
//! lrwxrwxrwx 1 alice    staff           5 Mar  1 14:02 link -> a.txt
//! ```
//!
//! Recursive mode lists a directory's own entries first, then each
//! subdirectory after a blank line and a `path:` header.
//!
//! # Exit status
//!
//! | value | meaning                          |
//! |-------|----------------------------------|
//! | 64    | an error occurred (always set)   |
//! | 8     | not found                        |
//! | 16    | permission denied                |
//! | 32    | other error                      |
//! | 4     | owner/group name lookup failed   |

#![forbid(unsafe_code)]

mod builder;
mod config;
mod driver;
mod entry;
mod error;
mod format;
mod resolve;
mod results;
mod status;
mod traits;
mod walk;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ListBuilder;
pub use config::{ListOptions, PathConfiguration};
pub use entry::{EntryKind, EntrySnapshot, Permissions, SymlinkTarget};
pub use error::{Cause, ListError};
pub use format::{format_date, human_size, EntryFormatter};
pub use resolve::MetadataResolver;
pub use results::Outcome;
pub use status::{ExitStatus, Tally};
pub use traits::{AccountLookup, SystemAccounts};
pub use walk::{DirectoryWalker, Output};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ListBuilder`] to configure and run a listing.
///
/// # Example
///
/// ```rust
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("notes.md"), "n").unwrap();
///
/// let mut out = Vec::new();
/// let mut diag = Vec::new();
/// lsr::list().path(dir.path()).run(&mut out, &mut diag).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), "notes.md\n");
/// ```
pub fn list() -> ListBuilder {
    ListBuilder::default()
}
