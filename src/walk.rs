use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::ListOptions;
use crate::entry::{is_self_reference, EntryKind};
use crate::error::ListError;
use crate::format::EntryFormatter;
use crate::resolve::{name_lookup_errors, MetadataResolver};
use crate::status::Tally;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Where a run writes: listing lines to `out`, diagnostics to `diag`.
pub struct Output<'o> {
    pub out:  &'o mut dyn Write,
    pub diag: &'o mut dyn Write,
}

// ---------------------------------------------------------------------------
// DirectoryWalker
// ---------------------------------------------------------------------------

/// Lists one directory, then (when recursive) each of its subdirectories.
///
/// Holds only borrowed, read-only state. Everything mutable lives in the
/// [`Tally`] the caller threads through.
pub struct DirectoryWalker<'a> {
    pub(crate) options:   &'a ListOptions,
    pub(crate) resolver:  MetadataResolver<'a>,
    pub(crate) formatter: &'a EntryFormatter,
    pub(crate) program:   &'a str,
}

/// A direct child of the directory being walked.
struct Child {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(
        options:   &'a ListOptions,
        resolver:  MetadataResolver<'a>,
        formatter: &'a EntryFormatter,
        program:   &'a str,
    ) -> Self {
        Self { options, resolver, formatter, program }
    }

    /// List `dir` and, if recursive, every subdirectory below it.
    ///
    /// A directory that cannot be opened records one failure and produces no
    /// lines. Per-entry failures are recorded and the walk moves on. Only a
    /// failed write to `output.out` is returned as an error.
    pub fn walk(
        &self,
        dir:    &Path,
        output: &mut Output<'_>,
        tally:  &mut Tally,
    ) -> Result<(), ListError> {
        log::debug!("walking {}", dir.display());

        let children = match read_children(dir) {
            Ok(c)  => c,
            Err(e) => {
                tally.fail(output.diag, self.program, &e);
                return Ok(());
            }
        };

        if self.options.show_hidden {
            for name in [".", ".."] {
                self.list_entry(&dir.join(name), name, output, tally)?;
            }
        }

        // Descent waits until every direct entry has been printed.
        let mut subdirs: Vec<PathBuf> = Vec::new();

        for child in children {
            let child = match child {
                Ok(c)  => c,
                Err(e) => {
                    tally.fail(output.diag, self.program, &e);
                    continue;
                }
            };

            if !self.options.show_hidden && child.name.starts_with('.') {
                continue;
            }

            self.list_entry(&child.path, &child.name, output, tally)?;

            if self.options.recursive
                && child.kind == EntryKind::Dir
                && !is_self_reference(&child.name)
            {
                subdirs.push(child.path);
            }
        }

        for sub in subdirs {
            writeln!(output.out)?;
            writeln!(output.out, "{}:", sub.display())?;
            self.walk(&sub, output, tally)?;
        }

        Ok(())
    }

    /// Count or print a single entry found at `path`, shown as `name`.
    pub fn list_entry(
        &self,
        path:   &Path,
        name:   &str,
        output: &mut Output<'_>,
        tally:  &mut Tally,
    ) -> Result<(), ListError> {
        if self.options.count_only {
            tally.count += 1;
            return Ok(());
        }

        let long = self.options.long_format;
        let snap = match self.resolver.snapshot(path, long) {
            Ok(snap) => snap,
            Err(e)   => {
                tally.fail(output.diag, self.program, &e);
                return Ok(());
            }
        };

        if long {
            for e in name_lookup_errors(&snap) {
                tally.fail(output.diag, self.program, &e);
            }
        }

        let line = self.formatter.format(&snap, name, long);
        writeln!(output.out, "{line}")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory enumeration
// ---------------------------------------------------------------------------

/// Drain `dir`'s entries in the order the directory stream yields them.
///
/// The handle is closed before this returns. An error opening `dir` itself
/// is returned as `Err`; errors on individual entries are kept in place.
fn read_children(dir: &Path) -> Result<Vec<Result<Child, ListError>>, ListError> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .build();

    let mut children = Vec::new();

    for res in walker {
        let entry = match res {
            Ok(e) => e,
            Err(e) => {
                let failure = flatten(e, None, None);
                let at_root = failure.depth == Some(0)
                    || failure.path.as_deref().map_or(true, |p| p == dir);
                if at_root {
                    return Err(ListError::open_dir(dir, failure.source));
                }
                let path = failure.path.unwrap_or_else(|| dir.to_path_buf());
                children.push(Err(ListError::access(path, failure.source)));
                continue;
            }
        };

        // The walk yields the directory itself first.
        if entry.depth() == 0 {
            continue;
        }

        let kind = entry
            .file_type()
            .map(EntryKind::from_file_type)
            .unwrap_or(EntryKind::Other);

        children.push(Ok(Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
            kind,
        }));
    }

    Ok(children)
}

// ---------------------------------------------------------------------------
// Map ignore::Error to an io::Error plus where it happened
// ---------------------------------------------------------------------------

struct WalkFailure {
    depth:  Option<usize>,
    path:   Option<PathBuf>,
    source: io::Error,
}

fn flatten(e: ignore::Error, depth: Option<usize>, path: Option<PathBuf>) -> WalkFailure {
    match e {
        ignore::Error::WithDepth { depth, err }   => flatten(*err, Some(depth), path),
        ignore::Error::WithPath { path, err }     => flatten(*err, depth, Some(path)),
        ignore::Error::WithLineNumber { err, .. } => flatten(*err, depth, path),
        ignore::Error::Io(source)                 => WalkFailure { depth, path, source: os_error(source) },
        other => WalkFailure {
            depth,
            path,
            source: io::Error::other(other.to_string()),
        },
    }
}

/// `ignore` wraps the `walkdir::Error` inside its `io::Error`, which hides
/// the errno. Recover the OS error so diagnostics carry the plain system text.
fn os_error(source: io::Error) -> io::Error {
    let code = source
        .get_ref()
        .and_then(|e| e.downcast_ref::<walkdir::Error>())
        .and_then(walkdir::Error::io_error)
        .and_then(io::Error::raw_os_error);

    match code {
        Some(code) => io::Error::from_raw_os_error(code),
        None       => source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn children_come_back_without_the_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.txt"), "d").unwrap();

        let children = read_children(dir.path()).unwrap();
        let mut names: Vec<(String, EntryKind)> = children
            .into_iter()
            .map(|c| c.map(|c| (c.name, c.kind)).unwrap())
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            names,
            vec![("a.txt".to_string(), EntryKind::File), ("sub".to_string(), EntryKind::Dir)]
        );
    }

    #[test]
    fn missing_directory_is_an_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_children(&dir.path().join("absent")).err().unwrap();
        assert!(matches!(err, ListError::OpenDir { .. }));
        assert_eq!(err.cause(), crate::error::Cause::NotFound);
        assert_eq!(
            err.to_string(),
            format!(
                "cannot open directory {}: No such file or directory",
                dir.path().join("absent").display()
            )
        );
    }

    #[test]
    fn wrapped_walkdir_error_yields_errno() {
        let dir = tempfile::tempdir().unwrap();
        let walk_err = walkdir::WalkDir::new(dir.path().join("absent"))
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();
        let wrapped = io::Error::from(walk_err);
        assert_eq!(wrapped.raw_os_error(), None);

        let plain = os_error(wrapped);
        assert_eq!(plain.raw_os_error(), Some(nix::libc::ENOENT));
    }

    #[test]
    fn hidden_names_are_not_filtered_here() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();

        let children = read_children(dir.path()).unwrap();
        assert_eq!(children.len(), 1);
    }
}
