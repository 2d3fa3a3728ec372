use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::entry::{EntryKind, EntrySnapshot, Permissions, SymlinkTarget};
use crate::error::ListError;
use crate::traits::AccountLookup;

// ---------------------------------------------------------------------------
// MetadataResolver
// ---------------------------------------------------------------------------

/// Produces [`EntrySnapshot`]s with `lstat` semantics: the entry's own type
/// and permissions are reported, symlinks are never followed.
pub struct MetadataResolver<'a> {
    lookup: &'a dyn AccountLookup,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(lookup: &'a dyn AccountLookup) -> Self {
        Self { lookup }
    }

    /// Type of `path` without following a final symlink.
    ///
    /// The driver dispatches targets on this; no name lookups happen.
    pub fn kind(&self, path: &Path) -> Result<EntryKind, ListError> {
        let meta = fs::symlink_metadata(path).map_err(|e| ListError::access(path, e))?;
        Ok(EntryKind::from_file_type(meta.file_type()))
    }

    /// Full snapshot of `path` for the long format.
    ///
    /// Only a failed `lstat` is an error. Unknown owner/group ids leave the
    /// name fields empty and an unreadable link target becomes
    /// [`SymlinkTarget::Unresolved`].
    pub fn resolve(&self, path: &Path) -> Result<EntrySnapshot, ListError> {
        self.snapshot(path, true)
    }

    /// Snapshot of `path`. Without `details`, owner/group names and the link
    /// target are left empty and no lookups happen.
    pub fn snapshot(&self, path: &Path, details: bool) -> Result<EntrySnapshot, ListError> {
        let meta = fs::symlink_metadata(path).map_err(|e| ListError::access(path, e))?;
        let kind = EntryKind::from_file_type(meta.file_type());

        let target = (details && kind == EntryKind::Symlink).then(|| match fs::read_link(path) {
            Ok(t) => SymlinkTarget::Resolved(t.to_string_lossy().into_owned()),
            Err(e) => {
                log::warn!("cannot read link {}: {e}", path.display());
                SymlinkTarget::Unresolved
            }
        });

        let (owner, group) = if details {
            (self.lookup.user_name(meta.uid()), self.lookup.group_name(meta.gid()))
        } else {
            (None, None)
        };

        Ok(EntrySnapshot {
            path:        path.to_path_buf(),
            kind,
            permissions: Permissions::from_mode(meta.mode()),
            links:       meta.nlink(),
            uid:         meta.uid(),
            gid:         meta.gid(),
            owner,
            group,
            size:        meta.size(),
            modified:    meta.mtime(),
            target,
        })
    }
}

/// One [`ListError::NameLookup`] per id in `snap` that has no name.
pub fn name_lookup_errors(snap: &EntrySnapshot) -> Vec<ListError> {
    let mut errs = Vec::new();
    if snap.owner.is_none() {
        errs.push(ListError::NameLookup { path: snap.path.clone(), what: "owner", id: snap.uid });
    }
    if snap.group.is_none() {
        errs.push(ListError::NameLookup { path: snap.path.clone(), what: "group", id: snap.gid });
    }
    errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Cause;
    use std::os::unix::fs::symlink;

    struct Nameless;

    impl AccountLookup for Nameless {
        fn user_name(&self, _uid: u32) -> Option<String> { None }
        fn group_name(&self, _gid: u32) -> Option<String> { None }
    }

    struct Fixed;

    impl AccountLookup for Fixed {
        fn user_name(&self, _uid: u32) -> Option<String> { Some("alice".into()) }
        fn group_name(&self, _gid: u32) -> Option<String> { Some("staff".into()) }
    }

    #[test]
    fn resolves_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, vec![0u8; 1536]).unwrap();

        let snap = MetadataResolver::new(&Fixed).resolve(&path).unwrap();
        assert_eq!(snap.kind, EntryKind::File);
        assert_eq!(snap.size, 1536);
        assert_eq!(snap.links, 1);
        assert_eq!(snap.owner.as_deref(), Some("alice"));
        assert_eq!(snap.group.as_deref(), Some("staff"));
        assert!(snap.target.is_none());
        assert!(name_lookup_errors(&snap).is_empty());
    }

    #[test]
    fn symlink_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let link = dir.path().join("link");
        symlink("sub", &link).unwrap();

        let resolver = MetadataResolver::new(&Fixed);
        assert_eq!(resolver.kind(&link).unwrap(), EntryKind::Symlink);

        let snap = resolver.resolve(&link).unwrap();
        assert_eq!(snap.kind, EntryKind::Symlink);
        assert_eq!(snap.target, Some(SymlinkTarget::Resolved("sub".into())));
    }

    #[test]
    fn dangling_symlink_still_has_target() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink("nowhere", &link).unwrap();

        let snap = MetadataResolver::new(&Fixed).resolve(&link).unwrap();
        assert_eq!(snap.target, Some(SymlinkTarget::Resolved("nowhere".into())));
    }

    #[test]
    fn snapshot_without_details_skips_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        symlink("elsewhere", &link).unwrap();

        let snap = MetadataResolver::new(&Fixed).snapshot(&link, false).unwrap();
        assert_eq!(snap.kind, EntryKind::Symlink);
        assert!(snap.owner.is_none());
        assert!(snap.target.is_none());
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetadataResolver::new(&Fixed)
            .resolve(&dir.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.cause(), Cause::NotFound);
    }

    #[test]
    fn unknown_names_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, "x").unwrap();

        let snap = MetadataResolver::new(&Nameless).resolve(&path).unwrap();
        assert!(snap.owner.is_none());
        assert!(snap.group.is_none());

        let errs = name_lookup_errors(&snap);
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.cause() == Cause::NameLookup));
    }
}
