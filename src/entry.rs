use std::fs::FileType;
use std::path::PathBuf;

/// The type tag of a listed entry, taken from `lstat` (links are not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Dir
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// The one-character type column of the long format.
    pub fn indicator(self) -> char {
        match self {
            Self::Dir     => 'd',
            Self::File    => '-',
            Self::Symlink => 'l',
            Self::Other   => '?',
        }
    }
}

/// The nine rwx bits, owner/group/other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(u32);

impl Permissions {
    pub fn from_mode(mode: u32) -> Self {
        Self(mode & 0o777)
    }

    /// Render as `rwxr-x---`.
    pub fn render(self) -> String {
        const CHARS: [char; 3] = ['r', 'w', 'x'];
        (0..9)
            .map(|i| {
                let mask = 0o400 >> i;
                if self.0 & mask != 0 { CHARS[i % 3] } else { '-' }
            })
            .collect()
    }
}

/// Where a symbolic link points, if the link could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymlinkTarget {
    Resolved(String),
    Unresolved,
}

/// Metadata for one entry at one point in time.
///
/// Built fresh by [`MetadataResolver`](crate::MetadataResolver) for every
/// listing call and consumed by the formatter. Never cached.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    /// Path the snapshot was taken from.
    pub path: PathBuf,

    pub kind: EntryKind,

    pub permissions: Permissions,

    /// Hard-link count.
    pub links: u64,

    pub uid: u32,
    pub gid: u32,

    /// `None` when the uid has no name; the formatter prints the number.
    pub owner: Option<String>,

    /// `None` when the gid has no name.
    pub group: Option<String>,

    /// Size in bytes.
    pub size: u64,

    /// Modification time, seconds since the Unix epoch.
    pub modified: i64,

    /// Only set for [`EntryKind::Symlink`].
    pub target: Option<SymlinkTarget>,
}

/// `.` and `..` never get a trailing separator and are never recursed into.
pub fn is_self_reference(name: &str) -> bool {
    name == "." || name == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_render_in_owner_group_other_order() {
        assert_eq!(Permissions::from_mode(0o755).render(), "rwxr-xr-x");
        assert_eq!(Permissions::from_mode(0o640).render(), "rw-r-----");
        assert_eq!(Permissions::from_mode(0o000).render(), "---------");
        // File type bits are masked off.
        assert_eq!(Permissions::from_mode(0o100_644).render(), "rw-r--r--");
    }

    #[test]
    fn indicators() {
        assert_eq!(EntryKind::Dir.indicator(), 'd');
        assert_eq!(EntryKind::File.indicator(), '-');
        assert_eq!(EntryKind::Symlink.indicator(), 'l');
        assert_eq!(EntryKind::Other.indicator(), '?');
    }

    #[test]
    fn self_references() {
        assert!(is_self_reference("."));
        assert!(is_self_reference(".."));
        assert!(!is_self_reference(".hidden"));
        assert!(!is_self_reference("..."));
    }
}
