use std::fmt;
use std::io::Write;

use crate::error::{Cause, ListError};

/// Accumulated exit status. Bits are OR'd in and never cleared.
///
/// Callers must treat the value as a bitmask: a run that hits a missing path
/// and an unreadable directory exits with `64 | 8 | 16 = 88`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitStatus(u8);

impl ExitStatus {
    pub const SUCCESS:           Self = Self(0);
    /// Set alongside every specific cause.
    pub const ERROR:             Self = Self(1 << 6);
    pub const NOT_FOUND:         Self = Self(1 << 3);
    pub const PERMISSION_DENIED: Self = Self(1 << 4);
    pub const OTHER:             Self = Self(1 << 5);
    /// Owner or group id could not be mapped to a name.
    pub const NAME_LOOKUP:       Self = Self(1 << 2);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the general error bit plus the bit for `cause`.
    pub fn record(&mut self, cause: Cause) {
        let specific = match cause {
            Cause::NotFound         => Self::NOT_FOUND,
            Cause::PermissionDenied => Self::PERMISSION_DENIED,
            Cause::Other            => Self::OTHER,
            Cause::NameLookup       => Self::NAME_LOOKUP,
        };
        self.0 |= Self::ERROR.0 | specific.0;
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        i32::from(status.0)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable state threaded through one run: the exit status and the
/// count-only entry counter.
#[derive(Debug, Default)]
pub struct Tally {
    pub status: ExitStatus,
    pub count:  usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one diagnostic line for `err` and fold its cause into the status.
    /// A diagnostic that cannot be written is logged instead.
    pub fn fail(&mut self, diag: &mut dyn Write, program: &str, err: &ListError) {
        if let Some(path) = err.path() {
            log::debug!("{:?} failure at {}", err.cause(), path.display());
        }
        if let Err(e) = writeln!(diag, "{program}: {err}") {
            log::warn!("cannot write diagnostic \"{err}\": {e}");
        }
        self.status.record(err.cause());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_cause_sets_general_bit() {
        for cause in [Cause::NotFound, Cause::PermissionDenied, Cause::Other, Cause::NameLookup] {
            let mut status = ExitStatus::SUCCESS;
            status.record(cause);
            assert!(status.contains(ExitStatus::ERROR), "{cause:?}");
        }
    }

    #[test]
    fn causes_accumulate_and_never_clear() {
        let mut status = ExitStatus::default();
        status.record(Cause::NotFound);
        status.record(Cause::PermissionDenied);
        status.record(Cause::NotFound);
        assert_eq!(status.bits(), 64 | 8 | 16);
        assert!(!status.contains(ExitStatus::OTHER));
    }

    #[test]
    fn name_lookup_does_not_alias_other() {
        let mut status = ExitStatus::default();
        status.record(Cause::NameLookup);
        assert_eq!(status.bits(), 64 | 4);
        assert!(!status.contains(ExitStatus::OTHER));
        assert!(!status.contains(ExitStatus::PERMISSION_DENIED));
    }

    #[test]
    fn fail_writes_one_diagnostic_line() {
        let mut tally = Tally::new();
        let mut diag = Vec::new();
        let err = ListError::access("gone", std::io::Error::from_raw_os_error(nix::libc::ENOENT));
        tally.fail(&mut diag, "lsr", &err);
        assert_eq!(
            String::from_utf8(diag).unwrap(),
            "lsr: cannot access gone: No such file or directory\n"
        );
        assert_eq!(i32::from(tally.status), 72);
    }

    #[test]
    fn unwritable_diagnostic_still_records_status() {
        let mut tally = Tally::new();
        let err = ListError::access("gone", std::io::Error::from_raw_os_error(nix::libc::EACCES));
        tally.fail(&mut Closed, "lsr", &err);
        assert!(tally.status.contains(ExitStatus::PERMISSION_DENIED));
        assert!(tally.status.contains(ExitStatus::ERROR));
    }
}
