use crate::status::ExitStatus;

/// The output of a completed listing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Every failure of the run OR'd together. Zero when nothing failed.
    pub status: ExitStatus,

    /// Entries counted. Only meaningful when `count_only` was set; the driver
    /// has already printed it.
    pub count: usize,
}

impl Outcome {
    /// The process exit code for this run.
    pub fn exit_code(&self) -> u8 {
        self.status.bits()
    }
}
