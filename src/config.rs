use std::path::PathBuf;

/// Flags that shape a listing. Immutable for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// List entries whose name starts with `.`, including `.` and `..`.
    pub show_hidden:    bool,

    /// One long-format line per entry instead of the bare name.
    pub long_format:    bool,

    /// Descend into every subdirectory after listing its parent.
    pub recursive:      bool,

    /// Count entries instead of printing them; only the total is written.
    pub count_only:     bool,

    /// Sizes as `1.5K` instead of exact bytes. Long format only.
    pub human_readable: bool,
}

/// Everything one run needs: the targets and the flags.
///
/// Built once by [`ListBuilder`](crate::ListBuilder) and borrowed, read-only,
/// by the driver and every recursive walk beneath it.
#[derive(Debug, Clone, Default)]
pub struct PathConfiguration {
    /// Targets in the order given. Empty means the current directory.
    pub paths:   Vec<PathBuf>,
    pub options: ListOptions,
}

impl PathConfiguration {
    /// The targets to list, substituting `.` for an empty list.
    pub fn targets(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_list_means_current_directory() {
        let config = PathConfiguration::default();
        assert_eq!(config.targets(), vec![PathBuf::from(".")]);
    }

    #[test]
    fn targets_keep_argument_order() {
        let config = PathConfiguration {
            paths:   vec!["b".into(), "a".into()],
            options: ListOptions::default(),
        };
        assert_eq!(config.targets(), vec![PathBuf::from("b"), PathBuf::from("a")]);
    }
}
