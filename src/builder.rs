use std::io::Write;
use std::path::PathBuf;

use crate::config::{ListOptions, PathConfiguration};
use crate::driver::run;
use crate::error::ListError;
use crate::results::Outcome;
use crate::traits::{AccountLookup, SystemAccounts};

// ---------------------------------------------------------------------------
// ListBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a listing.
///
/// Created via [`lsr::list()`](crate::list). Configure with chained builder
/// methods, then call [`run()`](ListBuilder::run) with the streams to write to.
///
/// # Example
///
/// ```rust,no_run
/// let mut out = Vec::new();
/// let mut diag = Vec::new();
///
/// let outcome = lsr::list()
///     .path("/tmp")
///     .long_format(true)
///     .human_readable(true)
///     .run(&mut out, &mut diag)?;
///
/// std::process::exit(outcome.exit_code().into());
/// # Ok::<(), lsr::ListError>(())
/// ```
pub struct ListBuilder {
    config:  PathConfiguration,
    lookup:  Box<dyn AccountLookup>,
    program: String,
}

impl Default for ListBuilder {
    fn default() -> Self {
        Self {
            config:  PathConfiguration::default(),
            lookup:  Box::new(SystemAccounts),
            program: "lsr".to_string(),
        }
    }
}

impl ListBuilder {
    // ── Targets ───────────────────────────────────────────────────────────

    /// Add one target. With no targets the current directory is listed.
    pub fn path(mut self, p: impl Into<PathBuf>) -> Self {
        self.config.paths.push(p.into());
        self
    }

    /// Add several targets, listed in the order given.
    pub fn paths<I, P>(mut self, ps: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.paths.extend(ps.into_iter().map(Into::into));
        self
    }

    // ── Flags ─────────────────────────────────────────────────────────────

    /// Include entries starting with `.`, and `.`/`..` themselves.
    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.config.options.show_hidden = yes;
        self
    }

    /// Type, permissions, links, owner, group, size, date and name per line.
    pub fn long_format(mut self, yes: bool) -> Self {
        self.config.options.long_format = yes;
        self
    }

    /// List every subdirectory after its parent, each under a `path:` header.
    pub fn recursive(mut self, yes: bool) -> Self {
        self.config.options.recursive = yes;
        self
    }

    /// Print only the number of entries that would have been listed.
    pub fn count_only(mut self, yes: bool) -> Self {
        self.config.options.count_only = yes;
        self
    }

    /// Show long-format sizes as `1.5K`, `3.0M`, ... instead of bytes.
    pub fn human_readable(mut self, yes: bool) -> Self {
        self.config.options.human_readable = yes;
        self
    }

    /// Replace all flags at once.
    pub fn options(mut self, options: ListOptions) -> Self {
        self.config.options = options;
        self
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    /// Resolve owner and group names with `lookup` instead of the system
    /// databases.
    pub fn account_lookup(mut self, lookup: impl AccountLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// Prefix for diagnostic lines. Defaults to `lsr`.
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program = name.into();
        self
    }

    /// The configuration `run()` will use.
    pub fn config(&self) -> &PathConfiguration {
        &self.config
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// List every target, writing lines to `out` and diagnostics to `diag`.
    ///
    /// Failures on individual paths never stop the run; they are written to
    /// `diag` and folded into [`Outcome::status`].
    ///
    /// # Errors
    ///
    /// Returns `Err` only when writing to `out` fails.
    pub fn run<'o>(
        self,
        out:  &'o mut dyn Write,
        diag: &'o mut dyn Write,
    ) -> Result<Outcome, ListError> {
        run(&self.config, self.lookup.as_ref(), &self.program, out, diag)
    }
}
