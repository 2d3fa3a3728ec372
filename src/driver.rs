use std::io::Write;

use crate::config::PathConfiguration;
use crate::entry::EntryKind;
use crate::error::ListError;
use crate::format::EntryFormatter;
use crate::resolve::MetadataResolver;
use crate::results::Outcome;
use crate::status::Tally;
use crate::traits::AccountLookup;
use crate::walk::{DirectoryWalker, Output};

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// List every target in `config`, in order.
///
/// Directories go to the [`DirectoryWalker`]; anything else is listed as a
/// single entry under the name it was given. A target that cannot be
/// `lstat`ed records a failure and is skipped. In count-only mode headers and
/// separators are still written, followed by the total.
///
/// Called by `ListBuilder::run()`.
pub(crate) fn run<'o>(
    config:  &PathConfiguration,
    lookup:  &dyn AccountLookup,
    program: &str,
    out:     &'o mut dyn Write,
    diag:    &'o mut dyn Write,
) -> Result<Outcome, ListError> {
    let options = &config.options;
    let formatter = EntryFormatter::new(options.human_readable);
    let walker = DirectoryWalker::new(options, MetadataResolver::new(lookup), &formatter, program);

    let targets = config.targets();
    let show_headers = targets.len() > 1 || options.recursive;

    let mut output = Output { out, diag };
    let mut tally = Tally::new();

    for (i, target) in targets.iter().enumerate() {
        log::debug!("target {}", target.display());

        let kind = match walker.resolver.kind(target) {
            Ok(k)  => k,
            Err(e) => {
                tally.fail(output.diag, program, &e);
                continue;
            }
        };

        if kind == EntryKind::Dir {
            if show_headers {
                writeln!(output.out, "{}:", target.display())?;
            }

            walker.walk(target, &mut output, &mut tally)?;

            if i + 1 < targets.len() {
                writeln!(output.out)?;
            }
        } else {
            let name = target.to_string_lossy();
            walker.list_entry(target, &name, &mut output, &mut tally)?;
        }
    }

    if options.count_only {
        writeln!(output.out, "{}", tally.count)?;
    }

    output.out.flush()?;

    Ok(Outcome {
        status: tally.status,
        count:  tally.count,
    })
}
