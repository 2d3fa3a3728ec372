use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser};

use lsr::{Cause, ExitStatus};

const PROGRAM: &str = "lsr";

#[derive(Parser, Debug)]
#[command(name = PROGRAM, version, about = "List files")]
#[command(disable_help_flag = true)]
#[command(after_help = "\
Exit status (a bitmask):
  0   ok
  64  an error occurred (set with every code below)
  8   file not found
  16  permission denied
  32  other error
  4   user/group lookup failed")]
struct Cli {
    /// Don't ignore entries starting with '.'
    #[arg(short = 'a')]
    all: bool,

    /// Long listing format, shows symlink targets
    #[arg(short = 'l')]
    long: bool,

    /// List subdirectories recursively
    #[arg(short = 'R')]
    recursive: bool,

    /// Count entries only, don't show them
    #[arg(short = 'n')]
    count: bool,

    /// Human-readable sizes (1.5K, 3.0M) in the long format
    #[arg(short = 'h')]
    human: bool,

    /// One entry per line (always the case)
    #[arg(short = '1')]
    one_per_line: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Files or directories to list (default: .)
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = parse_lenient(std::env::args_os().collect());
    log::debug!("{cli:?}");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut diag = io::stderr().lock();

    let outcome = lsr::list()
        .paths(cli.paths)
        .show_hidden(cli.all)
        .long_format(cli.long)
        .recursive(cli.recursive)
        .count_only(cli.count)
        .human_readable(cli.human)
        .program_name(PROGRAM)
        .run(&mut out, &mut diag);

    match outcome {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            if let Err(w) = writeln!(diag, "{PROGRAM}: {e}") {
                log::warn!("cannot write diagnostic \"{e}\": {w}");
            }
            let mut status = ExitStatus::SUCCESS;
            status.record(Cause::Other);
            ExitCode::from(status.bits())
        }
    }
}

/// Parse `args`, reporting and dropping unrecognized flags instead of
/// aborting. Every other parse error (and `--help`/`--version`) exits.
fn parse_lenient(mut args: Vec<OsString>) -> Cli {
    loop {
        let err = match Cli::try_parse_from(&args) {
            Ok(cli) => return cli,
            Err(e) => e,
        };

        if err.kind() != ErrorKind::UnknownArgument {
            err.exit();
        }

        let flag = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(flag)) => flag.clone(),
            _ => err.exit(),
        };

        eprintln!("{PROGRAM}: unrecognized option '{flag}'");

        if !drop_flag(&mut args, &flag) {
            err.exit();
        }
    }
}

/// Remove `flag` from `args`: a whole argument (`--foo`, `--foo=bar`), or one
/// letter out of a short-flag cluster such as `-alz`.
fn drop_flag(args: &mut Vec<OsString>, flag: &str) -> bool {
    let with_value = format!("{flag}=");
    let is_flag = |a: &OsString| {
        a == flag || a.to_str().is_some_and(|s| s.starts_with(&with_value))
    };
    if let Some(pos) = args.iter().skip(1).position(is_flag) {
        args.remove(pos + 1);
        return true;
    }

    let letter = match flag.strip_prefix('-').map(|s| s.chars().collect::<Vec<_>>()) {
        Some(chars) if chars.len() == 1 && chars[0] != '-' => chars[0],
        _ => return false,
    };

    for arg in args.iter_mut().skip(1) {
        let Some(s) = arg.to_str() else { continue };
        if s.starts_with('-') && !s.starts_with("--") && s[1..].contains(letter) {
            let kept: String = std::iter::once('-')
                .chain(s[1..].chars().filter(|&c| c != letter))
                .collect();
            *arg = kept.into();
            return true;
        }
    }

    false
}
