use std::fmt;

use chrono::{Local, TimeZone, Utc};

use crate::entry::{is_self_reference, EntryKind, EntrySnapshot, SymlinkTarget};

/// Average Gregorian year. Older modification times show the year instead of
/// the clock time.
pub const ONE_YEAR_SECS: i64 = 31_556_952;

const UNITS: [char; 7] = ['B', 'K', 'M', 'G', 'T', 'P', 'E'];

// ---------------------------------------------------------------------------
// EntryFormatter
// ---------------------------------------------------------------------------

/// Renders one entry as a bare or long-format line (without the newline).
///
/// `now` is fixed when the formatter is built, so every line of a run is
/// dated against the same instant.
pub struct EntryFormatter<Tz: TimeZone = Local> {
    human_readable: bool,
    now:            i64,
    tz:             Tz,
}

impl EntryFormatter<Local> {
    pub fn new(human_readable: bool) -> Self {
        Self::with_clock(human_readable, Utc::now().timestamp(), Local)
    }
}

impl<Tz: TimeZone> EntryFormatter<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// A formatter that dates entries against `now` in time zone `tz`.
    pub fn with_clock(human_readable: bool, now: i64, tz: Tz) -> Self {
        Self { human_readable, now, tz }
    }

    /// Bare or long rendering of `snap` under `name`.
    pub fn format(&self, snap: &EntrySnapshot, name: &str, long: bool) -> String {
        if long {
            self.long(snap, name)
        } else {
            bare(name, snap.kind)
        }
    }

    /// `drwxr-xr-x 2 alice    staff        4096 Mar  3 14:02 name/`
    pub fn long(&self, snap: &EntrySnapshot, name: &str) -> String {
        let owner = snap.owner.clone().unwrap_or_else(|| snap.uid.to_string());
        let group = snap.group.clone().unwrap_or_else(|| snap.gid.to_string());

        let size = if self.human_readable {
            format!("{:>5}", human_size(snap.size))
        } else {
            format!("{:>8}", snap.size)
        };

        let name = match &snap.target {
            Some(SymlinkTarget::Resolved(target)) => format!("{name} -> {target}"),
            Some(SymlinkTarget::Unresolved)       => format!("{name} -> ?"),
            None                                  => bare(name, snap.kind),
        };

        format!(
            "{}{} {} {:<8} {:<8} {} {} {}",
            snap.kind.indicator(),
            snap.permissions.render(),
            snap.links,
            owner,
            group,
            size,
            format_date(&self.tz, snap.modified, self.now),
            name,
        )
    }
}

/// `name`, plus `/` for directories other than `.` and `..`.
pub fn bare(name: &str, kind: EntryKind) -> String {
    if kind == EntryKind::Dir && !is_self_reference(name) {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

/// Divide by 1024 until the value fits the unit, capped at `E`.
///
/// Bytes print as an integer (`1023B`), larger units with one decimal (`1.5K`).
pub fn human_size(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{size}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// `Mar  3 14:02` for the past year, `Mar  3 2019` for older or future times.
pub fn format_date<Tz: TimeZone>(tz: &Tz, modified: i64, now: i64) -> String
where
    Tz::Offset: fmt::Display,
{
    let recent = modified <= now && now.saturating_sub(modified) < ONE_YEAR_SECS;
    let pattern = if recent { "%b %e %H:%M" } else { "%b %e %Y" };

    match tz.timestamp_opt(modified, 0).earliest() {
        Some(t) => t.format(pattern).to_string(),
        None    => modified.to_string(),
    }
}
