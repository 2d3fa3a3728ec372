use nix::unistd::{Gid, Group, Uid, User};

/// Maps numeric owner and group ids to names for the long format.
///
/// Returning `None` is not an error for the listing: the formatter falls back
/// to the numeric id and the run records a name-lookup failure.
///
/// The default implementation is [`SystemAccounts`]. Supply your own through
/// [`ListBuilder::account_lookup`](crate::ListBuilder::account_lookup) to list
/// against a different user database, or to exercise lookup failures in tests.
///
/// # Example
///
/// ```rust
/// use lsr::AccountLookup;
///
/// struct Numeric;
///
/// impl AccountLookup for Numeric {
///     fn user_name(&self, _uid: u32) -> Option<String> { None }
///     fn group_name(&self, _gid: u32) -> Option<String> { None }
/// }
/// ```
pub trait AccountLookup {
    /// Name for `uid`, or `None` if the id is unknown.
    fn user_name(&self, uid: u32) -> Option<String>;

    /// Name for `gid`, or `None` if the id is unknown.
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Looks ids up in the system user and group databases (`getpwuid_r`,
/// `getgrgid_r`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccounts;

impl AccountLookup for SystemAccounts {
    fn user_name(&self, uid: u32) -> Option<String> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(user) => user.map(|u| u.name),
            Err(e) => {
                log::warn!("user lookup for uid {uid} failed: {e}");
                None
            }
        }
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        match Group::from_gid(Gid::from_raw(gid)) {
            Ok(group) => group.map(|g| g.name),
            Err(e) => {
                log::warn!("group lookup for gid {gid} failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_uid_resolves() {
        // uid 0 exists in every user database we run on.
        assert_eq!(SystemAccounts.user_name(0).as_deref(), Some("root"));
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        assert_eq!(SystemAccounts.user_name(3_999_999_000), None);
        assert_eq!(SystemAccounts.group_name(3_999_999_000), None);
    }
}
