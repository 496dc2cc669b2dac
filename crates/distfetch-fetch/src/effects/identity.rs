use nix::unistd::{Group, getegid, geteuid, getgroups};

const PORTAGE_GROUP: &str = "portage";

/// Privilege of the running process, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityLevel {
    Unprivileged,
    PortageGroup,
    Superuser,
}

/// Source of the current process's security level.
pub trait ProcessIdentity: Send + Sync {
    fn security_level(&self) -> SecurityLevel;
}

/// A fixed level, for callers that already know it.
impl ProcessIdentity for SecurityLevel {
    fn security_level(&self) -> SecurityLevel { *self }
}

/// Reads the effective uid and group membership of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl ProcessIdentity for SystemIdentity {
    fn security_level(&self) -> SecurityLevel {
        if geteuid().is_root() {
            return SecurityLevel::Superuser;
        }

        let Ok(Some(group)) = Group::from_name(PORTAGE_GROUP) else {
            return SecurityLevel::Unprivileged;
        };
        let in_group = getegid() == group.gid
            || getgroups().is_ok_and(|groups| groups.contains(&group.gid));
        if in_group {
            SecurityLevel::PortageGroup
        } else {
            SecurityLevel::Unprivileged
        }
    }
}
