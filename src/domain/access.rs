//! Permission evaluator
//!
//! Pure decisions over explicit arguments: who may see which identities, and
//! who may read or write a given record.

use super::user::{User, UserAccount, UserProfile};

/// Kind of access requested on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Safe, idempotent access.
    Read,
    /// Mutation of identity fields or the identity itself.
    Write,
    /// Mutation of a profile; staff may moderate any profile they can see.
    ProfileWrite,
}

/// The set of identities a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    OwnOnly(String),
}

impl Visibility {
    pub fn includes(&self, user_id: &str) -> bool {
        match self {
            Visibility::All => true,
            Visibility::OwnOnly(own) => own == user_id,
        }
    }
}

/// Records that belong to exactly one identity.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

impl Owned for User {
    fn owner_id(&self) -> &str {
        &self.id
    }
}

impl Owned for UserProfile {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for UserAccount {
    fn owner_id(&self) -> &str {
        &self.user.id
    }
}

/// Staff see every identity, everyone else only themselves.
pub fn visibility(caller: &User) -> Visibility {
    if caller.is_staff {
        Visibility::All
    } else {
        Visibility::OwnOnly(caller.id.clone())
    }
}

/// Reads follow visibility. Identity writes are reserved to the owner,
/// profile writes to the owner or staff.
pub fn can_access<T: Owned + ?Sized>(caller: &User, target: &T, operation: Operation) -> bool {
    match operation {
        Operation::Read => visibility(caller).includes(target.owner_id()),
        Operation::Write => caller.id == target.owner_id(),
        Operation::ProfileWrite => caller.is_staff || caller.id == target.owner_id(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(id: &str, is_staff: bool) -> User {
        User {
            id: id.to_string(),
            username: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_staff,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn owner_can_read_and_write_self() {
        let alice = user("alice", false);
        assert!(can_access(&alice, &alice, Operation::Read));
        assert!(can_access(&alice, &alice, Operation::Write));
    }

    #[test]
    fn non_staff_cannot_touch_others() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        assert!(!can_access(&alice, &bob, Operation::Read));
        assert!(!can_access(&alice, &bob, Operation::Write));
        assert!(!visibility(&alice).includes("bob"));
    }

    #[test]
    fn staff_reads_all_but_writes_only_own() {
        let admin = user("admin", true);
        let bob = user("bob", false);
        assert_eq!(visibility(&admin), Visibility::All);
        assert!(can_access(&admin, &bob, Operation::Read));
        assert!(!can_access(&admin, &bob, Operation::Write));
    }

    #[test]
    fn profile_owner_is_its_user() {
        let alice = user("alice", false);
        let profile = UserProfile::blank("alice", Utc::now());
        assert!(can_access(&alice, &profile, Operation::Write));

        let bob = user("bob", false);
        assert!(!can_access(&bob, &profile, Operation::Write));
    }

    #[test]
    fn staff_may_write_any_profile() {
        let admin = user("admin", true);
        let bob = user("bob", false);
        let profile = UserProfile::blank("alice", Utc::now());
        assert!(can_access(&admin, &profile, Operation::ProfileWrite));
        assert!(!can_access(&admin, &profile, Operation::Write));
        assert!(!can_access(&bob, &profile, Operation::ProfileWrite));

        let alice = user("alice", false);
        assert!(can_access(&alice, &profile, Operation::ProfileWrite));
    }
}
