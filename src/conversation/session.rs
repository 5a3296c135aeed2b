//! Per-user dialogue state
//!
//! A user with no entry (or an empty slot) in the map is idle. Each
//! `Session` variant carries exactly what its step needs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use crate::models::TransactionKind;

/// Chat/user identifier supplied by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who sent an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    /// Display identifier recorded as a transaction's author
    pub name: String,
}

impl Sender {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }
}

/// State of an active dialogue
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    /// Waiting for a category choice
    Category { kind: TransactionKind },
    /// Waiting for the name of a category to create
    NewCategory { kind: TransactionKind },
    /// Waiting for a subcategory choice
    Subcategory {
        kind: TransactionKind,
        category: String,
    },
    /// Waiting for the name of a subcategory to create
    NewSubcategory {
        kind: TransactionKind,
        category: String,
    },
    /// Waiting for the amount
    Amount {
        kind: TransactionKind,
        category: String,
        subcategory: String,
    },
    /// Waiting for the category to rename
    RenameOld,
    /// Waiting for the new name
    RenameNew { old_name: String },
    /// Waiting for the category to delete
    DeleteTarget,
}

/// Step names, for logs and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Category,
    NewCategory,
    Subcategory,
    NewSubcategory,
    Amount,
    RenameOld,
    RenameNew,
    DeleteTarget,
}

impl Session {
    pub fn step(&self) -> Step {
        match self {
            Self::Category { .. } => Step::Category,
            Self::NewCategory { .. } => Step::NewCategory,
            Self::Subcategory { .. } => Step::Subcategory,
            Self::NewSubcategory { .. } => Step::NewSubcategory,
            Self::Amount { .. } => Step::Amount,
            Self::RenameOld => Step::RenameOld,
            Self::RenameNew { .. } => Step::RenameNew,
            Self::DeleteTarget => Step::DeleteTarget,
        }
    }
}

type Slot = Arc<Mutex<Option<Session>>>;

/// Sessions keyed by user
///
/// The outer lock is held only long enough to find, create or remove a
/// user's slot. The slot's own lock serializes everything done for that
/// user, so different users never wait on each other. A user is idle
/// exactly when they have no entry; a slot left empty by an update is
/// removed.
#[derive(Default)]
pub struct SessionMap {
    slots: Mutex<HashMap<UserId, Slot>>,
}

/// Lock a mutex, taking the data even if a previous holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the user's session while holding their slot lock
    ///
    /// With `create` false an idle user is left alone and `None` is
    /// returned. Otherwise a slot is created on demand. If `f` leaves the
    /// session empty the entry is dropped from the map.
    pub fn update<R>(
        &self,
        user: UserId,
        create: bool,
        f: impl FnOnce(&mut Option<Session>) -> R,
    ) -> Option<R> {
        loop {
            let slot = if create {
                Arc::clone(lock(&self.slots).entry(user).or_default())
            } else {
                lock(&self.slots).get(&user).cloned()?
            };

            let mut current = lock(&slot);
            // The slot was removed while we waited for it
            if !self.is_live(user, &slot) {
                continue;
            }

            let result = f(&mut current);
            let emptied = current.is_none();
            drop(current);

            if emptied {
                self.release(user, &slot);
            }
            return Some(result);
        }
    }

    fn is_live(&self, user: UserId, slot: &Slot) -> bool {
        lock(&self.slots)
            .get(&user)
            .is_some_and(|live| Arc::ptr_eq(live, slot))
    }

    /// Remove the user's entry if it is still `slot` and still empty
    ///
    /// Never blocks on the slot while holding the map lock: a slot that is
    /// busy belongs to another update, which releases it itself.
    fn release(&self, user: UserId, slot: &Slot) {
        let mut slots = lock(&self.slots);
        if !slots.get(&user).is_some_and(|live| Arc::ptr_eq(live, slot)) {
            return;
        }

        let still_empty = match slot.try_lock() {
            Ok(current) => current.is_none(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
            Err(TryLockError::WouldBlock) => return,
        };
        if still_empty {
            slots.remove(&user);
        }
    }

    /// A copy of the user's current session, if any
    pub fn get(&self, user: UserId) -> Option<Session> {
        let slot = lock(&self.slots).get(&user).cloned()?;
        let session = lock(&slot).clone();
        session
    }

    /// Number of users with an entry in the map
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_map_is_idle() {
        let map = SessionMap::new();
        assert!(map.get(UserId(1)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_update_without_create_leaves_idle_user_alone() {
        let map = SessionMap::new();

        let touched = map.update(UserId(1), false, |_| unreachable!());
        assert!(touched.is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_entry_lives_only_while_session_active() {
        let map = SessionMap::new();

        map.update(UserId(1), true, |current| *current = Some(Session::RenameOld));
        assert_eq!(map.get(UserId(1)), Some(Session::RenameOld));
        assert!(map.get(UserId(2)).is_none());
        assert_eq!(map.len(), 1);

        let taken = map.update(UserId(1), false, |current| current.take());
        assert_eq!(taken, Some(Some(Session::RenameOld)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_create_that_sets_nothing_leaves_no_entry() {
        let map = SessionMap::new();

        map.update(UserId(1), true, |_| ());
        assert!(map.is_empty());
    }

    #[test]
    fn test_concurrent_updates_for_one_user_are_serialized() {
        let map = Arc::new(SessionMap::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for _ in 0..100 {
                        map.update(UserId(1), true, |current| {
                            *current = match current.take() {
                                None => Some(Session::RenameOld),
                                Some(_) => None,
                            };
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        // 800 toggles end where they started
        assert!(map.get(UserId(1)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_step_names() {
        let session = Session::Amount {
            kind: TransactionKind::Expense,
            category: "Food".into(),
            subcategory: "Cafe".into(),
        };
        assert_eq!(session.step(), Step::Amount);
        assert_eq!(Session::DeleteTarget.step(), Step::DeleteTarget);
    }
}
