//! Read-through / write-through cache in front of a user store.
//!
//! # Responsibility
//! - Serve name lookups with at most one backing fetch per name, even when
//!   several callers miss at the same time.
//! - Keep every write durable first and mirror it into the cache only after
//!   the backing store acknowledged it.
//!
//! # Invariants
//! - Cache contents are a subset of the backing store contents, apart from
//!   the in-flight window described below.
//! - A failed backing write leaves the cache untouched.
//! - Misses are not cached: a name that resolved to "absent" is fetched
//!   again on the next lookup.
//! - `find_all` always reads the backing store and neither populates nor
//!   invalidates the cache, so list and point lookups may disagree.
//! - The administrative account is refused by `remove_by_name` before the
//!   backing store is touched.
//!
//! # Concurrency
//! Each name maps to a shared slot (`OnceCell`). The map shard lock is held
//! only to find or create the slot; the backing fetch runs inside
//! `OnceCell::get_or_try_init`, which lets exactly one caller initialise the
//! slot while the others for that name wait. Lookups for different names
//! never wait on each other's fetch.
//!
//! Writes to one name are serialised by a per-name write lock held across
//! the durable write and the matching cache install or eviction, so the
//! cache always ends in the state of the last committed write. Writes to
//! different names take different locks. Write locks are kept for the
//! lifetime of the decorator.
//!
//! Writes install a fresh, already initialised slot. A reader that was
//! already initialising the previous slot may still return the value it
//! fetched before the write committed; every later lookup observes the new
//! slot. There is no invalidation broadcast beyond that.

use crate::model::user::User;
use crate::repo::user_repo::{ensure_removable, UserRepository};
use crate::repo::{RepoError, RepoResult};
use dashmap::DashMap;
use log::{debug, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

type Slot = Arc<OnceCell<User>>;

/// Why a slot could not be initialised.
enum Miss {
    Absent,
    Store(RepoError),
}

/// Caching decorator over any [`UserRepository`].
pub struct CachedUserRepository<R: UserRepository> {
    inner: R,
    slots: DashMap<String, Slot>,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<R: UserRepository> CachedUserRepository<R> {
    /// Wraps `inner` with an initially empty cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            slots: DashMap::new(),
            write_locks: DashMap::new(),
        }
    }

    /// Backing store, bypassing the cache.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of names with a resolved cache entry.
    pub fn cached_len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Whether `name` currently has a resolved cache entry.
    pub fn is_cached(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    fn slot(&self, name: &str) -> Slot {
        if let Some(existing) = self.slots.get(name) {
            return Arc::clone(existing.value());
        }

        Arc::clone(
            self.slots
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        )
    }

    /// Drops `slot` from the map if it is still the registered, unresolved one.
    fn detach(&self, name: &str, slot: &Slot) {
        self.slots.remove_if(name, |_, current| {
            Arc::ptr_eq(current, slot) && current.get().is_none()
        });
    }

    fn write_lock(&self, name: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.write_locks.get(name) {
            return Arc::clone(existing.value());
        }

        Arc::clone(
            self.write_locks
                .entry(name.to_string())
                .or_default()
                .value(),
        )
    }

    fn install(&self, user: &User) {
        self.slots.insert(
            user.name().to_string(),
            Arc::new(OnceCell::with_value(user.clone())),
        );
    }
}

impl<R: UserRepository> UserRepository for CachedUserRepository<R> {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.inner.find_all()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let slot = self.slot(name);
        if let Some(user) = slot.get() {
            debug!("event=user_lookup module=cache status=hit");
            return Ok(Some(user.clone()));
        }

        let resolved = slot.get_or_try_init(|| {
            debug!("event=user_lookup module=cache status=miss");
            match self.inner.find_by_name(name) {
                Ok(Some(user)) => Ok(user),
                Ok(None) => Err(Miss::Absent),
                Err(err) => Err(Miss::Store(err)),
            }
        });

        match resolved {
            Ok(user) => Ok(Some(user.clone())),
            Err(miss) => {
                self.detach(name, &slot);
                match miss {
                    Miss::Absent => Ok(None),
                    Miss::Store(err) => Err(err),
                }
            }
        }
    }

    fn add(&self, user: &User) -> RepoResult<()> {
        let lock = self.write_lock(user.name());
        let _guard = lock.lock();
        self.inner.add(user)?;
        self.install(user);
        info!("event=user_add module=cache status=ok");
        Ok(())
    }

    fn update(&self, user: &User) -> RepoResult<()> {
        let lock = self.write_lock(user.name());
        let _guard = lock.lock();
        self.inner.update(user)?;
        self.install(user);
        info!("event=user_update module=cache status=ok");
        Ok(())
    }

    fn remove_by_name(&self, name: &str) -> RepoResult<()> {
        ensure_removable(name)?;

        let lock = self.write_lock(name);
        let _guard = lock.lock();
        self.inner.remove_by_name(name)?;
        self.slots.remove(name);
        info!("event=user_remove module=cache status=ok");
        Ok(())
    }
}
