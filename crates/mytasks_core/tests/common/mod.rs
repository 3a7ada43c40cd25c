#![allow(dead_code)]

use mytasks_core::{RepoError, RepoResult, Task, TaskId, TaskRepository, User, UserRepository};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory user store that counts calls and can inject write failures.
///
/// Unlike the SQLite store it performs no admin check, so tests can observe
/// whether a decorator forwarded a call at all.
#[derive(Default)]
pub struct CountingUserStore {
    users: Mutex<BTreeMap<String, User>>,
    find_calls: AtomicUsize,
    find_all_calls: AtomicUsize,
    write_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    fail_writes: AtomicBool,
    fetch_delay: Option<Duration>,
}

impl CountingUserStore {
    pub fn with_users(users: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (name, password) in users {
            store.put_direct(user(name, password));
        }
        store
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Writes behind any decorator's back.
    pub fn put_direct(&self, user: User) {
        self.users
            .lock()
            .unwrap()
            .insert(user.name().to_string(), user);
    }

    pub fn get_direct(&self, name: &str) -> Option<User> {
        self.users.lock().unwrap().get(name).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> RepoResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::InvalidData("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl UserRepository for CountingUserStore {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            std::thread::sleep(delay);
        }
        Ok(self.get_direct(name))
    }

    fn add(&self, user: &User) -> RepoResult<()> {
        self.check_write()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(user.name()) {
            return Err(RepoError::Conflict(format!("user `{}` exists", user.name())));
        }
        users.insert(user.name().to_string(), user.clone());
        Ok(())
    }

    fn update(&self, user: &User) -> RepoResult<()> {
        self.check_write()?;
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user.name()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(RepoError::UserNotFound(user.name().to_string())),
        }
    }

    fn remove_by_name(&self, name: &str) -> RepoResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.users.lock().unwrap().remove(name);
        Ok(())
    }
}

/// In-memory task store keyed by owner.
#[derive(Default)]
pub struct MemoryTaskStore {
    by_owner: Mutex<BTreeMap<String, Vec<Task>>>,
    find_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl MemoryTaskStore {
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

impl TaskRepository for MemoryTaskStore {
    fn find_by_user_name(&self, user_name: &str) -> RepoResult<Vec<Task>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .by_owner
            .lock()
            .unwrap()
            .get(user_name)
            .cloned()
            .unwrap_or_default())
    }

    fn add(&self, user_name: &str, task: &Task) -> RepoResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.by_owner
            .lock()
            .unwrap()
            .entry(user_name.to_string())
            .or_default()
            .push(task.clone());
        Ok(())
    }

    fn update(&self, task: &Task) -> RepoResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut by_owner = self.by_owner.lock().unwrap();
        for tasks in by_owner.values_mut() {
            if let Some(existing) = tasks.iter_mut().find(|t| t.id() == task.id()) {
                *existing = task.clone();
                return Ok(());
            }
        }
        Err(RepoError::TaskNotFound(task.id()))
    }

    fn remove_by_id(&self, id: TaskId) -> RepoResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        for tasks in self.by_owner.lock().unwrap().values_mut() {
            tasks.retain(|t| t.id() != id);
        }
        Ok(())
    }
}

pub fn user(name: &str, password: &str) -> User {
    User::new(name, password).expect("valid test user")
}

pub fn task(title: &str) -> Task {
    Task::new(title).expect("valid test task")
}
