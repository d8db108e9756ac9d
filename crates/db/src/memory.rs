//! In-process implementation of the gateway traits.
//!
//! Each [`MemoryRepository`] owns one table behind an async mutex. A
//! [`MemoryTx`] holds that lock for its whole lifetime, so transactions on
//! the same table are serialized, and keeps a snapshot taken at `begin`
//! which rollback (or drop) restores.
//!
//! Faults can be injected per operation to exercise the failure paths of
//! callers, and [`TxStats`] counts what the callers actually did.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use idm_core::types::{DbId, Timestamp};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::employee::{Employee, NewEmployee};
use crate::models::role::{NewRole, Role};
use crate::store::{Repository, Transaction};
use crate::DbError;

/// A row type the in-memory store can hold.
pub trait MemoryEntity: Clone + Send + Sync + 'static {
    type New: Send + Sync;

    /// Table name, used to name constraints in errors.
    const TABLE: &'static str;

    /// Request field and constraint of the row's foreign key, if any.
    const REFERENCE: Option<(&'static str, &'static str)> = None;

    fn id(&self) -> DbId;

    fn name(&self) -> &str;

    /// Build the stored row from an insert DTO.
    fn materialize(new: &Self::New, id: DbId, now: Timestamp) -> Self;
}

impl MemoryEntity for Role {
    type New = NewRole;

    const TABLE: &'static str = "role";

    fn id(&self) -> DbId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn materialize(new: &NewRole, id: DbId, now: Timestamp) -> Self {
        Role {
            id,
            name: new.name.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl MemoryEntity for Employee {
    type New = NewEmployee;

    const TABLE: &'static str = "employee";
    const REFERENCE: Option<(&'static str, &'static str)> =
        Some(("roleId", "employee_role_id_fkey"));

    fn id(&self) -> DbId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn materialize(new: &NewEmployee, id: DbId, now: Timestamp) -> Self {
        Employee {
            id,
            name: new.name.clone(),
            role_id: new.role_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Begin,
    ExistsCheck,
    /// The existence check reports no match even when the name is stored,
    /// as when a concurrent writer inserted it after the check ran.
    StaleExistsCheck,
    Insert,
    /// Inserts fail as if the referenced row did not exist. Only affects
    /// entities with a foreign key.
    MissingReference,
    Commit,
    Read,
    Delete,
}

#[derive(Debug, Default)]
struct FaultPlan {
    begin: AtomicBool,
    exists_check: AtomicBool,
    stale_exists_check: AtomicBool,
    insert: AtomicBool,
    missing_reference: AtomicBool,
    commit: AtomicBool,
    read: AtomicBool,
    delete: AtomicBool,
}

impl FaultPlan {
    fn flag(&self, fault: Fault) -> &AtomicBool {
        match fault {
            Fault::Begin => &self.begin,
            Fault::ExistsCheck => &self.exists_check,
            Fault::StaleExistsCheck => &self.stale_exists_check,
            Fault::Insert => &self.insert,
            Fault::MissingReference => &self.missing_reference,
            Fault::Commit => &self.commit,
            Fault::Read => &self.read,
            Fault::Delete => &self.delete,
        }
    }

    fn is_set(&self, fault: Fault) -> bool {
        self.flag(fault).load(Ordering::SeqCst)
    }

    fn check(&self, fault: Fault) -> Result<(), DbError> {
        if self.is_set(fault) {
            return Err(DbError::Backend(format!("injected {fault:?} failure")));
        }
        Ok(())
    }
}

/// Counters of gateway calls, read with [`MemoryRepository::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxStats {
    pub begun: u64,
    pub committed: u64,
    pub rolled_back: u64,
    pub exists_checks: u64,
    pub inserts: u64,
}

#[derive(Debug, Default)]
struct Counters {
    begun: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
    exists_checks: AtomicU64,
    inserts: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> TxStats {
        TxStats {
            begun: self.begun.load(Ordering::SeqCst),
            committed: self.committed.load(Ordering::SeqCst),
            rolled_back: self.rolled_back.load(Ordering::SeqCst),
            exists_checks: self.exists_checks.load(Ordering::SeqCst),
            inserts: self.inserts.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<DbId, T>,
    next_id: DbId,
}

impl<T: MemoryEntity> Table<T> {
    /// Insert a row, enforcing name uniqueness like the `<table>_name_key`
    /// constraint does.
    fn insert(&mut self, new: &T::New) -> Result<DbId, DbError> {
        let row = T::materialize(new, self.next_id, chrono::Utc::now());
        if self.contains_name(row.name()) {
            return Err(DbError::UniqueViolation {
                constraint: format!("{}_name_key", T::TABLE),
            });
        }
        let id = row.id();
        self.next_id += 1;
        self.rows.insert(id, row);
        Ok(id)
    }

    fn contains_name(&self, name: &str) -> bool {
        self.rows.values().any(|row| row.name() == name)
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory table implementing [`Repository`]. Clones share the table.
pub struct MemoryRepository<T> {
    table: Arc<Mutex<Table<T>>>,
    faults: Arc<FaultPlan>,
    counters: Arc<Counters>,
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            faults: Arc::clone(&self.faults),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            faults: Arc::new(FaultPlan::default()),
            counters: Arc::new(Counters::default()),
        }
    }
}

pub type MemoryRoleRepo = MemoryRepository<Role>;
pub type MemoryEmployeeRepo = MemoryRepository<Employee>;

impl<T: MemoryEntity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `fault`'s operation fail.
    pub fn inject(&self, fault: Fault) {
        self.faults.flag(fault).store(true, Ordering::SeqCst);
    }

    pub fn clear(&self, fault: Fault) {
        self.faults.flag(fault).store(false, Ordering::SeqCst);
    }

    pub fn stats(&self) -> TxStats {
        self.counters.snapshot()
    }

    fn check_insert(&self) -> Result<(), DbError> {
        Counters::bump(&self.counters.inserts);
        self.faults.check(Fault::Insert)?;
        match T::REFERENCE {
            Some((field, constraint)) if self.faults.is_set(Fault::MissingReference) => {
                Err(DbError::MissingReference {
                    field,
                    constraint: constraint.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Number of stored rows named `name`.
    pub async fn count_by_name(&self, name: &str) -> usize {
        let table = self.table.lock().await;
        table.rows.values().filter(|row| row.name() == name).count()
    }
}

/// Transaction over a [`MemoryRepository`] table.
#[derive(Debug)]
pub struct MemoryTx<T> {
    guard: OwnedMutexGuard<Table<T>>,
    /// State at `begin`; `None` once the transaction has ended.
    snapshot: Option<Table<T>>,
    counters: Arc<Counters>,
    fail_commit: bool,
}

impl<T> MemoryTx<T> {
    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

#[async_trait]
impl<T: MemoryEntity> Transaction for MemoryTx<T> {
    async fn commit(mut self) -> Result<(), DbError> {
        if self.fail_commit {
            self.restore();
            Counters::bump(&self.counters.rolled_back);
            return Err(DbError::Backend("injected Commit failure".into()));
        }
        self.snapshot = None;
        Counters::bump(&self.counters.committed);
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), DbError> {
        self.restore();
        Counters::bump(&self.counters.rolled_back);
        Ok(())
    }
}

impl<T> Drop for MemoryTx<T> {
    fn drop(&mut self) {
        if self.snapshot.is_some() {
            self.restore();
            Counters::bump(&self.counters.rolled_back);
        }
    }
}

#[async_trait]
impl<T: MemoryEntity> Repository for MemoryRepository<T> {
    type Entity = T;
    type NewEntity = T::New;
    type Tx = MemoryTx<T>;

    async fn begin(&self) -> Result<MemoryTx<T>, DbError> {
        self.faults.check(Fault::Begin)?;
        let guard = Arc::clone(&self.table).lock_owned().await;
        let snapshot = Table::clone(&guard);
        Counters::bump(&self.counters.begun);
        Ok(MemoryTx {
            guard,
            snapshot: Some(snapshot),
            counters: Arc::clone(&self.counters),
            fail_commit: self.faults.flag(Fault::Commit).load(Ordering::SeqCst),
        })
    }

    async fn exists_by_name_tx(&self, tx: &mut MemoryTx<T>, name: &str) -> Result<bool, DbError> {
        Counters::bump(&self.counters.exists_checks);
        self.faults.check(Fault::ExistsCheck)?;
        if self.faults.is_set(Fault::StaleExistsCheck) {
            return Ok(false);
        }
        Ok(tx.guard.contains_name(name))
    }

    async fn save_tx(&self, tx: &mut MemoryTx<T>, entity: &T::New) -> Result<DbId, DbError> {
        self.check_insert()?;
        tx.guard.insert(entity)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<T>, DbError> {
        self.faults.check(Fault::Read)?;
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, DbError> {
        self.faults.check(Fault::Read)?;
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<T>, DbError> {
        self.faults.check(Fault::Read)?;
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|row| ids.contains(&row.id()))
            .cloned()
            .collect())
    }

    async fn save(&self, entity: &T::New) -> Result<DbId, DbError> {
        self.check_insert()?;
        self.table.lock().await.insert(entity)
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        self.faults.check(Fault::Delete)?;
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }

    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, DbError> {
        self.faults.check(Fault::Delete)?;
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table.rows.retain(|id, _| !ids.contains(id));
        Ok((before - table.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn role(name: &str) -> NewRole {
        NewRole { name: name.into() }
    }

    #[tokio::test]
    async fn commit_keeps_inserted_rows() {
        let repo = MemoryRoleRepo::new();
        let mut tx = repo.begin().await.unwrap();
        let id = repo.save_tx(&mut tx, &role("admin")).await.unwrap();
        tx.commit().await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "admin");
        assert_eq!(repo.stats().committed, 1);
    }

    #[tokio::test]
    async fn rollback_discards_inserted_rows() {
        let repo = MemoryRoleRepo::new();
        let mut tx = repo.begin().await.unwrap();
        repo.save_tx(&mut tx, &role("admin")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(repo.find_all().await.unwrap().is_empty());
        assert_eq!(repo.stats().rolled_back, 1);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let repo = MemoryRoleRepo::new();
        {
            let mut tx = repo.begin().await.unwrap();
            repo.save_tx(&mut tx, &role("admin")).await.unwrap();
        }
        assert_eq!(repo.count_by_name("admin").await, 0);
        assert_eq!(repo.stats().rolled_back, 1);
    }

    #[tokio::test]
    async fn exists_sees_uncommitted_insert_in_same_tx() {
        let repo = MemoryRoleRepo::new();
        let mut tx = repo.begin().await.unwrap();
        assert!(!repo.exists_by_name_tx(&mut tx, "admin").await.unwrap());
        repo.save_tx(&mut tx, &role("admin")).await.unwrap();
        assert!(repo.exists_by_name_tx(&mut tx, "admin").await.unwrap());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn injected_faults_fail_and_clear() {
        let repo = MemoryRoleRepo::new();
        repo.inject(Fault::Begin);
        assert_matches!(repo.begin().await, Err(DbError::Backend(_)));
        repo.clear(Fault::Begin);
        assert!(repo.begin().await.is_ok());
    }

    #[tokio::test]
    async fn commit_fault_restores_snapshot() {
        let repo = MemoryRoleRepo::new();
        repo.inject(Fault::Commit);
        let mut tx = repo.begin().await.unwrap();
        repo.save_tx(&mut tx, &role("admin")).await.unwrap();
        assert!(tx.commit().await.is_err());
        assert_eq!(repo.count_by_name("admin").await, 0);
    }

    #[tokio::test]
    async fn ids_are_sequential_and_not_reused_after_commit() {
        let repo = MemoryEmployeeRepo::new();
        let new = |name: &str| NewEmployee {
            name: name.into(),
            role_id: Some(1),
        };
        let first = repo.save(&new("Ann Lee")).await.unwrap();
        let second = repo.save(&new("Bob Ray")).await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(repo.delete(first).await.unwrap());
        assert_eq!(repo.save(&new("Ann Lee")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_name_violates_unique_constraint() {
        let repo = MemoryRoleRepo::new();
        repo.save(&role("admin")).await.unwrap();

        let err = repo.save(&role("admin")).await.unwrap_err();
        assert_matches!(err, DbError::UniqueViolation { constraint } if constraint == "role_name_key");
        assert_eq!(repo.count_by_name("admin").await, 1);
    }

    #[tokio::test]
    async fn stale_exists_check_lets_insert_hit_the_constraint() {
        let repo = MemoryRoleRepo::new();
        repo.save(&role("admin")).await.unwrap();
        repo.inject(Fault::StaleExistsCheck);

        let mut tx = repo.begin().await.unwrap();
        assert!(!repo.exists_by_name_tx(&mut tx, "admin").await.unwrap());
        assert_matches!(
            repo.save_tx(&mut tx, &role("admin")).await,
            Err(DbError::UniqueViolation { .. })
        );
    }

    #[tokio::test]
    async fn missing_reference_only_affects_employees() {
        let roles = MemoryRoleRepo::new();
        let employees = MemoryEmployeeRepo::new();
        roles.inject(Fault::MissingReference);
        employees.inject(Fault::MissingReference);

        assert!(roles.save(&role("admin")).await.is_ok());
        let err = employees
            .save(&NewEmployee {
                name: "John Doe".into(),
                role_id: Some(2),
            })
            .await
            .unwrap_err();
        assert_matches!(err, DbError::MissingReference { field: "roleId", .. });
    }

    #[tokio::test]
    async fn delete_all_by_ids_counts_removed_rows() {
        let repo = MemoryRoleRepo::new();
        let a = repo.save(&role("a1")).await.unwrap();
        let b = repo.save(&role("b1")).await.unwrap();
        repo.save(&role("c1")).await.unwrap();

        assert_eq!(repo.delete_all_by_ids(&[a, b, 99]).await.unwrap(), 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
