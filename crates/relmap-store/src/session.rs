//! Unit of work over one SQLite connection
//!
//! Entities are staged with `add`, which follows relationships so a staged
//! child brings its parent and a staged parent brings its children. `commit`
//! flushes everything staged in one transaction, parents before children,
//! and writes each child's relationship target into its `parent_id` column.
//!
//! The session remembers which keys it has flushed or loaded. A stored child
//! whose relationship changed since (detached, or moved to another parent)
//! is flushed again on the next commit even if nothing reaches it.

#![allow(clippy::result_large_err)]

use std::collections::BTreeSet;

use crate::db::{connect, EngineConfig};
use crate::ddl::create_all;
use crate::errors::{from_domain, from_rusqlite, Result};
use crate::repo::{hydration, SqliteRepo};
use relmap_core::errors::RelMapError;
use relmap_core::model::{Child, EntityKey, Parent};
use relmap_core::ops::Store;
use relmap_core::rules::check_relationships;
use relmap_core::schema::SchemaRegistry;
use relmap_core::{log_op_end, log_op_error, log_op_start};
use relmap_core_types::SessionId;
use rusqlite::Connection;

/// Staging area plus the connection it flushes to
pub struct Session {
    conn: Connection,
    id: SessionId,
    pending: BTreeSet<EntityKey>,
    persistent: BTreeSet<EntityKey>,
}

impl Session {
    /// Wrap an open connection; tables are expected to exist
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            id: SessionId::new(),
            pending: BTreeSet::new(),
            persistent: BTreeSet::new(),
        }
    }

    /// Open a connection from `config` and create the registered tables
    ///
    /// # Errors
    /// * `InvalidInput` / `Persistence` - if the database cannot be opened
    /// * `ChecksumMismatch` - if an existing table was created from other DDL
    pub fn open(config: &EngineConfig, registry: &SchemaRegistry) -> Result<Self> {
        let mut conn = connect(config)?;
        create_all(&mut conn, registry)?;
        Ok(Self::new(conn))
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Stage an entity and everything reachable from it
    ///
    /// Returns how many entities were newly staged.
    ///
    /// # Errors
    /// * `NotFound` - if `key` is not in the store
    pub fn add(&mut self, store: &Store, key: EntityKey) -> Result<usize> {
        let reachable = cascade(store, [key]).map_err(|e| self.error("add", e))?;

        let before = self.pending.len();
        self.pending.extend(reachable);
        let staged = self.pending.len() - before;

        tracing::debug!(
            session_id = %self.id,
            key = %key,
            staged = staged,
            "Staged entity"
        );

        Ok(staged)
    }

    /// Entities waiting for the next commit, parents first
    pub fn pending(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_pending(&self, key: EntityKey) -> bool {
        self.pending.contains(&key)
    }

    /// Whether the session has flushed or loaded this key
    pub fn is_persistent(&self, key: EntityKey) -> bool {
        self.persistent.contains(&key)
    }

    /// Discard staged entities without writing anything
    pub fn rollback(&mut self) {
        let discarded = self.pending.len();
        self.pending.clear();
        tracing::debug!(session_id = %self.id, discarded = discarded, "Rolled back");
    }

    /// Flush staged entities in one transaction
    ///
    /// Staging is recomputed first, so links made after `add` are followed.
    /// Stored children whose `parent_id` lags their back-reference are
    /// flushed too, along with whatever they reach.
    /// The graph must satisfy the relationship invariants or nothing is
    /// written. On success each flushed child's `parent_id` matches its
    /// back-reference and the staging area is empty; on failure the staging
    /// area is kept. Returns the number of rows written.
    ///
    /// # Errors
    /// * `NotFound` - if a staged entity was removed from the store
    /// * `InvariantViolation` - if the two relationship sides disagree
    /// * `ConstraintViolation` / `Persistence` - if SQLite rejects the flush
    pub fn commit(&mut self, store: &mut Store) -> Result<usize> {
        if self.pending.is_empty() && self.stale_children(store).next().is_none() {
            return Ok(0);
        }

        log_op_start!("commit", session_id = %self.id);
        let start = std::time::Instant::now();

        let written = self.commit_impl(store).map_err(|e| {
            log_op_error!(
                "commit",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "commit",
            duration_ms = start.elapsed().as_millis() as u64,
            written = written
        );

        Ok(written)
    }

    fn commit_impl(&mut self, store: &mut Store) -> Result<usize> {
        let session_id = self.id.clone();
        let fail = |e: RelMapError| from_domain("commit", e).with_session_id(session_id.clone());

        let roots: Vec<EntityKey> = self
            .pending
            .iter()
            .copied()
            .chain(self.stale_children(store))
            .collect();
        let staged = cascade(store, roots).map_err(fail)?;
        check_relationships(store).map_err(fail)?;

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        for key in &staged {
            match *key {
                EntityKey::Parent(id) => {
                    let parent = store.get_parent(id).map_err(fail)?;
                    SqliteRepo::persist_parent(&tx, parent)?;
                }
                EntityKey::Child(id) => {
                    let child = store.get_child(id).map_err(fail)?;
                    SqliteRepo::persist_child(&tx, id, child.parent_key())?;
                }
            }
        }
        tx.commit().map_err(from_rusqlite)?;

        for key in &staged {
            if let EntityKey::Child(id) = *key {
                store.sync_foreign_key(id).map_err(fail)?;
            }
        }

        self.pending.clear();
        let written = staged.len();
        self.persistent.extend(staged);
        Ok(written)
    }

    /// Flushed or loaded children whose relationship moved since
    fn stale_children<'a>(&'a self, store: &'a Store) -> impl Iterator<Item = EntityKey> + 'a {
        self.persistent.iter().copied().filter(move |key| match *key {
            EntityKey::Child(id) => store.get_child(id).is_ok_and(|c| c.is_fk_stale()),
            EntityKey::Parent(_) => false,
        })
    }

    /// All stored Parents ordered by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn query_parents(&self) -> Result<Vec<Parent>> {
        SqliteRepo::list_parents(&self.conn)
    }

    /// All stored Children ordered by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn query_children(&self) -> Result<Vec<Child>> {
        SqliteRepo::list_children(&self.conn)
    }

    /// Stored Parent by id
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn get_parent(&self, id: i64) -> Result<Option<Parent>> {
        SqliteRepo::get_parent(&self.conn, id)
    }

    /// Stored Child by id, with its back-reference unresolved
    ///
    /// # Errors
    /// * `Persistence` - if the query fails
    pub fn get_child(&self, id: i64) -> Result<Option<Child>> {
        SqliteRepo::get_child(&self.conn, id)
    }

    /// Rebuild the stored object graph
    ///
    /// Every loaded entity counts as persistent, so later relationship
    /// changes to it are flushed by `commit`.
    ///
    /// # Errors
    /// * `Persistence` - if reading the tables fails
    pub fn load(&mut self) -> Result<Store> {
        let store = hydration::load_graph(&self.conn)?;

        self.persistent.extend(
            store
                .list_parents()
                .iter()
                .map(|p| EntityKey::Parent(p.id()))
                .chain(store.list_children().iter().map(|c| EntityKey::Child(c.id()))),
        );

        Ok(store)
    }

    fn error(&self, op: &str, err: RelMapError) -> relmap_core::ExError {
        from_domain(op, err).with_session_id(self.id.clone())
    }
}

/// Keys reachable from `roots` along Parent.children and Child.parent
fn cascade(
    store: &Store,
    roots: impl IntoIterator<Item = EntityKey>,
) -> std::result::Result<BTreeSet<EntityKey>, RelMapError> {
    let mut seen = BTreeSet::new();
    let mut queue: Vec<EntityKey> = roots.into_iter().collect();

    while let Some(key) = queue.pop() {
        if seen.contains(&key) {
            continue;
        }
        match key {
            EntityKey::Parent(id) => {
                let parent = store.get_parent(id)?;
                queue.extend(parent.child_ids().iter().map(|c| EntityKey::Child(*c)));
            }
            EntityKey::Child(id) => {
                if let Some(pid) = store.get_child(id)?.parent_key() {
                    queue.push(EntityKey::Parent(pid));
                }
            }
        }
        seen.insert(key);
    }

    Ok(seen)
}
