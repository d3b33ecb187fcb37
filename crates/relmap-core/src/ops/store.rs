use std::collections::BTreeMap;

use crate::errors::{RelMapError, Result};
use crate::model::{Child, EntityKey, Parent};

/// In-memory object graph of Parents and Children
///
/// Acts as the identity map: one instance per primary key per entity type.
/// BTreeMap-backed so listings are ordered by key. Not thread-safe; designed
/// for single-threaded use.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) parents: BTreeMap<i64, Parent>,
    pub(crate) children: BTreeMap<i64, Child>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a Parent by primary key
    ///
    /// # Errors
    ///
    /// Returns `ParentNotFound` if no Parent with this key is in the store.
    pub fn get_parent(&self, id: i64) -> Result<&Parent> {
        self.parents
            .get(&id)
            .ok_or(RelMapError::ParentNotFound { parent_id: id })
    }

    pub(crate) fn get_parent_mut(&mut self, id: i64) -> Result<&mut Parent> {
        self.parents
            .get_mut(&id)
            .ok_or(RelMapError::ParentNotFound { parent_id: id })
    }

    /// Get a Child by primary key
    ///
    /// # Errors
    ///
    /// Returns `ChildNotFound` if no Child with this key is in the store.
    pub fn get_child(&self, id: i64) -> Result<&Child> {
        self.children
            .get(&id)
            .ok_or(RelMapError::ChildNotFound { child_id: id })
    }

    pub(crate) fn get_child_mut(&mut self, id: i64) -> Result<&mut Child> {
        self.children
            .get_mut(&id)
            .ok_or(RelMapError::ChildNotFound { child_id: id })
    }

    /// All Parents ordered by key
    pub fn list_parents(&self) -> Vec<&Parent> {
        self.parents.values().collect()
    }

    /// All Children ordered by key
    pub fn list_children(&self) -> Vec<&Child> {
        self.children.values().collect()
    }

    /// Add a Parent to the graph
    ///
    /// # Errors
    ///
    /// Returns `EntityAlreadyExists` if a Parent with this key is present.
    pub fn insert_parent(&mut self, parent: Parent) -> Result<()> {
        if self.parents.contains_key(&parent.id()) {
            return Err(RelMapError::EntityAlreadyExists {
                entity: "Parent".to_string(),
                id: parent.id(),
            });
        }
        // A fresh parent may not claim children; links go through relationship_ops.
        let mut parent = parent;
        parent.children.clear();
        self.parents.insert(parent.id(), parent);
        Ok(())
    }

    /// Add a Child to the graph
    ///
    /// The back-reference starts unset; the foreign-key column is kept as given.
    ///
    /// # Errors
    ///
    /// Returns `EntityAlreadyExists` if a Child with this key is present.
    pub fn insert_child(&mut self, child: Child) -> Result<()> {
        if self.children.contains_key(&child.id()) {
            return Err(RelMapError::EntityAlreadyExists {
                entity: "Child".to_string(),
                id: child.id(),
            });
        }
        let mut child = child;
        child.parent = None;
        self.children.insert(child.id(), child);
        Ok(())
    }

    /// Copy a child's back-reference into its foreign-key column
    ///
    /// Returns whether the column changed.
    ///
    /// # Errors
    ///
    /// Returns `ChildNotFound` if no Child with this key is in the store.
    pub fn sync_foreign_key(&mut self, child_id: i64) -> Result<bool> {
        let child = self.get_child_mut(child_id)?;
        let stale = child.is_fk_stale();
        child.sync_foreign_key();
        Ok(stale)
    }

    /// Check whether an entity is in the graph
    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Parent(id) => self.parents.contains_key(&id),
            EntityKey::Child(id) => self.children.contains_key(&id),
        }
    }

    /// Number of entities of both types
    pub fn len(&self) -> usize {
        self.parents.len() + self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}
