//! In-memory commit store for unit tests

use crate::error::{Error, Result};
use crate::repo::CommitStore;
use crate::types::CommitInfo;
use git2::{ObjectType, Oid};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Content-addressed commits held in a map
#[derive(Default)]
pub struct MemoryStore {
    commits: RefCell<HashMap<Oid, CommitInfo>>,
    writes: Cell<usize>,
    head: Cell<Option<Oid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit, returning its content identifier
    pub fn add(&self, message: &str, parents: &[Oid]) -> Oid {
        let id = content_id(message, parents);
        self.commits.borrow_mut().insert(
            id,
            CommitInfo {
                id,
                message: message.to_string(),
                parents: parents.to_vec(),
            },
        );
        id
    }

    /// Number of rewrites performed
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Where HEAD was last pointed
    pub fn head(&self) -> Option<Oid> {
        self.head.get()
    }

    pub fn get(&self, id: Oid) -> CommitInfo {
        self.commits.borrow()[&id].clone()
    }
}

impl CommitStore for MemoryStore {
    fn read_commit(&self, id: Oid) -> Result<CommitInfo> {
        self.commits
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::CommitNotFound(id.to_string()))
    }

    fn rewrite_commit(&self, original: Oid, message: &str, parents: &[Oid]) -> Result<Oid> {
        self.read_commit(original)?;
        self.writes.set(self.writes.get() + 1);
        Ok(self.add(message, parents))
    }

    fn update_head(&self, id: Oid) -> Result<()> {
        self.head.set(Some(id));
        Ok(())
    }
}

fn content_id(message: &str, parents: &[Oid]) -> Oid {
    let mut buf = String::new();
    for parent in parents {
        buf.push_str(&format!("parent {parent}\n"));
    }
    buf.push('\n');
    buf.push_str(message);
    Oid::hash_object(ObjectType::Commit, buf.as_bytes()).unwrap()
}
