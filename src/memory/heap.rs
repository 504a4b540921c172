//! Heap of lists and the pointers that reference them
//!
//! This module provides heap bookkeeping with:
//! - Explicit allocation of lists with a stable [`ContainerId`]
//! - Growth by `append` only, overwrite by `set_index` (no structural deletion)
//! - Explicit [`Pointer`] records for every slot or cell that references a list
//! - Tombstone tracking for released lists, so ids are never reused
//!
//! # Liveness
//!
//! A pointer can only target a live list. Releasing a list that is still the
//! target of a pointer, or still stored in a live list's cell, is a
//! precondition violation: the caller must remove or retarget those first.

use super::value::Value;
use super::{ContainerId, PointerId, ScopeId};
use crate::execution::errors::ModelError;
use rustc_hash::FxHashMap;

/// State of a heap list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Live,
    Released, // Kept so the id is never handed out again
}

/// A heap-allocated list
#[derive(Debug, Clone)]
pub struct Container {
    pub items: Vec<Value>,
    pub state: ContainerState,
}

impl Container {
    fn new(items: Vec<Value>) -> Self {
        Container {
            items,
            state: ContainerState::Live,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_live(&self) -> bool {
        self.state == ContainerState::Live
    }
}

/// Where a pointer starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// A variable slot
    Slot { scope: ScopeId, name: String },
    /// A cell of another list
    Cell { container: ContainerId, index: usize },
}

/// A directed, non-owning reference to a heap list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub source: PointerSource,
    pub target: ContainerId,
}

/// The heap
#[derive(Debug, Clone, Default)]
pub struct Heap {
    containers: FxHashMap<ContainerId, Container>,
    pointers: FxHashMap<PointerId, Pointer>,
    next_container: u32,
    next_pointer: u32,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new list holding `initial_values`
    pub fn create_container(&mut self, initial_values: Vec<Value>) -> Result<ContainerId, ModelError> {
        for value in &initial_values {
            self.check_value(value)?;
        }

        let id = ContainerId(self.next_container);
        self.next_container += 1;
        self.containers.insert(id, Container::new(initial_values));
        Ok(id)
    }

    /// Grow a list by exactly one slot at the end
    pub fn append(&mut self, id: ContainerId, value: Value) -> Result<(), ModelError> {
        self.check_value(&value)?;
        self.live_mut(id)?.items.push(value);
        Ok(())
    }

    /// Overwrite an existing slot, returning the previous value
    pub fn set_index(&mut self, id: ContainerId, index: usize, value: Value) -> Result<Value, ModelError> {
        self.check_value(&value)?;
        let container = self.live_mut(id)?;
        let len = container.len();
        match container.items.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(ModelError::OutOfBounds {
                container: id,
                index: index as i64,
                len,
            }),
        }
    }

    /// Read a slot
    pub fn get_index(&self, id: ContainerId, index: usize) -> Result<Value, ModelError> {
        let container = self.container(id)?;
        container
            .items
            .get(index)
            .cloned()
            .ok_or(ModelError::OutOfBounds {
                container: id,
                index: index as i64,
                len: container.len(),
            })
    }

    /// Current length of a live list
    pub fn len(&self, id: ContainerId) -> Result<usize, ModelError> {
        Ok(self.container(id)?.len())
    }

    /// Get a live list
    pub fn container(&self, id: ContainerId) -> Result<&Container, ModelError> {
        match self.containers.get(&id) {
            Some(c) if c.is_live() => Ok(c),
            Some(_) => Err(ModelError::ReleasedContainer { container: id }),
            None => Err(ModelError::UnknownContainer { container: id }),
        }
    }

    fn live_mut(&mut self, id: ContainerId) -> Result<&mut Container, ModelError> {
        match self.containers.get_mut(&id) {
            Some(c) if c.is_live() => Ok(c),
            Some(_) => Err(ModelError::ReleasedContainer { container: id }),
            None => Err(ModelError::UnknownContainer { container: id }),
        }
    }

    /// Ensure a value stored on the heap only references live lists
    fn check_value(&self, value: &Value) -> Result<(), ModelError> {
        if let Value::Container(target) = value {
            self.container(*target)?;
        }
        Ok(())
    }

    /// End a list's lifetime. Fails while anything still references it.
    pub fn release(&mut self, id: ContainerId) -> Result<(), ModelError> {
        self.container(id)?;

        if let Some(pid) = self.pointers_to(id).first() {
            return Err(ModelError::precondition(format!(
                "cannot release list {}: still targeted by {}",
                id, pid
            )));
        }
        let referenced = self
            .containers
            .iter()
            .filter(|(_, c)| c.is_live())
            .any(|(_, c)| c.items.contains(&Value::Container(id)));
        if referenced {
            return Err(ModelError::precondition(format!(
                "cannot release list {}: still stored in another list",
                id
            )));
        }

        if let Some(container) = self.containers.get_mut(&id) {
            container.state = ContainerState::Released;
        }
        Ok(())
    }

    /// Create a pointer from `source` to a live list
    pub fn make_pointer(&mut self, source: PointerSource, target: ContainerId) -> Result<PointerId, ModelError> {
        self.container(target)?;
        if let Some(existing) = self.pointer_from(&source) {
            return Err(ModelError::precondition(format!(
                "{:?} already has pointer {}",
                source, existing
            )));
        }

        let id = PointerId(self.next_pointer);
        self.next_pointer += 1;
        self.pointers.insert(id, Pointer { source, target });
        Ok(id)
    }

    /// Point an existing pointer at another live list, returning the old target
    pub fn retarget(&mut self, id: PointerId, new_target: ContainerId) -> Result<ContainerId, ModelError> {
        self.container(new_target)?;
        let pointer = self
            .pointers
            .get_mut(&id)
            .ok_or(ModelError::UnknownPointer { pointer: id })?;
        Ok(std::mem::replace(&mut pointer.target, new_target))
    }

    /// Delete a pointer
    pub fn remove_pointer(&mut self, id: PointerId) -> Result<Pointer, ModelError> {
        self.pointers
            .remove(&id)
            .ok_or(ModelError::UnknownPointer { pointer: id })
    }

    /// Delete every pointer whose source is a slot of `scope`, returning their ids in order
    pub fn remove_pointers_from_scope(&mut self, scope: ScopeId) -> Vec<PointerId> {
        let mut ids: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|(_, p)| matches!(&p.source, PointerSource::Slot { scope: s, .. } if *s == scope))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        for id in &ids {
            self.pointers.remove(id);
        }
        ids
    }

    pub fn pointer(&self, id: PointerId) -> Result<&Pointer, ModelError> {
        self.pointers
            .get(&id)
            .ok_or(ModelError::UnknownPointer { pointer: id })
    }

    /// The pointer that starts at `source`, if any
    pub fn pointer_from(&self, source: &PointerSource) -> Option<PointerId> {
        self.pointers
            .iter()
            .find(|(_, p)| &p.source == source)
            .map(|(id, _)| *id)
    }

    /// Every pointer targeting `target`, ordered by id
    pub fn pointers_to(&self, target: ContainerId) -> Vec<PointerId> {
        let mut ids: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|(_, p)| p.target == target)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// All pointers ordered by id (for UI display)
    pub fn pointers(&self) -> Vec<(PointerId, &Pointer)> {
        let mut all: Vec<_> = self.pointers.iter().map(|(id, p)| (*id, p)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(scope: u32, name: &str) -> PointerSource {
        PointerSource::Slot {
            scope: ScopeId(scope),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_append_grows_by_one() {
        let mut heap = Heap::new();
        let id = heap.create_container(vec![]).unwrap();
        for expected in 1..=3 {
            heap.append(id, Value::Int(expected as i64)).unwrap();
            assert_eq!(heap.len(id).unwrap(), expected);
        }
    }

    #[test]
    fn test_set_index_out_of_bounds() {
        let mut heap = Heap::new();
        let id = heap.create_container(vec![Value::str(" ")]).unwrap();
        let err = heap.set_index(id, 1, Value::str("G")).unwrap_err();
        assert_eq!(
            err,
            ModelError::OutOfBounds {
                container: id,
                index: 1,
                len: 1
            }
        );
        assert_eq!(heap.get_index(id, 0).unwrap(), Value::str(" "));
    }

    #[test]
    fn test_nested_reference_must_exist() {
        let mut heap = Heap::new();
        let err = heap
            .create_container(vec![Value::Container(ContainerId(9))])
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownContainer { .. }));
    }

    #[test]
    fn test_aliasing_pointers() {
        let mut heap = Heap::new();
        let board = heap.create_container(vec![]).unwrap();
        let p1 = heap.make_pointer(slot(0, "game_board"), board).unwrap();
        let p2 = heap.make_pointer(slot(1, "board"), board).unwrap();
        assert_eq!(heap.pointers_to(board), vec![p1, p2]);
    }

    #[test]
    fn test_retarget_requires_live_target() {
        let mut heap = Heap::new();
        let a = heap.create_container(vec![]).unwrap();
        let b = heap.create_container(vec![]).unwrap();
        let p = heap.make_pointer(slot(0, "b"), a).unwrap();
        assert_eq!(heap.retarget(p, b).unwrap(), a);
        heap.release(a).unwrap();
        assert!(matches!(
            heap.retarget(p, a),
            Err(ModelError::ReleasedContainer { .. })
        ));
    }

    #[test]
    fn test_release_blocked_by_pointer() {
        let mut heap = Heap::new();
        let a = heap.create_container(vec![]).unwrap();
        let p = heap.make_pointer(slot(1, "b"), a).unwrap();
        assert!(matches!(
            heap.release(a),
            Err(ModelError::PreconditionViolation { .. })
        ));
        heap.remove_pointer(p).unwrap();
        heap.release(a).unwrap();
        assert!(matches!(
            heap.append(a, Value::Int(1)),
            Err(ModelError::ReleasedContainer { .. })
        ));
        // ids are not reused
        let next = heap.create_container(vec![]).unwrap();
        assert_ne!(next, a);
    }

    #[test]
    fn test_remove_pointers_from_scope() {
        let mut heap = Heap::new();
        let a = heap.create_container(vec![]).unwrap();
        heap.make_pointer(slot(0, "game_board"), a).unwrap();
        let p = heap.make_pointer(slot(1, "board"), a).unwrap();
        assert_eq!(heap.remove_pointers_from_scope(ScopeId(1)), vec![p]);
        assert_eq!(heap.pointers_to(a).len(), 1);
    }
}
