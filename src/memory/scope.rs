//! Variable scope stack
//!
//! This module provides the stack of variable scopes ("shelves" in the
//! rendered scene):
//! - [`ScopeStack`]: the global scope plus one scope per active call
//! - [`Scope`]: an ordered name -> [`Slot`] mapping
//! - [`SlotLayout`]: where the renderer places each slot
//!
//! # Lookup
//!
//! The modelled language has no closures, so [`ScopeStack::lookup`] resolves
//! names against the top scope only. There is no fallback to the global scope.
//!
//! # Layout
//!
//! Slots are laid out in insertion order, either in a single column or in
//! fixed-width rows. The layout is a pure placement concern: the same
//! insertion order always yields the same positions.

use super::value::Value;
use super::{PointerId, ScopeId};
use crate::execution::errors::ModelError;
use rustc_hash::FxHashMap;

/// Placement of a slot on its scope's shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    pub row: usize,
    pub column: usize,
}

/// How many slots a scope places side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    slots_per_row: usize,
}

impl SlotLayout {
    /// A layout with `slots_per_row` columns (at least one)
    pub fn new(slots_per_row: usize) -> Self {
        SlotLayout {
            slots_per_row: slots_per_row.max(1),
        }
    }

    pub fn single_column() -> Self {
        Self::new(1)
    }

    pub fn slots_per_row(&self) -> usize {
        self.slots_per_row
    }

    /// Position of the `index`-th slot in insertion order
    pub fn place(&self, index: usize) -> SlotPosition {
        SlotPosition {
            row: index / self.slots_per_row,
            column: index % self.slots_per_row,
        }
    }

    /// Number of rows needed for `slots` slots
    pub fn rows_for(&self, slots: usize) -> usize {
        slots.div_ceil(self.slots_per_row)
    }
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self::single_column()
    }
}

/// A variable slot: the value, and the pointer drawn from it when the value is a list
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub value: Value,
    pub pointer: Option<PointerId>,
}

impl Slot {
    pub fn new(value: Value) -> Self {
        Slot {
            value,
            pointer: None,
        }
    }

    pub fn with_pointer(value: Value, pointer: PointerId) -> Self {
        Slot {
            value,
            pointer: Some(pointer),
        }
    }
}

/// One call frame's bindings
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub label: String,
    pub layout: SlotLayout,
    slots: FxHashMap<String, Slot>,
    insertion_order: Vec<String>, // Drives layout, not semantics
}

impl Scope {
    fn new(id: ScopeId, label: String, layout: SlotLayout) -> Self {
        Scope {
            id,
            label,
            layout,
            slots: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }

    /// Bindings in insertion order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.slots.get(name).map(|slot| (name.as_str(), slot)))
    }
}

/// The scope stack. The global scope is created up front and is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    next_id: u32,
}

impl ScopeStack {
    pub fn new(global_label: &str, global_layout: SlotLayout) -> Self {
        ScopeStack {
            scopes: vec![Scope::new(ScopeId(0), global_label.to_string(), global_layout)],
            next_id: 1,
        }
    }

    /// Push a new empty scope (function call entry)
    pub fn push_scope(&mut self, label: &str, layout: SlotLayout) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.scopes.push(Scope::new(id, label.to_string(), layout));
        id
    }

    /// Pop the top scope (function return)
    pub fn pop_scope(&mut self) -> Result<Scope, ModelError> {
        if self.scopes.len() <= 1 {
            return Err(ModelError::precondition("cannot pop the global scope"));
        }
        self.scopes
            .pop()
            .ok_or_else(|| ModelError::precondition("scope stack is empty"))
    }

    /// Bind a new name. The scope is left unchanged on failure.
    pub fn bind(&mut self, scope: ScopeId, name: &str, slot: Slot) -> Result<SlotPosition, ModelError> {
        let target = self.scope_mut(scope)?;
        if target.slots.contains_key(name) {
            return Err(ModelError::DuplicateName {
                scope,
                name: name.to_string(),
            });
        }

        let position = target.layout.place(target.insertion_order.len());
        target.slots.insert(name.to_string(), slot);
        target.insertion_order.push(name.to_string());
        Ok(position)
    }

    /// Update an existing binding in place, returning the old value
    pub fn rebind(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<Value, ModelError> {
        let slot = self.slot_mut(scope, name)?;
        Ok(std::mem::replace(&mut slot.value, value))
    }

    /// Attach or clear the pointer drawn from a slot
    pub fn set_pointer(&mut self, scope: ScopeId, name: &str, pointer: Option<PointerId>) -> Result<(), ModelError> {
        self.slot_mut(scope, name)?.pointer = pointer;
        Ok(())
    }

    fn slot_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut Slot, ModelError> {
        self.scope_mut(scope)?
            .slots
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownName {
                scope,
                name: name.to_string(),
            })
    }

    /// Resolve a name in the top scope only
    pub fn lookup(&self, name: &str) -> Result<&Slot, ModelError> {
        let top = self.top();
        top.get(name).ok_or_else(|| ModelError::UnknownName {
            scope: top.id,
            name: name.to_string(),
        })
    }

    pub fn top(&self) -> &Scope {
        // The global scope is never popped, so the stack is never empty
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn top_id(&self) -> ScopeId {
        self.top().id
    }

    pub fn scope(&self, id: ScopeId) -> Result<&Scope, ModelError> {
        self.scopes
            .iter()
            .find(|s| s.id == id)
            .ok_or(ModelError::UnknownScope { scope: id })
    }

    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope, ModelError> {
        self.scopes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ModelError::UnknownScope { scope: id })
    }

    /// All scopes, global first (for UI display)
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_per_row_layout() {
        let layout = SlotLayout::new(2);
        assert_eq!(layout.place(0), SlotPosition { row: 0, column: 0 });
        assert_eq!(layout.place(1), SlotPosition { row: 0, column: 1 });
        assert_eq!(layout.place(2), SlotPosition { row: 1, column: 0 });
        assert_eq!(layout.rows_for(3), 2);
        assert_eq!(SlotLayout::new(0).slots_per_row(), 1);
    }

    #[test]
    fn test_lookup_only_sees_top_scope() {
        let mut stack = ScopeStack::new("global", SlotLayout::single_column());
        stack
            .bind(ScopeId(0), "game_board", Slot::new(Value::Int(1)))
            .unwrap();
        let frame = stack.push_scope("add_token", SlotLayout::new(2));
        assert!(matches!(
            stack.lookup("game_board"),
            Err(ModelError::UnknownName { scope, .. }) if scope == frame
        ));
        stack.pop_scope().unwrap();
        assert_eq!(stack.lookup("game_board").unwrap().value, Value::Int(1));
    }

    #[test]
    fn test_cannot_pop_global() {
        let mut stack = ScopeStack::new("global", SlotLayout::single_column());
        assert!(matches!(
            stack.pop_scope(),
            Err(ModelError::PreconditionViolation { .. })
        ));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_rebind_returns_old_value() {
        let mut stack = ScopeStack::new("global", SlotLayout::single_column());
        stack.bind(ScopeId(0), "row", Slot::new(Value::Int(1))).unwrap();
        let old = stack.rebind(ScopeId(0), "row", Value::Int(2)).unwrap();
        assert_eq!(old, Value::Int(1));
        assert!(matches!(
            stack.rebind(ScopeId(0), "col", Value::Int(0)),
            Err(ModelError::UnknownName { .. })
        ));
    }
}
