// Renderer-side visual state and snapshot history for stepping back and forth

use crate::execution::constants::{GLOBAL_SCOPE_LABEL, GLOBAL_SLOTS_PER_ROW};
use crate::execution::location::Location;
use crate::memory::heap::PointerSource;
use crate::memory::scope::SlotPosition;
use crate::memory::value::Value;
use crate::memory::{ContainerId, PointerId, ScopeId};
use crate::scene::step::{Renderer, Step, StepDescriptor};

/// A variable slot as drawn on its shelf
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSlot {
    pub name: String,
    pub value: Value,
    pub position: SlotPosition,
}

/// A variable shelf
#[derive(Debug, Clone, PartialEq)]
pub struct VisualScope {
    pub id: ScopeId,
    pub label: String,
    pub slots_per_row: usize,
    pub slots: Vec<VisualSlot>,
}

/// A list drawn in the heap area
#[derive(Debug, Clone, PartialEq)]
pub struct VisualList {
    pub id: ContainerId,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualPointer {
    pub id: PointerId,
    pub source: PointerSource,
    pub target: ContainerId,
}

/// An expanded `range()` and how far the loop has walked it
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLoop {
    pub var: String,
    pub values: Vec<i64>,
    pub visited: usize,
}

/// Everything a renderer draws, rebuilt purely from step descriptors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualState {
    pub scopes: Vec<VisualScope>,
    pub lists: Vec<VisualList>, // Creation order
    pub pointers: Vec<VisualPointer>,
    pub pc: Option<Location>,
    pub call_sites: Vec<Location>,
    pub loops: Vec<VisualLoop>,
    /// Outcome of a condition evaluated in the latest step
    pub last_condition: Option<bool>,
    pub last_return: Option<Value>,
    pub finished: bool,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one descriptor. Descriptors referring to objects this state
    /// has never seen are rejected.
    pub fn apply(&mut self, descriptor: &StepDescriptor) -> Result<(), String> {
        match descriptor {
            StepDescriptor::ScopeCreated {
                scope,
                label,
                slots_per_row,
            } => {
                self.scopes.push(VisualScope {
                    id: *scope,
                    label: label.clone(),
                    slots_per_row: *slots_per_row,
                    slots: Vec::new(),
                });
            }
            StepDescriptor::ScopeDestroyed { scope } => {
                match self.scopes.iter().position(|s| s.id == *scope) {
                    Some(i) => {
                        self.scopes.remove(i);
                    }
                    None => return Err(format!("{} is not on screen", scope)),
                }
            }
            StepDescriptor::BindingCreated {
                scope,
                name,
                value,
                slot,
            } => {
                let shelf = self.scope_or_global(*scope)?;
                if shelf.slots.iter().any(|s| &s.name == name) {
                    return Err(format!("'{}' already has a slot in {}", name, scope));
                }
                shelf.slots.push(VisualSlot {
                    name: name.clone(),
                    value: value.clone(),
                    position: *slot,
                });
            }
            StepDescriptor::BindingUpdated {
                scope, name, new, ..
            } => {
                let shelf = self.scope_or_global(*scope)?;
                let slot = shelf
                    .slots
                    .iter_mut()
                    .find(|s| &s.name == name)
                    .ok_or_else(|| format!("'{}' has no slot in {}", name, scope))?;
                slot.value = new.clone();
            }
            StepDescriptor::ContainerCreated { id, initial_values } => {
                self.lists.push(VisualList {
                    id: *id,
                    items: initial_values.clone(),
                });
            }
            StepDescriptor::ContainerAppended { id, value } => {
                self.list_mut(*id)?.items.push(value.clone());
            }
            StepDescriptor::ContainerIndexSet { id, index, value } => {
                let list = self.list_mut(*id)?;
                let len = list.items.len();
                let cell = list
                    .items
                    .get_mut(*index)
                    .ok_or_else(|| format!("{}[{}] is past the end ({} cells)", id, index, len))?;
                *cell = value.clone();
            }
            StepDescriptor::PointerCreated { id, source, target } => {
                self.list(*target)?;
                self.pointers.push(VisualPointer {
                    id: *id,
                    source: source.clone(),
                    target: *target,
                });
            }
            StepDescriptor::PointerRetargeted { id, new_target } => {
                self.list(*new_target)?;
                let pointer = self
                    .pointers
                    .iter_mut()
                    .find(|p| p.id == *id)
                    .ok_or_else(|| format!("{} is not on screen", id))?;
                pointer.target = *new_target;
            }
            StepDescriptor::PointerRemoved { id } => {
                let before = self.pointers.len();
                self.pointers.retain(|p| p.id != *id);
                if self.pointers.len() == before {
                    return Err(format!("{} is not on screen", id));
                }
            }
            StepDescriptor::LocationChanged(loc) => {
                self.pc = Some(*loc);
            }
            StepDescriptor::CallEntered { location, .. } => {
                if let Some(site) = self.pc {
                    self.call_sites.push(site);
                }
                self.pc = Some(*location);
            }
            StepDescriptor::CallReturned { value } => {
                self.call_sites.pop();
                self.last_return = Some(value.clone());
            }
            StepDescriptor::IteratorStarted { var, values } => {
                self.loops.push(VisualLoop {
                    var: var.clone(),
                    values: values.clone(),
                    visited: 0,
                });
            }
            StepDescriptor::IteratorAdvanced { var, .. } => {
                self.loop_mut(var)?.visited += 1;
            }
            StepDescriptor::IteratorExhausted { var } | StepDescriptor::IteratorBroken { var } => {
                match self.loops.iter().rposition(|l| &l.var == var) {
                    Some(i) => {
                        self.loops.remove(i);
                    }
                    None => return Err(format!("no loop over '{}' on screen", var)),
                }
            }
            StepDescriptor::ConditionEvaluated { result } => {
                self.last_condition = Some(*result);
            }
            StepDescriptor::ProgramFinished => {
                self.pc = None;
                self.finished = true;
            }
        }
        Ok(())
    }

    fn scope_or_global(&mut self, id: ScopeId) -> Result<&mut VisualScope, String> {
        // The global shelf exists before any descriptor mentions it
        if id == ScopeId(0) && !self.scopes.iter().any(|s| s.id == id) {
            self.scopes.insert(
                0,
                VisualScope {
                    id,
                    label: GLOBAL_SCOPE_LABEL.to_string(),
                    slots_per_row: GLOBAL_SLOTS_PER_ROW,
                    slots: Vec::new(),
                },
            );
        }
        self.scopes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| format!("{} is not on screen", id))
    }

    fn list(&self, id: ContainerId) -> Result<&VisualList, String> {
        self.lists
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| format!("list {} is not on screen", id))
    }

    fn list_mut(&mut self, id: ContainerId) -> Result<&mut VisualList, String> {
        self.lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| format!("list {} is not on screen", id))
    }

    fn loop_mut(&mut self, var: &str) -> Result<&mut VisualLoop, String> {
        self.loops
            .iter_mut()
            .rev()
            .find(|l| l.var == var)
            .ok_or_else(|| format!("no loop over '{}' on screen", var))
    }

    /// Value shown in a global slot
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .find(|s| s.id == ScopeId(0))?
            .slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.value)
    }

    /// Contents of a list of lists as tokens, the way the board is drawn
    pub fn grid(&self, id: ContainerId) -> Option<Vec<Vec<String>>> {
        self.list(id)
            .ok()?
            .items
            .iter()
            .map(|row| {
                self.list(row.as_container()?)
                    .ok()?
                    .items
                    .iter()
                    .map(|cell| cell.as_str().map(str::to_string))
                    .collect()
            })
            .collect()
    }

    /// Every arrow ending at `id`
    pub fn pointers_to(&self, id: ContainerId) -> Vec<&VisualPointer> {
        self.pointers.iter().filter(|p| p.target == id).collect()
    }

    /// Rough byte size, used for the snapshot memory limit
    pub fn estimated_size(&self) -> usize {
        let slots: usize = self.scopes.iter().map(|s| 64 + s.slots.len() * 48).sum();
        let lists: usize = self.lists.iter().map(|l| 32 + l.items.len() * 32).sum();
        let loops: usize = self.loops.iter().map(|l| 32 + l.values.len() * 8).sum();
        slots + lists + loops + self.pointers.len() * 48 + self.call_sites.len() * 24
    }
}

/// Visual state after one step
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// `None` for the state before the first step
    pub step: Option<usize>,
    pub intent: String,
    pub descriptors: Vec<StepDescriptor>,
    pub state: VisualState,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        self.state.estimated_size() + self.intent.len() + self.descriptors.len() * 64
    }
}

/// Manages the step history for stepping backward
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

/// Renderer that keeps a snapshot of its visual state after every step
#[derive(Debug)]
pub struct SnapshotRenderer {
    state: VisualState,
    history: SnapshotManager,
}

impl SnapshotRenderer {
    /// Start with an empty scene as the first snapshot
    pub fn new(max_memory: usize) -> Result<Self, String> {
        let mut history = SnapshotManager::new(max_memory);
        history.push(Snapshot {
            step: None,
            intent: "start".to_string(),
            descriptors: Vec::new(),
            state: VisualState::new(),
        })?;
        Ok(SnapshotRenderer {
            state: VisualState::new(),
            history,
        })
    }

    /// State after the latest applied step
    pub fn state(&self) -> &VisualState {
        &self.state
    }

    pub fn history(&self) -> &SnapshotManager {
        &self.history
    }

    pub fn into_history(self) -> SnapshotManager {
        self.history
    }
}

impl Renderer for SnapshotRenderer {
    fn apply(&mut self, step: &Step) -> Result<(), String> {
        self.state.last_condition = None;
        for descriptor in &step.descriptors {
            self.state.apply(descriptor)?;
        }
        if let Some(loc) = step.location {
            self.state.pc = Some(loc);
        }

        self.history.push(Snapshot {
            step: Some(step.index),
            intent: step.intent.clone(),
            descriptors: step.descriptors.clone(),
            state: self.state.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, descriptors: Vec<StepDescriptor>) -> Step {
        Step {
            index,
            intent: String::new(),
            location: None,
            descriptors,
        }
    }

    #[test]
    fn test_global_shelf_appears_on_first_binding() {
        let mut state = VisualState::new();
        state
            .apply(&StepDescriptor::BindingCreated {
                scope: ScopeId(0),
                name: "winner".to_string(),
                value: Value::str("B"),
                slot: SlotPosition { row: 0, column: 0 },
            })
            .unwrap();
        assert_eq!(state.global("winner"), Some(&Value::str("B")));
    }

    #[test]
    fn test_rejects_unknown_objects() {
        let mut state = VisualState::new();
        assert!(state
            .apply(&StepDescriptor::ContainerAppended {
                id: ContainerId(3),
                value: Value::Int(1),
            })
            .is_err());
        assert!(state
            .apply(&StepDescriptor::PointerRemoved { id: PointerId(0) })
            .is_err());
    }

    #[test]
    fn test_condition_only_shown_for_its_step() {
        let mut renderer = SnapshotRenderer::new(1024 * 1024).unwrap();
        renderer
            .apply(&step(0, vec![StepDescriptor::ConditionEvaluated { result: true }]))
            .unwrap();
        assert_eq!(renderer.state().last_condition, Some(true));
        renderer.apply(&step(1, vec![])).unwrap();
        assert_eq!(renderer.state().last_condition, None);
        assert_eq!(renderer.history().len(), 3);
    }

    #[test]
    fn test_memory_limit() {
        let mut renderer = SnapshotRenderer::new(200).unwrap();
        let big = StepDescriptor::ContainerCreated {
            id: ContainerId(0),
            initial_values: vec![Value::Int(0); 64],
        };
        let err = renderer.apply(&step(0, vec![big])).unwrap_err();
        assert!(err.contains("memory limit"));

        // Only the initial snapshot was kept
        let history = renderer.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history.memory_limit(), 200);
        assert!(history.memory_usage() <= history.memory_limit());
    }
}
