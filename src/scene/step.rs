//! Step descriptors: the protocol between the driver and a renderer
//!
//! Every intent the driver executes yields one [`Step`], an ordered list of
//! [`StepDescriptor`]s describing exactly which model objects changed and how.
//! The driver hands each step to a [`Renderer`] and waits for it to return
//! before executing the next intent, so a renderer never observes a
//! half-applied step.

use crate::execution::location::Location;
use crate::memory::heap::PointerSource;
use crate::memory::scope::SlotPosition;
use crate::memory::value::Value;
use crate::memory::{ContainerId, PointerId, ScopeId};
use std::fmt;

/// One externally observable state change
#[derive(Debug, Clone, PartialEq)]
pub enum StepDescriptor {
    ScopeCreated {
        scope: ScopeId,
        label: String,
        slots_per_row: usize,
    },
    ScopeDestroyed {
        scope: ScopeId,
    },
    BindingCreated {
        scope: ScopeId,
        name: String,
        value: Value,
        slot: SlotPosition,
    },
    BindingUpdated {
        scope: ScopeId,
        name: String,
        old: Value,
        new: Value,
    },
    ContainerCreated {
        id: ContainerId,
        initial_values: Vec<Value>,
    },
    ContainerAppended {
        id: ContainerId,
        value: Value,
    },
    ContainerIndexSet {
        id: ContainerId,
        index: usize,
        value: Value,
    },
    PointerCreated {
        id: PointerId,
        source: PointerSource,
        target: ContainerId,
    },
    PointerRetargeted {
        id: PointerId,
        new_target: ContainerId,
    },
    PointerRemoved {
        id: PointerId,
    },
    LocationChanged(Location),
    CallEntered {
        function: String,
        location: Location,
    },
    CallReturned {
        value: Value,
    },
    /// A `range()` was expanded into the values the loop will visit
    IteratorStarted {
        var: String,
        values: Vec<i64>,
    },
    IteratorAdvanced {
        var: String,
        value: i64,
    },
    IteratorExhausted {
        var: String,
    },
    /// The loop was left early by `break` or `return`
    IteratorBroken {
        var: String,
    },
    ConditionEvaluated {
        result: bool,
    },
    /// The outermost program returned; no location is highlighted any more
    ProgramFinished,
}

impl fmt::Display for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepDescriptor::ScopeCreated { scope, label, .. } => {
                write!(f, "scope {} created for {}", scope, label)
            }
            StepDescriptor::ScopeDestroyed { scope } => write!(f, "scope {} destroyed", scope),
            StepDescriptor::BindingCreated { name, value, .. } => {
                write!(f, "{} = {}", name, value)
            }
            StepDescriptor::BindingUpdated { name, old, new, .. } => {
                write!(f, "{}: {} -> {}", name, old, new)
            }
            StepDescriptor::ContainerCreated { id, initial_values } => {
                write!(f, "list {} created with {} item(s)", id, initial_values.len())
            }
            StepDescriptor::ContainerAppended { id, value } => {
                write!(f, "{}.append({})", id, value)
            }
            StepDescriptor::ContainerIndexSet { id, index, value } => {
                write!(f, "{}[{}] = {}", id, index, value)
            }
            StepDescriptor::PointerCreated { id, source, target } => match source {
                PointerSource::Slot { name, .. } => write!(f, "{}: {} -> {}", id, name, target),
                PointerSource::Cell { container, index } => {
                    write!(f, "{}: {}[{}] -> {}", id, container, index, target)
                }
            },
            StepDescriptor::PointerRetargeted { id, new_target } => {
                write!(f, "{} now points to {}", id, new_target)
            }
            StepDescriptor::PointerRemoved { id } => write!(f, "{} removed", id),
            StepDescriptor::LocationChanged(loc) => write!(f, "pc at {}", loc),
            StepDescriptor::CallEntered { function, location } => {
                write!(f, "call {}() at {}", function, location)
            }
            StepDescriptor::CallReturned { value } => write!(f, "return {}", value),
            StepDescriptor::IteratorStarted { var, values } => {
                write!(f, "{} in {:?}", var, values)
            }
            StepDescriptor::IteratorAdvanced { var, value } => write!(f, "{} <- {}", var, value),
            StepDescriptor::IteratorExhausted { var } => write!(f, "loop over {} finished", var),
            StepDescriptor::IteratorBroken { var } => write!(f, "loop over {} left early", var),
            StepDescriptor::ConditionEvaluated { result } => {
                write!(f, "condition is {}", if *result { "True" } else { "False" })
            }
            StepDescriptor::ProgramFinished => write!(f, "program finished"),
        }
    }
}

/// The descriptors produced by one intent
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub index: usize,
    /// Short rendering of the intent that produced this step
    pub intent: String,
    /// Program counter after the step
    pub location: Option<Location>,
    pub descriptors: Vec<StepDescriptor>,
}

/// A consumer of steps. `apply` must finish before the driver continues;
/// an `Err` aborts the scene.
pub trait Renderer {
    fn apply(&mut self, step: &Step) -> Result<(), String>;
}

/// Renderer that only records the trace
#[derive(Debug, Default)]
pub struct TraceRecorder {
    pub steps: Vec<Step>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All descriptors of the trace, in order
    pub fn descriptors(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter().flat_map(|s| s.descriptors.iter())
    }
}

impl Renderer for TraceRecorder {
    fn apply(&mut self, step: &Step) -> Result<(), String> {
        self.steps.push(step.clone());
        Ok(())
    }
}
