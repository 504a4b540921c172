// Scene choreography driver: executes intents against the model and streams steps

use super::errors::TraceError;
use super::intent::{Comparison, Intent, Operand};
use super::step::{Renderer, Step, StepDescriptor};
use super::Scene;
use crate::execution::constants::{GLOBAL_SCOPE_LABEL, GLOBAL_SLOTS_PER_ROW, MAX_SEQUENCE_LEN};
use crate::execution::errors::ModelError;
use crate::execution::loops::RangeIterator;
use crate::execution::tracker::ExecutionTracker;
use crate::memory::heap::{Heap, PointerSource};
use crate::memory::scope::{ScopeStack, Slot, SlotLayout};
use crate::memory::value::Value;
use crate::memory::{ContainerId, PointerId, ScopeId};

/// A counting loop that has started and not yet ended
#[derive(Debug, Clone)]
pub struct ActiveLoop {
    pub var: String,
    pub iterator: RangeIterator,
    /// Scope depth of the frame running the loop
    pub frame_depth: usize,
}

/// Owns one model instance for the lifetime of a scene
#[derive(Debug, Clone)]
pub struct SceneDriver {
    heap: Heap,
    scopes: ScopeStack,
    tracker: ExecutionTracker,
    loops: Vec<ActiveLoop>,

    /// Value of the most recent `Return`
    return_register: Value,

    steps_executed: usize,
}

impl SceneDriver {
    pub fn new() -> Self {
        SceneDriver {
            heap: Heap::new(),
            scopes: ScopeStack::new(GLOBAL_SCOPE_LABEL, SlotLayout::new(GLOBAL_SLOTS_PER_ROW)),
            tracker: ExecutionTracker::new(),
            loops: Vec::new(),
            return_register: Value::Empty,
            steps_executed: 0,
        }
    }

    /// Run a whole scene on a fresh model, handing each step to `renderer`
    /// before the next intent executes. Returns the driver so the final
    /// model can be inspected.
    pub fn run(scene: &Scene, renderer: &mut dyn Renderer) -> Result<SceneDriver, TraceError> {
        let mut driver = SceneDriver::new();
        log::info!(
            "scene '{}': running {} intents",
            scene.name,
            scene.intents.len()
        );

        for (index, intent) in scene.intents.iter().enumerate() {
            log::debug!("[{}] step {}: {}", scene.name, index, intent);

            let descriptors = driver.step(intent).map_err(|source| {
                log::warn!("[{}] step {} failed: {}", scene.name, index, source);
                TraceError::Model {
                    scene: scene.name.clone(),
                    step: index,
                    intent: intent.to_string(),
                    source,
                }
            })?;

            let step = Step {
                index,
                intent: intent.to_string(),
                location: driver.tracker.current(),
                descriptors,
            };
            renderer
                .apply(&step)
                .map_err(|message| TraceError::Renderer {
                    scene: scene.name.clone(),
                    step: index,
                    message,
                })?;
        }

        log::info!(
            "scene '{}': finished after {} steps, last return value {}",
            scene.name,
            driver.steps_executed,
            driver.return_register
        );
        Ok(driver)
    }

    /// Execute one intent and check the stack depth invariant
    pub fn step(&mut self, intent: &Intent) -> Result<Vec<StepDescriptor>, ModelError> {
        let descriptors = self.execute(intent)?;

        if self.tracker.call_depth() + 1 != self.scopes.depth() {
            return Err(ModelError::precondition(format!(
                "call depth {} does not match scope depth {}",
                self.tracker.call_depth(),
                self.scopes.depth()
            )));
        }

        self.steps_executed += 1;
        Ok(descriptors)
    }

    fn execute(&mut self, intent: &Intent) -> Result<Vec<StepDescriptor>, ModelError> {
        let mut out = Vec::new();

        match intent {
            Intent::Goto(loc) => {
                self.tracker.advance(*loc)?;
                out.push(StepDescriptor::LocationChanged(*loc));
            }

            Intent::Assign { name, value } => {
                let value = self.eval(value, &mut out)?;
                self.assign(name, value, &mut out)?;
            }

            Intent::Append { list, item } => {
                let id = self.eval_container(list, &mut out)?;
                let value = self.eval(item, &mut out)?;
                self.heap.append(id, value.clone())?;
                out.push(StepDescriptor::ContainerAppended {
                    id,
                    value: value.clone(),
                });
                let index = self.heap.len(id)? - 1;
                self.update_cell_pointer(id, index, &value, &mut out)?;
            }

            Intent::Store { list, index, value } => {
                let id = self.eval_container(list, &mut out)?;
                let index = self.eval_int(index, &mut out)?;
                let index = self.checked_index(id, index)?;
                let value = self.eval(value, &mut out)?;
                self.heap.set_index(id, index, value.clone())?;
                out.push(StepDescriptor::ContainerIndexSet {
                    id,
                    index,
                    value: value.clone(),
                });
                self.update_cell_pointer(id, index, &value, &mut out)?;
            }

            Intent::Call {
                function,
                entry,
                params,
                slots_per_row,
            } => {
                // Arguments are evaluated in the caller's scope
                let mut args = Vec::with_capacity(params.len());
                for (name, operand) in params {
                    args.push((name.as_str(), self.eval(operand, &mut out)?));
                }

                self.tracker.enter_call(*entry)?;
                out.push(StepDescriptor::CallEntered {
                    function: function.clone(),
                    location: *entry,
                });

                let layout = SlotLayout::new(*slots_per_row);
                let scope = self.scopes.push_scope(function, layout);
                out.push(StepDescriptor::ScopeCreated {
                    scope,
                    label: function.clone(),
                    slots_per_row: layout.slots_per_row(),
                });

                for (name, value) in args {
                    self.bind_new(scope, name, value, &mut out)?;
                }
            }

            Intent::Return { value } => {
                if self.scopes.depth() <= 1 {
                    return Err(ModelError::precondition("return outside of a function"));
                }
                let value = match value {
                    Some(operand) => self.eval(operand, &mut out)?,
                    None => Value::Empty,
                };

                let depth = self.scopes.depth();
                while self.loops.last().is_some_and(|l| l.frame_depth >= depth) {
                    let Some(mut active) = self.loops.pop() else {
                        break;
                    };
                    active.iterator.break_early();
                    out.push(StepDescriptor::IteratorBroken { var: active.var });
                }

                let scope = self.scopes.top_id();
                for id in self.heap.remove_pointers_from_scope(scope) {
                    out.push(StepDescriptor::PointerRemoved { id });
                }
                self.scopes.pop_scope()?;
                out.push(StepDescriptor::ScopeDestroyed { scope });

                let site = self.tracker.return_from_call()?;
                out.push(StepDescriptor::CallReturned {
                    value: value.clone(),
                });
                out.push(StepDescriptor::LocationChanged(site));
                self.return_register = value;
            }

            Intent::LoopStart {
                var,
                start,
                stop,
                step,
            } => {
                let start = self.eval_int(start, &mut out)?;
                let stop = self.eval_int(stop, &mut out)?;
                let iterator = RangeIterator::new(start, stop, *step)?;
                out.push(StepDescriptor::IteratorStarted {
                    var: var.clone(),
                    values: iterator.values().to_vec(),
                });
                self.loops.push(ActiveLoop {
                    var: var.clone(),
                    iterator,
                    frame_depth: self.scopes.depth(),
                });
            }

            Intent::LoopNext => {
                let active = self.current_loop()?;
                let var = active.var.clone();
                let next = active
                    .iterator
                    .advance()
                    .map_err(|e| name_iterator(e, &var))?;
                match next {
                    Some(value) => {
                        out.push(StepDescriptor::IteratorAdvanced {
                            var: var.clone(),
                            value,
                        });
                        self.assign(&var, Value::Int(value), &mut out)?;
                    }
                    None => {
                        return Err(ModelError::precondition(format!(
                            "loop over '{}' has no values left",
                            var
                        )));
                    }
                }
            }

            Intent::LoopExit => {
                let active = self.current_loop()?;
                let var = active.var.clone();
                if let Some(value) = active
                    .iterator
                    .advance()
                    .map_err(|e| name_iterator(e, &var))?
                {
                    return Err(ModelError::precondition(format!(
                        "loop over '{}' left with {} still to visit",
                        var, value
                    )));
                }
                self.loops.pop();
                out.push(StepDescriptor::IteratorExhausted { var });
            }

            Intent::Break => {
                self.current_loop()?;
                if let Some(mut active) = self.loops.pop() {
                    active.iterator.break_early();
                    out.push(StepDescriptor::IteratorBroken { var: active.var });
                }
            }

            Intent::Check { condition, expect } => {
                let lhs = self.eval(&condition.lhs, &mut out)?;
                let rhs = self.eval(&condition.rhs, &mut out)?;
                let result = match condition.op {
                    Comparison::Eq => lhs == rhs,
                    Comparison::Ne => lhs != rhs,
                };
                out.push(StepDescriptor::ConditionEvaluated { result });

                if result != *expect {
                    return Err(ModelError::precondition(format!(
                        "`{}` is {} ({} vs {}) but the trace expects {}",
                        condition,
                        Value::Bool(result),
                        lhs,
                        rhs,
                        Value::Bool(*expect)
                    )));
                }
            }

            Intent::Finish => {
                if let Some(active) = self.loops.last() {
                    return Err(ModelError::precondition(format!(
                        "program finished inside the loop over '{}'",
                        active.var
                    )));
                }
                self.tracker.finish()?;
                out.push(StepDescriptor::ProgramFinished);
            }
        }

        Ok(out)
    }

    // ---------------------------------------------------------------------
    // Operand evaluation
    // ---------------------------------------------------------------------

    fn eval(&mut self, operand: &Operand, out: &mut Vec<StepDescriptor>) -> Result<Value, ModelError> {
        match operand {
            Operand::Lit(value) => Ok(value.clone()),
            Operand::Var(name) => Ok(self.scopes.lookup(name)?.value.clone()),
            Operand::Index(base, index) => {
                let id = self.eval_container(base, out)?;
                let index = self.eval_int(index, out)?;
                let index = self.checked_index(id, index)?;
                self.heap.get_index(id, index)
            }
            Operand::Offset(base, k) => {
                let v = self.eval_int(base, out)?;
                v.checked_add(*k).map(Value::Int).ok_or_else(|| {
                    ModelError::precondition(format!("`{}` overflows: {} + {}", operand, v, k))
                })
            }
            Operand::Len(base) => {
                let id = self.eval_container(base, out)?;
                Ok(Value::Int(self.heap.len(id)? as i64))
            }
            Operand::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, out)?);
                }
                self.allocate(values, out)
            }
            Operand::Repeat(item, count) => {
                let item = self.eval(item, out)?;
                let n = self.eval_int(count, out)?;
                if n > MAX_SEQUENCE_LEN as i64 {
                    return Err(ModelError::precondition(format!(
                        "`{}` would build {} items, more than {}",
                        operand, n, MAX_SEQUENCE_LEN
                    )));
                }
                self.allocate(vec![item; n.max(0) as usize], out)
            }
            Operand::Returned => Ok(self.return_register.clone()),
        }
    }

    fn eval_int(&mut self, operand: &Operand, out: &mut Vec<StepDescriptor>) -> Result<i64, ModelError> {
        let value = self.eval(operand, out)?;
        value.as_int().ok_or_else(|| ModelError::TypeMismatch {
            expected: "int",
            got: format!("{} {}", value.kind(), value),
        })
    }

    fn eval_container(
        &mut self,
        operand: &Operand,
        out: &mut Vec<StepDescriptor>,
    ) -> Result<ContainerId, ModelError> {
        let value = self.eval(operand, out)?;
        value.as_container().ok_or_else(|| ModelError::TypeMismatch {
            expected: "list",
            got: format!("{} {}", value.kind(), value),
        })
    }

    fn checked_index(&self, id: ContainerId, index: i64) -> Result<usize, ModelError> {
        let len = self.heap.len(id)?;
        if index < 0 || index as usize >= len {
            return Err(ModelError::OutOfBounds {
                container: id,
                index,
                len,
            });
        }
        Ok(index as usize)
    }

    /// Allocate a list; nested lists get a cell pointer each
    fn allocate(&mut self, values: Vec<Value>, out: &mut Vec<StepDescriptor>) -> Result<Value, ModelError> {
        let id = self.heap.create_container(values.clone())?;
        out.push(StepDescriptor::ContainerCreated {
            id,
            initial_values: values.clone(),
        });
        for (index, value) in values.iter().enumerate() {
            self.update_cell_pointer(id, index, value, out)?;
        }
        Ok(Value::Container(id))
    }

    // ---------------------------------------------------------------------
    // Bindings and pointers
    // ---------------------------------------------------------------------

    /// `name = value` in the top scope
    fn assign(&mut self, name: &str, value: Value, out: &mut Vec<StepDescriptor>) -> Result<(), ModelError> {
        let scope = self.scopes.top_id();
        let existing = self.scopes.top().get(name).map(|slot| slot.pointer);

        match existing {
            Some(pointer) => {
                let old = self.scopes.rebind(scope, name, value.clone())?;
                out.push(StepDescriptor::BindingUpdated {
                    scope,
                    name: name.to_string(),
                    old,
                    new: value.clone(),
                });
                self.update_slot_pointer(scope, name, pointer, &value, out)
            }
            None => self.bind_new(scope, name, value, out),
        }
    }

    fn bind_new(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: Value,
        out: &mut Vec<StepDescriptor>,
    ) -> Result<(), ModelError> {
        let slot = self.scopes.bind(scope, name, Slot::new(value.clone()))?;
        out.push(StepDescriptor::BindingCreated {
            scope,
            name: name.to_string(),
            value: value.clone(),
            slot,
        });
        self.update_slot_pointer(scope, name, None, &value, out)
    }

    /// Create, retarget or remove the arrow drawn from a variable slot
    fn update_slot_pointer(
        &mut self,
        scope: ScopeId,
        name: &str,
        current: Option<PointerId>,
        value: &Value,
        out: &mut Vec<StepDescriptor>,
    ) -> Result<(), ModelError> {
        let source = PointerSource::Slot {
            scope,
            name: name.to_string(),
        };
        let pointer = self.update_pointer(source, current, value, out)?;
        if pointer != current {
            self.scopes.set_pointer(scope, name, pointer)?;
        }
        Ok(())
    }

    /// Create, retarget or remove the arrow drawn from a list cell
    fn update_cell_pointer(
        &mut self,
        container: ContainerId,
        index: usize,
        value: &Value,
        out: &mut Vec<StepDescriptor>,
    ) -> Result<(), ModelError> {
        let source = PointerSource::Cell { container, index };
        let current = self.heap.pointer_from(&source);
        self.update_pointer(source, current, value, out)?;
        Ok(())
    }

    fn update_pointer(
        &mut self,
        source: PointerSource,
        current: Option<PointerId>,
        value: &Value,
        out: &mut Vec<StepDescriptor>,
    ) -> Result<Option<PointerId>, ModelError> {
        match (current, value.as_container()) {
            (Some(id), Some(target)) => {
                if self.heap.pointer(id)?.target != target {
                    self.heap.retarget(id, target)?;
                    out.push(StepDescriptor::PointerRetargeted {
                        id,
                        new_target: target,
                    });
                }
                Ok(Some(id))
            }
            (Some(id), None) => {
                self.heap.remove_pointer(id)?;
                out.push(StepDescriptor::PointerRemoved { id });
                Ok(None)
            }
            (None, Some(target)) => {
                let id = self.heap.make_pointer(source.clone(), target)?;
                out.push(StepDescriptor::PointerCreated { id, source, target });
                Ok(Some(id))
            }
            (None, None) => Ok(None),
        }
    }

    fn current_loop(&mut self) -> Result<&mut ActiveLoop, ModelError> {
        let depth = self.scopes.depth();
        match self.loops.last_mut() {
            Some(active) if active.frame_depth == depth => Ok(active),
            _ => Err(ModelError::precondition(
                "no loop is running in the current frame",
            )),
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn tracker(&self) -> &ExecutionTracker {
        &self.tracker
    }

    /// Running loops, outermost first
    pub fn loops(&self) -> &[ActiveLoop] {
        &self.loops
    }

    pub fn return_value(&self) -> &Value {
        &self.return_register
    }

    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    /// Value bound to `name` in the global scope
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.scopes.scopes().first()?.get(name).map(|slot| &slot.value)
    }

    /// Contents of a list of lists, as tokens (`None` for anything that is not a list of strings)
    pub fn grid(&self, id: ContainerId) -> Option<Vec<Vec<String>>> {
        let outer = self.heap.container(id).ok()?;
        outer
            .items
            .iter()
            .map(|row| {
                let row = self.heap.container(row.as_container()?).ok()?;
                row.items
                    .iter()
                    .map(|cell| cell.as_str().map(str::to_string))
                    .collect()
            })
            .collect()
    }
}

impl Default for SceneDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn name_iterator(error: ModelError, var: &str) -> ModelError {
    match error {
        ModelError::IteratorTerminated { var: None } => ModelError::IteratorTerminated {
            var: Some(var.to_string()),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::location::Location;
    use crate::scene::intent::Condition;

    fn call(function: &str, params: Vec<(&str, Operand)>) -> Intent {
        Intent::Call {
            function: function.to_string(),
            entry: Location::line(1, 0),
            params: params
                .into_iter()
                .map(|(n, op)| (n.to_string(), op))
                .collect(),
            slots_per_row: 2,
        }
    }

    fn assign(name: &str, value: Operand) -> Intent {
        Intent::Assign {
            name: name.to_string(),
            value,
        }
    }

    fn run_all(driver: &mut SceneDriver, intents: &[Intent]) -> Vec<StepDescriptor> {
        intents
            .iter()
            .flat_map(|i| driver.step(i).unwrap())
            .collect()
    }

    #[test]
    fn test_repeat_allocates_list() {
        let mut driver = SceneDriver::new();
        let out = driver
            .step(&assign("row", Operand::repeat(Operand::str(" "), Operand::int(3))))
            .unwrap();
        let id = driver.global("row").and_then(Value::as_container).unwrap();
        assert_eq!(driver.heap().len(id).unwrap(), 3);
        assert!(matches!(out[0], StepDescriptor::ContainerCreated { .. }));
        assert!(matches!(out[1], StepDescriptor::BindingCreated { .. }));
        assert!(matches!(out[2], StepDescriptor::PointerCreated { .. }));
    }

    #[test]
    fn test_call_args_alias_caller_list() {
        let mut driver = SceneDriver::new();
        run_all(
            &mut driver,
            &[
                assign("game_board", Operand::List(vec![])),
                Intent::Goto(Location::line(3, 0)),
                call("f", vec![("board", Operand::var("game_board"))]),
            ],
        );
        let id = driver.global("game_board").and_then(Value::as_container).unwrap();
        assert_eq!(driver.heap().pointers_to(id).len(), 2);
        assert_eq!(driver.tracker().call_depth(), 1);
    }

    #[test]
    fn test_return_ends_frame_loops_and_pointers() {
        let mut driver = SceneDriver::new();
        let out = run_all(
            &mut driver,
            &[
                assign("game_board", Operand::List(vec![])),
                Intent::Goto(Location::line(3, 0)),
                call("f", vec![("board", Operand::var("game_board"))]),
                Intent::LoopStart {
                    var: "row".to_string(),
                    start: Operand::int(0),
                    stop: Operand::int(5),
                    step: 1,
                },
                Intent::LoopNext,
                Intent::Return {
                    value: Some(Operand::var("row")),
                },
            ],
        );
        assert!(out.contains(&StepDescriptor::IteratorBroken {
            var: "row".to_string()
        }));
        assert!(driver.loops().is_empty());
        assert_eq!(driver.return_value(), &Value::Int(0));
        assert_eq!(driver.scopes().depth(), 1);
        assert_eq!(driver.tracker().current(), Some(Location::line(3, 0)));
        let id = driver.global("game_board").and_then(Value::as_container).unwrap();
        assert_eq!(driver.heap().pointers_to(id).len(), 1);
    }

    #[test]
    fn test_loop_exit_requires_exhaustion() {
        let mut driver = SceneDriver::new();
        run_all(
            &mut driver,
            &[
                Intent::LoopStart {
                    var: "i".to_string(),
                    start: Operand::int(0),
                    stop: Operand::int(2),
                    step: 1,
                },
                Intent::LoopNext,
            ],
        );
        assert!(matches!(
            driver.step(&Intent::LoopExit),
            Err(ModelError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_loop_next_past_end_fails() {
        let mut driver = SceneDriver::new();
        run_all(
            &mut driver,
            &[
                Intent::LoopStart {
                    var: "i".to_string(),
                    start: Operand::int(0),
                    stop: Operand::int(1),
                    step: 1,
                },
                Intent::LoopNext,
            ],
        );
        assert!(driver.step(&Intent::LoopNext).is_err());
    }

    #[test]
    fn test_check_divergence_is_fatal() {
        let mut driver = SceneDriver::new();
        let check = Intent::Check {
            condition: Condition::eq(Operand::int(1), Operand::int(2)),
            expect: true,
        };
        assert!(matches!(
            driver.step(&check),
            Err(ModelError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_store_out_of_bounds() {
        let mut driver = SceneDriver::new();
        driver
            .step(&assign("b", Operand::List(vec![Operand::str(" ")])))
            .unwrap();
        let err = driver
            .step(&Intent::Store {
                list: Operand::var("b"),
                index: Operand::int(1),
                value: Operand::str("G"),
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::OutOfBounds { index: 1, len: 1, .. }));
    }

    #[test]
    fn test_rebinding_scalar_removes_slot_pointer() {
        let mut driver = SceneDriver::new();
        driver.step(&assign("b", Operand::List(vec![]))).unwrap();
        let out = driver.step(&assign("b", Operand::int(0))).unwrap();
        assert!(matches!(out[1], StepDescriptor::PointerRemoved { .. }));
        assert!(driver.heap().pointers().is_empty());
    }

    #[test]
    fn test_return_at_global_scope_fails() {
        let mut driver = SceneDriver::new();
        assert!(driver.step(&Intent::Return { value: None }).is_err());
    }

    fn loop_over(var: &str, start: i64, stop: i64) -> Intent {
        Intent::LoopStart {
            var: var.to_string(),
            start: Operand::int(start),
            stop: Operand::int(stop),
            step: 1,
        }
    }

    #[test]
    fn test_break_ends_loop_early() {
        let mut driver = SceneDriver::new();
        run_all(
            &mut driver,
            &[
                loop_over("row", 0, 5),
                Intent::LoopNext,
                Intent::LoopNext,
                Intent::LoopNext,
            ],
        );
        assert_eq!(driver.global("row"), Some(&Value::Int(2)));

        let out = driver.step(&Intent::Break).unwrap();
        assert_eq!(
            out,
            vec![StepDescriptor::IteratorBroken {
                var: "row".to_string()
            }]
        );
        assert!(driver.loops().is_empty());
        // The loop variable keeps its last value
        assert_eq!(driver.global("row"), Some(&Value::Int(2)));

        assert!(matches!(
            driver.step(&Intent::LoopNext),
            Err(ModelError::PreconditionViolation { .. })
        ));
        assert!(matches!(
            driver.step(&Intent::LoopExit),
            Err(ModelError::PreconditionViolation { .. })
        ));
        assert!(driver.step(&Intent::Finish).is_ok());
    }

    #[test]
    fn test_break_needs_loop_in_current_frame() {
        let mut driver = SceneDriver::new();
        assert!(matches!(
            driver.step(&Intent::Break),
            Err(ModelError::PreconditionViolation { .. })
        ));

        run_all(
            &mut driver,
            &[
                loop_over("i", 0, 3),
                Intent::LoopNext,
                Intent::Goto(Location::line(3, 0)),
                call("f", vec![]),
            ],
        );
        // The caller's loop is out of reach from inside the call
        assert!(matches!(
            driver.step(&Intent::Break),
            Err(ModelError::PreconditionViolation { .. })
        ));
        assert_eq!(driver.loops().len(), 1);
    }

    #[test]
    fn test_offset_overflow_is_an_error() {
        let mut driver = SceneDriver::new();
        let err = driver
            .step(&assign("x", Operand::int(i64::MAX).offset(1)))
            .unwrap_err();
        assert!(matches!(err, ModelError::PreconditionViolation { .. }));
        assert_eq!(driver.global("x"), None);

        driver
            .step(&assign("y", Operand::int(i64::MIN).offset(5)))
            .unwrap();
        assert_eq!(driver.global("y"), Some(&Value::Int(i64::MIN + 5)));
    }

    #[test]
    fn test_oversized_repeat_is_rejected() {
        let mut driver = SceneDriver::new();
        let huge = Operand::repeat(Operand::str(" "), Operand::int(i64::MAX));
        assert!(matches!(
            driver.step(&assign("row", huge)),
            Err(ModelError::PreconditionViolation { .. })
        ));
        assert!(driver.heap().pointers().is_empty());

        let out = driver
            .step(&assign("row", Operand::repeat(Operand::str(" "), Operand::int(-2))))
            .unwrap();
        assert!(matches!(out[0], StepDescriptor::ContainerCreated { .. }));
    }

    #[test]
    fn test_huge_range_loop_is_rejected() {
        let mut driver = SceneDriver::new();
        assert!(driver.step(&loop_over("i", i64::MIN, i64::MAX)).is_err());
        assert!(driver.loops().is_empty());
        assert!(driver.step(&loop_over("i", i64::MAX - 1, i64::MAX)).is_ok());
    }
}
