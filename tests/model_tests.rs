// Tests for the memory model and execution state

use codereel::execution::errors::ModelError;
use codereel::execution::location::Location;
use codereel::execution::loops::RangeIterator;
use codereel::execution::tracker::{ExecutionTracker, TrackerState};
use codereel::memory::heap::{Heap, PointerSource};
use codereel::memory::scope::{ScopeStack, Slot, SlotLayout};
use codereel::memory::value::Value;
use codereel::memory::ScopeId;

#[test]
fn test_range_iterator_yields_python_range() {
    let cases: [(i64, i64, i64, Vec<i64>); 4] = [
        (0, 6, 1, vec![0, 1, 2, 3, 4, 5]),
        (5, -1, -1, vec![5, 4, 3, 2, 1, 0]),
        (3, 6, 1, vec![3, 4, 5]),
        (4, 4, 1, vec![]),
    ];

    for (start, stop, step, expected) in cases {
        let mut it = RangeIterator::new(start, stop, step).unwrap();
        let mut produced = Vec::new();
        while let Some(v) = it.advance().unwrap() {
            produced.push(v);
        }
        assert_eq!(produced, expected, "range({}, {}, {})", start, stop, step);
        assert!(it.is_exhausted());
        // Exhaustion is sticky
        assert_eq!(it.advance().unwrap(), None);
    }
}

#[test]
fn test_zero_step_range_is_rejected() {
    assert!(matches!(
        RangeIterator::new(0, 5, 0),
        Err(ModelError::PreconditionViolation { .. })
    ));
}

#[test]
fn test_break_early_terminates_iterator() {
    let mut it = RangeIterator::new(0, 6, 1).unwrap();
    for expected in 0..3 {
        assert_eq!(it.advance().unwrap(), Some(expected));
    }
    // 3, 4 and 5 are still pending
    it.break_early();

    assert!(it.is_terminated());
    assert!(!it.is_exhausted());
    assert_eq!(it.current_binding().unwrap(), 2);
    for _ in 0..3 {
        assert!(matches!(
            it.advance(),
            Err(ModelError::IteratorTerminated { .. })
        ));
    }
}

#[test]
fn test_range_near_integer_limit() {
    let mut it = RangeIterator::new(i64::MAX - 1, i64::MAX, 2).unwrap();
    assert_eq!(it.advance().unwrap(), Some(i64::MAX - 1));
    assert_eq!(it.advance().unwrap(), None);
}

#[test]
fn test_heap_append_and_set_index() {
    let mut heap = Heap::new();
    let id = heap.create_container(vec![]).unwrap();

    heap.append(id, Value::str(" ")).unwrap();
    heap.append(id, Value::str(" ")).unwrap();
    assert_eq!(heap.len(id).unwrap(), 2);

    let old = heap.set_index(id, 1, Value::str("G")).unwrap();
    assert_eq!(old, Value::str(" "));
    assert_eq!(heap.get_index(id, 1).unwrap(), Value::str("G"));

    assert!(matches!(
        heap.set_index(id, 2, Value::str("B")),
        Err(ModelError::OutOfBounds { index: 2, len: 2, .. })
    ));
    // Failed writes leave the list alone
    assert_eq!(heap.len(id).unwrap(), 2);
}

#[test]
fn test_container_ids_are_not_reused() {
    let mut heap = Heap::new();
    let first = heap.create_container(vec![Value::Int(1)]).unwrap();
    heap.release(first).unwrap();
    let second = heap.create_container(vec![]).unwrap();

    assert_ne!(first, second);
    assert!(matches!(
        heap.append(first, Value::Int(2)),
        Err(ModelError::ReleasedContainer { .. })
    ));
}

#[test]
fn test_aliases_are_separate_pointers() {
    let mut heap = Heap::new();
    let list = heap.create_container(vec![]).unwrap();

    let a = heap
        .make_pointer(
            PointerSource::Slot {
                scope: ScopeId(0),
                name: "game_board".to_string(),
            },
            list,
        )
        .unwrap();
    let b = heap
        .make_pointer(
            PointerSource::Slot {
                scope: ScopeId(1),
                name: "board".to_string(),
            },
            list,
        )
        .unwrap();

    assert_ne!(a, b);
    assert_eq!(heap.pointers_to(list).len(), 2);

    let removed = heap.remove_pointers_from_scope(ScopeId(1));
    assert_eq!(removed, vec![b]);
    assert_eq!(heap.pointers_to(list), vec![a]);
}

#[test]
fn test_duplicate_bind_leaves_scope_unchanged() {
    let mut scopes = ScopeStack::new("global", SlotLayout::single_column());
    let frame = scopes.push_scope("add_token", SlotLayout::new(3));
    scopes.bind(frame, "column", Slot::new(Value::Int(2))).unwrap();

    let err = scopes
        .bind(frame, "column", Slot::new(Value::Int(4)))
        .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateName { .. }));

    let scope = scopes.scope(frame).unwrap();
    assert_eq!(scope.len(), 1);
    assert_eq!(scope.get("column").unwrap().value, Value::Int(2));
}

#[test]
fn test_slot_layout_fills_rows_left_to_right() {
    let mut scopes = ScopeStack::new("global", SlotLayout::single_column());
    let frame = scopes.push_scope("add_token", SlotLayout::new(3));
    let positions: Vec<_> = ["board", "column", "player", "row"]
        .iter()
        .map(|name| scopes.bind(frame, name, Slot::new(Value::Empty)).unwrap())
        .collect();

    assert_eq!((positions[0].row, positions[0].column), (0, 0));
    assert_eq!((positions[2].row, positions[2].column), (0, 2));
    assert_eq!((positions[3].row, positions[3].column), (1, 0));
}

#[test]
fn test_lookup_only_sees_top_scope() {
    let mut scopes = ScopeStack::new("global", SlotLayout::single_column());
    scopes
        .bind(ScopeId(0), "game_board", Slot::new(Value::Empty))
        .unwrap();
    scopes.push_scope("make_board", SlotLayout::single_column());

    assert!(matches!(
        scopes.lookup("game_board"),
        Err(ModelError::UnknownName { .. })
    ));
    scopes.pop_scope().unwrap();
    assert!(scopes.lookup("game_board").is_ok());
    assert!(scopes.pop_scope().is_err());
}

#[test]
fn test_tracker_call_sites() {
    let mut tracker = ExecutionTracker::new();
    assert_eq!(tracker.state(), TrackerState::Idle);
    assert!(tracker.enter_call(Location::line(1, 4)).is_err());

    let site = Location::new(20, 13, Some(31));
    tracker.advance(site).unwrap();
    tracker.enter_call(Location::line(1, 0)).unwrap();
    assert_eq!(tracker.call_depth(), 1);
    assert!(tracker.finish().is_err());

    assert_eq!(tracker.return_from_call().unwrap(), site);
    assert_eq!(tracker.current(), Some(site));
    assert!(tracker.return_from_call().is_err());

    tracker.finish().unwrap();
    assert_eq!(tracker.state(), TrackerState::Returned);
    assert!(tracker.advance(site).is_err());
}
