// Integration tests for the Connect Four scenes

use codereel::memory::value::Value;
use codereel::scene::config::{Move, SceneConfig};
use codereel::scene::driver::SceneDriver;
use codereel::scene::errors::TraceError;
use codereel::scene::step::{Renderer, Step, StepDescriptor, TraceRecorder};
use codereel::scene::{build_scene, SCENE_NAMES};
use codereel::snapshot::SnapshotRenderer;

fn play(name: &str) -> (SceneDriver, TraceRecorder) {
    let scene = build_scene(name, &SceneConfig::connect_four()).expect("scene should build");
    let mut recorder = TraceRecorder::new();
    let driver = SceneDriver::run(&scene, &mut recorder).expect("scene should play");
    (driver, recorder)
}

fn board(driver: &SceneDriver) -> Vec<Vec<String>> {
    let id = driver
        .global("game_board")
        .and_then(Value::as_container)
        .expect("game_board should hold a list");
    driver.grid(id).expect("game_board should be a grid of tokens")
}

#[test]
fn test_make_board_builds_blank_grid() {
    let (driver, _) = play("make-board");
    let grid = board(&driver);

    assert_eq!(grid.len(), 6);
    for row in &grid {
        assert_eq!(row.len(), 7);
        assert!(row.iter().all(|cell| cell == " "));
    }
    assert_eq!(driver.scopes().depth(), 1);
}

#[test]
fn test_make_board_rows_are_distinct_lists() {
    let (driver, _) = play("make-board");
    let id = driver.global("game_board").and_then(Value::as_container).unwrap();
    let rows = &driver.heap().container(id).unwrap().items;

    let mut ids: Vec<_> = rows.iter().filter_map(Value::as_container).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_add_token_drops_each_move_to_lowest_blank_row() {
    let (driver, _) = play("add-token");
    let grid = board(&driver);

    assert_eq!(grid[5][2], "G");
    assert_eq!(grid[4][2], "G");
    assert_eq!(grid[3][2], "B");
    assert_eq!(grid[5][4], "B");

    let filled: usize = grid
        .iter()
        .map(|row| row.iter().filter(|c| *c != " ").count())
        .sum();
    assert_eq!(filled, 4);
}

#[test]
fn test_add_token_with_custom_moves() {
    let mut config = SceneConfig::connect_four();
    config.moves = vec![Move::new(0, "B"), Move::new(0, "G")];
    let scene = build_scene("add-token", &config).unwrap();
    let driver = SceneDriver::run(&scene, &mut TraceRecorder::new()).unwrap();
    let grid = board(&driver);

    assert_eq!(grid[5][0], "B");
    assert_eq!(grid[4][0], "G");
}

#[test]
fn test_winner_results() {
    let expected = [
        ("winner-horizontal", "B"),
        ("winner-vertical", " "),
        ("winner-diagonal1", " "),
        ("winner-diagonal2", " "),
    ];

    for (name, token) in expected {
        let (driver, _) = play(name);
        assert_eq!(
            driver.global("winner"),
            Some(&Value::str(token)),
            "{} returned the wrong token",
            name
        );
        assert_eq!(driver.return_value(), &Value::str(token));
    }
}

#[test]
fn test_every_scene_returns_to_global_scope() {
    for name in SCENE_NAMES {
        let (driver, recorder) = play(name);
        assert_eq!(driver.scopes().depth(), 1, "{}", name);
        assert_eq!(driver.tracker().call_depth(), 0, "{}", name);
        assert!(driver.loops().is_empty(), "{}", name);
        assert_eq!(driver.tracker().current(), None, "{}", name);
        assert_eq!(
            recorder.descriptors().last(),
            Some(&StepDescriptor::ProgramFinished),
            "{}",
            name
        );
    }
}

#[test]
fn test_one_step_per_intent() {
    let scene = build_scene("winner-vertical", &SceneConfig::connect_four()).unwrap();
    let mut recorder = TraceRecorder::new();
    let driver = SceneDriver::run(&scene, &mut recorder).unwrap();

    assert_eq!(recorder.steps.len(), scene.intents.len());
    assert_eq!(driver.steps_executed(), scene.intents.len());
    for (i, step) in recorder.steps.iter().enumerate() {
        assert_eq!(step.index, i);
    }
}

#[test]
fn test_calls_and_returns_balance() {
    let (_, recorder) = play("add-token");
    let calls = recorder
        .descriptors()
        .filter(|d| matches!(d, StepDescriptor::CallEntered { .. }))
        .count();
    let returns = recorder
        .descriptors()
        .filter(|d| matches!(d, StepDescriptor::CallReturned { .. }))
        .count();
    let created = recorder
        .descriptors()
        .filter(|d| matches!(d, StepDescriptor::ScopeCreated { .. }))
        .count();
    let destroyed = recorder
        .descriptors()
        .filter(|d| matches!(d, StepDescriptor::ScopeDestroyed { .. }))
        .count();

    // make_board() plus one add_token() per move
    assert_eq!(calls, 5);
    assert_eq!(returns, calls);
    assert_eq!(created, calls);
    assert_eq!(destroyed, created);
}

#[test]
fn test_snapshot_renderer_agrees_with_model() {
    for name in SCENE_NAMES {
        let scene = build_scene(name, &SceneConfig::connect_four()).unwrap();
        let mut renderer = SnapshotRenderer::new(64 * 1024 * 1024).unwrap();
        let driver = SceneDriver::run(&scene, &mut renderer).unwrap();

        let state = renderer.state();
        assert!(state.finished, "{}", name);
        assert_eq!(state.pc, None, "{}", name);
        assert_eq!(state.scopes.len(), 1, "{}", name);

        let id = driver.global("game_board").and_then(Value::as_container).unwrap();
        assert_eq!(state.global("game_board"), driver.global("game_board"));
        assert_eq!(state.grid(id), driver.grid(id), "{}", name);

        // Initial snapshot plus one per step
        assert_eq!(renderer.history().len(), scene.intents.len() + 1);
    }
}

#[test]
fn test_unknown_scene_is_rejected() {
    let err = build_scene("winner-sideways", &SceneConfig::connect_four()).unwrap_err();
    assert!(matches!(err, TraceError::UnknownScene { .. }));
    assert_eq!(err.step(), None);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = SceneConfig::connect_four();
    config.moves.push(Move::new(9, "G"));
    let err = build_scene("add-token", &config).unwrap_err();
    assert!(matches!(err, TraceError::InvalidConfig { .. }));

    let mut config = SceneConfig::connect_four();
    config.partial_board.pop();
    let err = build_scene("winner-horizontal", &config).unwrap_err();
    assert!(matches!(err, TraceError::InvalidConfig { .. }));
}

/// Accepts `limit` steps, then refuses
struct FailingRenderer {
    seen: usize,
    limit: usize,
}

impl Renderer for FailingRenderer {
    fn apply(&mut self, _step: &Step) -> Result<(), String> {
        if self.seen == self.limit {
            return Err("canvas closed".to_string());
        }
        self.seen += 1;
        Ok(())
    }
}

#[test]
fn test_renderer_error_aborts_scene() {
    let scene = build_scene("make-board", &SceneConfig::connect_four()).unwrap();
    let mut renderer = FailingRenderer { seen: 0, limit: 3 };
    let err = SceneDriver::run(&scene, &mut renderer).unwrap_err();

    assert_eq!(renderer.seen, 3);
    assert_eq!(err.step(), Some(3));
    match err {
        TraceError::Renderer { step, message, .. } => {
            assert_eq!(step, 3);
            assert_eq!(message, "canvas closed");
        }
        other => panic!("expected a renderer error, got {}", other),
    }
}
