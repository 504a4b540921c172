//! Connect Four scene builders
//!
//! Each builder lays out the listing, then walks the sample algorithm over a
//! plain grid to decide which way every branch goes, emitting one intent per
//! visual step. Branches are emitted as `Check` intents carrying the outcome
//! seen on the grid, so the driver re-validates the path against the model.

use super::config::{Direction, Move, SceneConfig};
use super::errors::TraceError;
use super::intent::{Condition, Intent, Operand};
use super::source::SourceText;
use super::Scene;
use crate::execution::constants::{BLANK_TOKEN, FRAME_SLOTS_PER_ROW};
use crate::execution::location::Location;

const MAKE_BOARD: [&str; 5] = [
    "def make_board(width, height):",
    "  b = []",
    "  for row in range(0, height):",
    "    b.append([\" \"] * width)",
    "  return b",
];

const ADD_TOKEN: [&str; 8] = [
    "def add_token(col, player, board):",
    "  if board[0][col] != \" \":",
    "    return",
    "  for row in range(1, len(board)):",
    "    if board[row][col] != \" \":",
    "      board[row - 1][col] = player",
    "      return",
    "  board[row][col] = player",
];

type Grid = Vec<Vec<String>>;

/// Accumulates intents and tracks where the program counter will be
struct TraceBuilder {
    source: SourceText,
    intents: Vec<Intent>,
    at: Option<Location>,
    call_sites: Vec<Option<Location>>,
}

impl TraceBuilder {
    fn new(source: SourceText) -> Self {
        TraceBuilder {
            source,
            intents: Vec::new(),
            at: None,
            call_sites: Vec::new(),
        }
    }

    fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Move the program counter, skipping no-op moves
    fn goto(&mut self, loc: Location) {
        if self.at != Some(loc) {
            self.intents.push(Intent::Goto(loc));
            self.at = Some(loc);
        }
    }

    fn goto_statement(&mut self, line: usize) -> Result<(), TraceError> {
        let loc = self.source.statement(line)?;
        self.goto(loc);
        Ok(())
    }

    fn goto_span(&mut self, line: usize, needle: &str) -> Result<(), TraceError> {
        let loc = self.source.locate(line, needle)?;
        self.goto(loc);
        Ok(())
    }

    fn call(&mut self, function: &str, entry: Location, params: Vec<(&str, Operand)>) {
        self.call_sites.push(self.at);
        self.at = Some(entry);
        self.intents.push(Intent::Call {
            function: function.to_string(),
            entry,
            params: params
                .into_iter()
                .map(|(name, operand)| (name.to_string(), operand))
                .collect(),
            slots_per_row: FRAME_SLOTS_PER_ROW,
        });
    }

    fn ret(&mut self, value: Option<Operand>) {
        self.at = self.call_sites.pop().flatten();
        self.intents.push(Intent::Return { value });
    }

    fn check(&mut self, condition: Condition, expect: bool) {
        self.intents.push(Intent::Check { condition, expect });
    }

    fn loop_start(&mut self, var: &str, start: Operand, stop: Operand) {
        self.intents.push(Intent::LoopStart {
            var: var.to_string(),
            start,
            stop,
            step: 1,
        });
    }

    fn into_scene(mut self, name: &str) -> Scene {
        self.intents.push(Intent::Finish);
        Scene {
            name: name.to_string(),
            source: self.source,
            intents: self.intents,
        }
    }
}

fn var(name: &str) -> Operand {
    Operand::var(name)
}

/// `base[i][j]`
fn cell(base: &str, i: Operand, j: Operand) -> Operand {
    var(base).index(i).index(j)
}

fn blank() -> Operand {
    Operand::str(BLANK_TOKEN)
}

/// `game_board = make_board(7, 6)`
pub fn make_board_scene(config: &SceneConfig) -> Result<Scene, TraceError> {
    config.validate()?;

    let mut source = SourceText::new();
    let def = source.push_block(&MAKE_BOARD);
    source.blank_line();
    let call = source.push_line(make_board_call(config));

    let mut b = TraceBuilder::new(source);
    emit_make_board(&mut b, def, call, config)?;
    Ok(b.into_scene("make-board"))
}

/// The full first listing: build the board, then replay every move
pub fn add_token_scene(config: &SceneConfig) -> Result<Scene, TraceError> {
    config.validate()?;

    let mut source = SourceText::new();
    let make_def = source.push_block(&MAKE_BOARD);
    source.blank_line();
    let add_def = source.push_block(&ADD_TOKEN);
    source.blank_line();
    let make_call = source.push_line(make_board_call(config));
    let move_lines: Vec<usize> = config
        .moves
        .iter()
        .map(|m| source.push_line(add_token_call(m)))
        .collect();

    let mut b = TraceBuilder::new(source);
    let mut grid = emit_make_board(&mut b, make_def, make_call, config)?;
    for (m, line) in config.moves.iter().zip(move_lines) {
        emit_add_token(&mut b, add_def, line, m, &mut grid)?;
    }
    Ok(b.into_scene("add-token"))
}

/// `winner = winner_xxx(game_board)` on the partially played board
pub fn winner_scene(config: &SceneConfig, direction: Direction) -> Result<Scene, TraceError> {
    config.validate()?;

    let mut source = SourceText::new();
    let def = source.push_block(&winner_listing(direction));
    source.blank_line();
    let call = source.push_line(format!(
        "winner = {}(game_board)",
        direction.function_name()
    ));

    let mut b = TraceBuilder::new(source);

    // The board left behind by earlier play is already on screen
    let rows = config
        .partial_board
        .iter()
        .map(|row| Operand::List(row.iter().map(|token| Operand::str(token)).collect()))
        .collect();
    b.push(Intent::Assign {
        name: "game_board".to_string(),
        value: Operand::List(rows),
    });

    emit_winner(&mut b, def, call, direction, &config.partial_board)?;
    Ok(b.into_scene(direction.scene_name()))
}

fn make_board_call(config: &SceneConfig) -> String {
    format!("game_board = make_board({}, {})", config.width, config.height)
}

fn add_token_call(m: &Move) -> String {
    format!("add_token({}, \"{}\", game_board)", m.column, m.player)
}

fn emit_make_board(
    b: &mut TraceBuilder,
    def: usize,
    call: usize,
    config: &SceneConfig,
) -> Result<Grid, TraceError> {
    let width = config.width as i64;
    let height = config.height as i64;

    b.goto_span(call, &format!("make_board({}, {})", width, height))?;
    let entry = b.source.locate(def, "make_board(width, height)")?;
    b.call(
        "make_board",
        entry,
        vec![("width", Operand::int(width)), ("height", Operand::int(height))],
    );

    b.goto_statement(def + 1)?;
    b.push(Intent::Assign {
        name: "b".to_string(),
        value: Operand::List(vec![]),
    });

    b.goto_span(def + 2, "range(0, height)")?;
    b.loop_start("row", Operand::int(0), var("height"));
    for _ in 0..config.height {
        b.goto_statement(def + 2)?;
        b.push(Intent::LoopNext);
        b.goto_statement(def + 3)?;
        b.push(Intent::Append {
            list: var("b"),
            item: Operand::repeat(blank(), var("width")),
        });
    }
    b.goto_statement(def + 2)?;
    b.push(Intent::LoopExit);

    b.goto_statement(def + 4)?;
    b.ret(Some(var("b")));

    b.goto_statement(call)?;
    b.push(Intent::Assign {
        name: "game_board".to_string(),
        value: Operand::Returned,
    });

    Ok(vec![vec![BLANK_TOKEN.to_string(); config.width]; config.height])
}

fn emit_add_token(
    b: &mut TraceBuilder,
    def: usize,
    call: usize,
    m: &Move,
    grid: &mut Grid,
) -> Result<(), TraceError> {
    let col = m.column;
    let height = grid.len();

    b.goto_statement(call)?;
    let entry = b.source.locate(def, "add_token(col, player, board)")?;
    b.call(
        "add_token",
        entry,
        vec![
            ("col", Operand::int(col as i64)),
            ("player", Operand::str(&m.player)),
            ("board", var("game_board")),
        ],
    );

    // Column already full
    b.goto_span(def + 1, "board[0][col] != \" \"")?;
    let full = grid[0][col] != BLANK_TOKEN;
    b.check(
        Condition::ne(cell("board", Operand::int(0), var("col")), blank()),
        full,
    );
    if full {
        b.goto_statement(def + 2)?;
        b.ret(None);
        return Ok(());
    }

    b.goto_span(def + 3, "range(1, len(board))")?;
    b.loop_start("row", Operand::int(1), var("board").len());
    for row in 1..height {
        b.goto_statement(def + 3)?;
        b.push(Intent::LoopNext);

        b.goto_span(def + 4, "board[row][col] != \" \"")?;
        let occupied = grid[row][col] != BLANK_TOKEN;
        b.check(
            Condition::ne(cell("board", var("row"), var("col")), blank()),
            occupied,
        );
        if occupied {
            b.goto_statement(def + 5)?;
            b.push(Intent::Store {
                list: var("board").index(var("row").offset(-1)),
                index: var("col"),
                value: var("player"),
            });
            grid[row - 1][col] = m.player.clone();

            b.goto_statement(def + 6)?;
            b.ret(None);
            return Ok(());
        }
    }
    b.goto_statement(def + 3)?;
    b.push(Intent::LoopExit);

    // `row` keeps its last value, the bottom row
    b.goto_statement(def + 7)?;
    b.push(Intent::Store {
        list: var("board").index(var("row")),
        index: var("col"),
        value: var("player"),
    });
    grid[height - 1][col] = m.player.clone();
    b.ret(None);
    Ok(())
}

/// `name`, `name + k` or `name - k`
fn offset_text(name: &str, k: i64) -> String {
    match k {
        0 => name.to_string(),
        k if k < 0 => format!("{} - {}", name, -k),
        k => format!("{} + {}", name, k),
    }
}

fn minus_text(expr: &str, margin: i64) -> String {
    if margin == 0 {
        expr.to_string()
    } else {
        format!("{} - {}", expr, margin)
    }
}

fn row_range_text(direction: Direction) -> String {
    format!("range(0, {})", minus_text("len(b)", direction.row_margin()))
}

fn col_range_text(direction: Direction) -> String {
    let (start, margin) = direction.column_bounds();
    format!("range({}, {})", start, minus_text("len(b[row])", margin))
}

/// `b[row][col] == b[row + k*dr][col + k*dc]`
fn comparison_text(direction: Direction, k: i64) -> String {
    let (dr, dc) = direction.delta();
    format!(
        "b[row][col] == b[{}][{}]",
        offset_text("row", dr * k),
        offset_text("col", dc * k)
    )
}

fn winner_listing(direction: Direction) -> Vec<String> {
    vec![
        format!("def {}(b):", direction.function_name()),
        format!("  for row in {}:", row_range_text(direction)),
        format!("    for col in {}:", col_range_text(direction)),
        "      if b[row][col] == \" \":".to_string(),
        "        continue".to_string(),
        format!("      if ({} and", comparison_text(direction, 1)),
        format!("          {} and", comparison_text(direction, 2)),
        format!("          {}):", comparison_text(direction, 3)),
        "        return b[row][col]".to_string(),
        "  return \" \"".to_string(),
    ]
}

fn emit_winner(
    b: &mut TraceBuilder,
    def: usize,
    call: usize,
    direction: Direction,
    grid: &Grid,
) -> Result<(), TraceError> {
    let function = direction.function_name();
    let (dr, dc) = direction.delta();
    let (col_start, col_margin) = direction.column_bounds();
    let height = grid.len() as i64;
    let width = grid.first().map_or(0, |row| row.len()) as i64;
    let at = |r: i64, c: i64| grid[r as usize][c as usize].as_str();

    b.goto_statement(call)?;
    let entry = b.source.locate(def, &format!("{}(b)", function))?;
    b.call(function, entry, vec![("b", var("game_board"))]);

    b.goto_span(def + 1, &row_range_text(direction))?;
    b.loop_start(
        "row",
        Operand::int(0),
        var("b").len().offset(-direction.row_margin()),
    );

    let mut winner = None;
    'rows: for row in 0..height - direction.row_margin() {
        b.goto_statement(def + 1)?;
        b.push(Intent::LoopNext);

        b.goto_span(def + 2, &col_range_text(direction))?;
        b.loop_start(
            "col",
            Operand::int(col_start),
            var("b").index(var("row")).len().offset(-col_margin),
        );

        for col in col_start..width - col_margin {
            b.goto_statement(def + 2)?;
            b.push(Intent::LoopNext);

            b.goto_span(def + 3, "b[row][col] == \" \"")?;
            let empty = at(row, col) == BLANK_TOKEN;
            b.check(
                Condition::eq(cell("b", var("row"), var("col")), blank()),
                empty,
            );
            if empty {
                b.goto_statement(def + 4)?;
                continue;
            }

            // `and` short-circuits on the first mismatch
            let mut four = true;
            for k in 1..=3 {
                b.goto_span(def + 4 + k as usize, &comparison_text(direction, k))?;
                let same = at(row, col) == at(row + dr * k, col + dc * k);
                b.check(
                    Condition::eq(
                        cell("b", var("row"), var("col")),
                        cell("b", var("row").offset(dr * k), var("col").offset(dc * k)),
                    ),
                    same,
                );
                if !same {
                    four = false;
                    break;
                }
            }
            if four {
                b.goto_statement(def + 8)?;
                b.ret(Some(cell("b", var("row"), var("col"))));
                winner = Some(at(row, col).to_string());
                break 'rows;
            }
        }
        b.goto_statement(def + 2)?;
        b.push(Intent::LoopExit);
    }

    if winner.is_none() {
        b.goto_statement(def + 1)?;
        b.push(Intent::LoopExit);
        b.goto_statement(def + 9)?;
        b.ret(Some(blank()));
    }
    log::debug!(
        "{} on the partial board returns {:?}",
        function,
        winner.as_deref().unwrap_or(BLANK_TOKEN)
    );

    b.goto_statement(call)?;
    b.push(Intent::Assign {
        name: "winner".to_string(),
        value: Operand::Returned,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_matches_tutorial_program() {
        let scene = add_token_scene(&SceneConfig::connect_four()).unwrap();
        let lines = scene.source.lines();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[7], "  if board[0][col] != \" \":");
        assert_eq!(lines[15], "game_board = make_board(7, 6)");
        assert_eq!(lines[16], "add_token(2, \"G\", game_board)");
        assert_eq!(lines[19], "add_token(2, \"B\", game_board)");
    }

    #[test]
    fn test_winner_listing_text() {
        let lines = winner_listing(Direction::Diagonal2);
        assert_eq!(lines[1], "  for row in range(0, len(b) - 3):");
        assert_eq!(lines[2], "    for col in range(3, len(b[row])):");
        assert_eq!(lines[5], "      if (b[row][col] == b[row + 1][col - 1] and");
        assert_eq!(lines[7], "          b[row][col] == b[row + 3][col - 3]):");

        let lines = winner_listing(Direction::Horizontal);
        assert_eq!(lines[1], "  for row in range(0, len(b)):");
        assert_eq!(lines[2], "    for col in range(0, len(b[row]) - 3):");
        assert_eq!(lines[6], "          b[row][col] == b[row][col + 2] and");
    }

    #[test]
    fn test_scene_ends_with_finish() {
        for direction in Direction::ALL {
            let scene = winner_scene(&SceneConfig::connect_four(), direction).unwrap();
            assert_eq!(scene.intents.last(), Some(&Intent::Finish));
            assert!(matches!(scene.intents[0], Intent::Assign { .. }));
        }
    }

    #[test]
    fn test_no_redundant_gotos() {
        let scene = make_board_scene(&SceneConfig::connect_four()).unwrap();
        for pair in scene.intents.windows(2) {
            assert!(!matches!(pair, [Intent::Goto(a), Intent::Goto(b)] if a == b));
        }
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let mut config = SceneConfig::connect_four();
        config.width = 2;
        assert!(matches!(
            make_board_scene(&config),
            Err(TraceError::InvalidConfig { .. })
        ));
    }
}
