//! Scenes and the driver that plays them
//!
//! A [`Scene`] pairs a source listing with the declarative trace of one
//! tutorial segment. [`driver::SceneDriver`] executes the trace against a
//! fresh model and streams [`step::Step`]s to a [`step::Renderer`].
//!
//! ```text
//! SceneConfig → connect_four builder → Scene (listing + intents)
//!                                          │
//!                                 SceneDriver (model)
//!                                          │ Step per intent
//!                                          ▼
//!                                       Renderer
//! ```

pub mod config;
pub mod connect_four;
pub mod driver;
pub mod errors;
pub mod intent;
pub mod source;
pub mod step;

use config::{Direction, SceneConfig};
use errors::TraceError;
use intent::Intent;
use source::SourceText;

/// Names accepted by [`build_scene`], in tutorial order
pub const SCENE_NAMES: [&str; 6] = [
    "make-board",
    "add-token",
    "winner-horizontal",
    "winner-vertical",
    "winner-diagonal1",
    "winner-diagonal2",
];

/// A source listing and the trace played over it
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub source: SourceText,
    pub intents: Vec<Intent>,
}

/// Build a scene by name
pub fn build_scene(name: &str, config: &SceneConfig) -> Result<Scene, TraceError> {
    match name {
        "make-board" => connect_four::make_board_scene(config),
        "add-token" => connect_four::add_token_scene(config),
        _ => {
            let direction = Direction::ALL
                .into_iter()
                .find(|d| d.scene_name() == name)
                .ok_or_else(|| TraceError::UnknownScene {
                    name: name.to_string(),
                })?;
            connect_four::winner_scene(config, direction)
        }
    }
}
