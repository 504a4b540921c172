// Errors that abort a scene, with the step they happened at

use crate::execution::errors::ModelError;
use std::fmt;

/// Errors that abort a scene
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// A model operation failed while executing an intent
    Model {
        scene: String,
        step: usize,
        intent: String,
        source: ModelError,
    },

    /// The renderer refused a step (includes the snapshot memory limit)
    Renderer {
        scene: String,
        step: usize,
        message: String,
    },

    /// Scene configuration failed validation
    InvalidConfig { message: String },

    UnknownScene { name: String },
}

impl TraceError {
    /// Index of the step that failed, if the scene got that far
    pub fn step(&self) -> Option<usize> {
        match self {
            TraceError::Model { step, .. } | TraceError::Renderer { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Model {
                scene,
                step,
                intent,
                source,
            } => write!(
                f,
                "Scene '{}' failed at step {} ({}): {}",
                scene, step, intent, source
            ),
            TraceError::Renderer {
                scene,
                step,
                message,
            } => write!(
                f,
                "Renderer rejected step {} of scene '{}': {}",
                step, scene, message
            ),
            TraceError::InvalidConfig { message } => {
                write!(f, "Invalid scene configuration: {}", message)
            }
            TraceError::UnknownScene { name } => write!(f, "Unknown scene '{}'", name),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Model { source, .. } => Some(source),
            _ => None,
        }
    }
}
