use std::fmt;

use thiserror::Error;

/// Which half of a tick an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Update,
    Render,
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePhase::Update => write!(f, "update"),
            FramePhase::Render => write!(f, "render"),
        }
    }
}

/// Stage of a render pass walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    Begin,
    Content,
    End,
}

impl fmt::Display for PassStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStage::Begin => write!(f, "begin"),
            PassStage::Content => write!(f, "content"),
            PassStage::End => write!(f, "end"),
        }
    }
}

/// Per-frame failure inside a hook, pass, or world. Propagated unguarded to
/// the host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("engine hook '{hook}' failed during {phase}: {message}")]
    Hook {
        hook: String,
        phase: FramePhase,
        message: String,
    },

    #[error("render pass '{pass}' failed at {stage}: {message}")]
    Pass {
        pass: String,
        stage: PassStage,
        message: String,
    },

    #[error("world '{world}' failed during {phase}: {message}")]
    World {
        world: String,
        phase: FramePhase,
        message: String,
    },

    #[error("no world named '{name}' is registered")]
    UnknownWorld { name: String },

    #[error("world manager slot empty during {0}")]
    ManagerDetached(FramePhase),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_error_names_phase() {
        let err = FrameError::Hook {
            hook: "fps-title".into(),
            phase: FramePhase::Update,
            message: "window gone".into(),
        };
        let text = err.to_string();
        assert!(text.contains("fps-title"));
        assert!(text.contains("update"));
    }

    #[test]
    fn pass_error_names_stage() {
        let err = FrameError::Pass {
            pass: "bloom".into(),
            stage: PassStage::Begin,
            message: "missing source".into(),
        };
        assert!(err.to_string().contains("begin"));
    }
}
