/// The one error kind the demos know: something went wrong before the first frame.
use thiserror::Error;

/// Shader pipeline stage, used in compile diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal failure while preparing a frontend. Never retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {0}")]
    ProgramLink(String),

    #[error("failed to create {0}")]
    Resource(&'static str),

    #[error("drawing surface unavailable: {0}")]
    Surface(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_diagnostics() {
        let err = SetupError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:3: 'colour' undeclared".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader: 0:3: 'colour' undeclared"
        );
        assert_eq!(
            SetupError::Resource("vertex buffer").to_string(),
            "failed to create vertex buffer"
        );
    }
}
