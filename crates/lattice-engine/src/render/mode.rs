use std::fmt;
use std::str::FromStr;

/// What the renderer draws each frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The embedded quad with the textured-geometry program.
    #[default]
    TexturedQuad,
    /// Every submesh of every loaded model with the albedo-model program.
    Mesh,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::TexturedQuad, Mode::Mesh];

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Mode::TexturedQuad => Mode::Mesh,
            Mode::Mesh => Mode::TexturedQuad,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::TexturedQuad => "quad",
            Mode::Mesh => "mesh",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown render mode '{0}' (expected 'quad' or 'mesh')")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quad" | "textured-quad" | "textured_quad" => Ok(Mode::TexturedQuad),
            "mesh" => Ok(Mode::Mesh),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
