//! Load-time options.

use std::{fmt, path::PathBuf, str::FromStr};

/// How duplicate vertices are found while welding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeldStrategy {
    /// Scan the whole vertex buffer for each reference.
    #[default]
    Linear,
    /// Keep a map from vertex bit pattern to buffer index.
    Hashed,
}

impl FromStr for WeldStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(WeldStrategy::Linear),
            "hashed" | "hash" => Ok(WeldStrategy::Hashed),
            other => Err(format!("unknown weld strategy '{other}'")),
        }
    }
}

impl fmt::Display for WeldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeldStrategy::Linear => f.write_str("linear"),
            WeldStrategy::Hashed => f.write_str("hashed"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub weld: WeldStrategy,
    /// Directory `mtllib` names are resolved against. Defaults to the scene
    /// file's directory.
    pub material_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_weld(mut self, weld: WeldStrategy) -> Self {
        self.weld = weld;
        self
    }

    pub fn with_material_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.material_dir = Some(dir.into());
        self
    }
}
