use serde::{Deserialize, Serialize};

/// How channel bytes are turned into tensor values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Byte values passed through as floats, 0..=255.
    #[default] Raw,
    /// Divided by 255, 0..=1.
    UnitRange,
    /// `(v - 127.5) / 128`, roughly -1..=1. Face embedding models expect this.
    Symmetric,
}

impl Normalization {
    #[inline]
    pub fn apply(&self, v: u8) -> f32 {
        match self {
            Normalization::Raw => v as f32,
            Normalization::UnitRange => v as f32 / 255.0,
            Normalization::Symmetric => (v as f32 - 127.5) / 128.0,
        }
    }
}

impl From<bool> for Normalization {
    fn from(normalize: bool) -> Self {
        if normalize {
            Normalization::UnitRange
        } else {
            Normalization::Raw
        }
    }
}
