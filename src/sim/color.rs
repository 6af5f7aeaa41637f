//! Ball/hole/wall colours and the per-colour score tables

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The five colours a ball, hole or coloured wall can carry.
///
/// Grey is the universal colour: a grey hole accepts any ball and a grey
/// ball is never penalised for entering the wrong hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BallColor {
    Grey,
    Orange,
    Blue,
    Green,
    Yellow,
}

impl BallColor {
    pub const ALL: [BallColor; 5] = [
        BallColor::Grey,
        BallColor::Orange,
        BallColor::Blue,
        BallColor::Green,
        BallColor::Yellow,
    ];

    /// Layout glyph for this colour ('0'..'4')
    pub fn code(self) -> char {
        match self {
            BallColor::Grey => '0',
            BallColor::Orange => '1',
            BallColor::Blue => '2',
            BallColor::Green => '3',
            BallColor::Yellow => '4',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c {
            '0' => Some(BallColor::Grey),
            '1' => Some(BallColor::Orange),
            '2' => Some(BallColor::Blue),
            '3' => Some(BallColor::Green),
            '4' => Some(BallColor::Yellow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BallColor::Grey => "grey",
            BallColor::Orange => "orange",
            BallColor::Blue => "blue",
            BallColor::Green => "green",
            BallColor::Yellow => "yellow",
        }
    }

    /// Map a config colour name to a colour.
    ///
    /// Unknown names fall back to yellow.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "grey" => BallColor::Grey,
            "orange" => BallColor::Orange,
            "blue" => BallColor::Blue,
            "green" => BallColor::Green,
            "yellow" => BallColor::Yellow,
            other => {
                log::warn!("Unknown colour '{}', falling back to yellow", other);
                BallColor::Yellow
            }
        }
    }

    /// Whether this is the universal (grey) colour
    #[inline]
    pub fn is_universal(self) -> bool {
        self == BallColor::Grey
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-colour score lookup for correct and wrong captures.
///
/// A ball copies its two entries when created or recoloured, so the
/// collision code only ever needs this read-only table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    increase: [f32; 5],
    decrease: [f32; 5],
}

impl ScoreTable {
    pub fn new(increase: [f32; 5], decrease: [f32; 5]) -> Self {
        Self { increase, decrease }
    }

    /// Build from the name-keyed maps found in the config file.
    /// Colours absent from a map score zero.
    pub fn from_named(increase: &BTreeMap<String, i64>, decrease: &BTreeMap<String, i64>) -> Self {
        let mut table = Self::default();
        for (name, value) in increase {
            table.increase[BallColor::from_name(name).index()] = *value as f32;
        }
        for (name, value) in decrease {
            table.decrease[BallColor::from_name(name).index()] = *value as f32;
        }
        table
    }

    /// Points for a ball of `color` entering a matching hole
    #[inline]
    pub fn increase(&self, color: BallColor) -> f32 {
        self.increase[color.index()]
    }

    /// Points lost for a ball of `color` entering a wrong hole
    #[inline]
    pub fn decrease(&self, color: BallColor) -> f32 {
        self.decrease[color.index()]
    }
}
