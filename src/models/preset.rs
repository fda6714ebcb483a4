/// Fixed effect sequences, numbered 1 to 4.
const PRESET_1: &[&str] = &[
    "ditherRandom3",
    "shortsort",
    "slice",
    "inverse",
    "shortsort",
    "shortsort",
    "ditherRandom3",
    "drumrollVerticalWave",
    "ditherBayer3",
    "sortRows",
    "slicesort",
    "drumrollVertical",
];

const PRESET_2: &[&str] = &[
    "shortsort",
    "slice",
    "fractalGhosts",
    "sort",
    "fractalGhosts",
    "colorShift",
];

const PRESET_3: &[&str] = &["ditherRandom3", "focusImage", "scanlines"];

const PRESET_4: &[&str] = &[
    "ditherAtkinsons",
    "focusImage",
    "ditherRandom3",
    "focusImage",
];

/// A built-in effect sequence. Every step runs with default options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    One,
    Two,
    Three,
    Four,
    /// A single effect picked uniformly from the registry.
    Random,
}

impl Preset {
    /// 1 to 4 select a fixed sequence; anything else is [`Preset::Random`].
    pub fn from_number(number: i64) -> Self {
        match number {
            1 => Preset::One,
            2 => Preset::Two,
            3 => Preset::Three,
            4 => Preset::Four,
            _ => Preset::Random,
        }
    }

    /// Effect names in run order. Empty for [`Preset::Random`].
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            Preset::One => PRESET_1,
            Preset::Two => PRESET_2,
            Preset::Three => PRESET_3,
            Preset::Four => PRESET_4,
            Preset::Random => &[],
        }
    }
}
