use rand::RngCore;
use std::collections::BTreeMap;

use crate::buffer::PixelBuffer;
use crate::effects::*;
use crate::error::EffectError;

/// Runs one effect with default options.
pub type EffectFn = fn(&mut PixelBuffer, &mut dyn RngCore) -> Result<(), EffectError>;

/// Alternative names accepted by [`EffectRegistry::get`].
const ALIASES: &[(&str, &str)] = &[
    ("invert", Inverse::NAME),
    ("dumbSortRows", SortRows::NAME),
    ("rgb_glitch", RgbGlitch::NAME),
];

fn run_default<E: ImageEffect + Default>(
    image: &mut PixelBuffer,
    rng: &mut dyn RngCore,
) -> Result<(), EffectError> {
    E::default().apply(image, rng)
}

/// Name → effect table, built once and owned by a
/// [`Glitcher`](super::Glitcher).
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    effects: BTreeMap<&'static str, EffectFn>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            effects: BTreeMap::new(),
        };

        registry.register::<RgbShift>();
        registry.register::<RedShift>();
        registry.register::<GreenShift>();
        registry.register::<BlueShift>();
        registry.register::<ColorShift>();
        registry.register::<ColorShift2>();
        registry.register::<SuperShift>();
        registry.register::<RgbGlitch>();

        registry.register::<Dither8Bit>();
        registry.register::<DitherAtkinsons>();
        registry.register::<DitherFloydSteinberg>();
        registry.register::<DitherBayer>();
        registry.register::<DitherBayer3>();
        registry.register::<DitherRandom>();
        registry.register::<DitherRandom3>();
        registry.register::<DitherHalftone>();
        registry.register::<DitherBitmask>();

        registry.register::<Sort>();
        registry.register::<SortRows>();
        registry.register::<RandomSortRows>();
        registry.register::<SortStripe>();
        registry.register::<Slicesort>();
        registry.register::<Shortsort>();
        registry.register::<Shortdumbsort>();
        registry.register::<PixelSort>();
        registry.register::<Fractal>();
        registry.register::<FractalGhosts>();

        registry.register::<Slice>();
        registry.register::<SelectSlice>();
        registry.register::<SuperSlice>();
        registry.register::<DrumrollHorizontal>();
        registry.register::<DrumrollHorizontalWave>();
        registry.register::<DrumrollVertical>();
        registry.register::<DrumrollVerticalWave>();
        registry.register::<FocusImage>();
        registry.register::<PixelFunk>();
        registry.register::<Inverse>();
        registry.register::<Scanlines>();

        registry
    }

    fn register<E: ImageEffect + Default>(&mut self) {
        self.effects.insert(E::NAME, run_default::<E>);
    }

    /// Look up an effect by name or alias.
    pub fn get(&self, name: &str) -> Option<EffectFn> {
        let name = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| target);
        self.effects.get(name).copied()
    }

    /// Canonical name for `name`, resolving aliases.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        let name = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| target);
        self.effects.get_key_value(name).map(|(key, _)| *key)
    }

    /// Run `name` with default options.
    pub fn apply(
        &self,
        name: &str,
        image: &mut PixelBuffer,
        rng: &mut dyn RngCore,
    ) -> Result<(), EffectError> {
        let effect = self
            .get(name)
            .ok_or_else(|| EffectError::UnknownEffect(name.to_string()))?;
        effect(image, rng)
    }

    /// Registered names in sorted order (aliases excluded).
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.effects.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
