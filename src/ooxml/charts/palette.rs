//! Fill color generators for synthesized charts.

use crate::common::RGBColor;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

/// Source of fill colors for chart steps that have no explicit color.
pub trait PaletteGenerator: Send + fmt::Debug {
    fn next_color(&mut self) -> RGBColor;
}

/// Palette shared between a presentation and its slides.
pub type SharedPalette = Arc<Mutex<Box<dyn PaletteGenerator>>>;

/// Wrap a generator so it can be handed to a presentation.
pub fn shared(palette: impl PaletteGenerator + 'static) -> SharedPalette {
    Arc::new(Mutex::new(Box::new(palette)))
}

/// Uniformly random 24-bit colors.
#[derive(Debug, Clone)]
pub struct RandomPalette {
    rng: StdRng,
}

impl RandomPalette {
    /// Seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PaletteGenerator for RandomPalette {
    fn next_color(&mut self) -> RGBColor {
        RGBColor::from_u32(self.rng.random_range(0..=0x00FF_FFFF))
    }
}

/// Cycles through a fixed list of colors.
#[derive(Debug, Clone)]
pub struct FixedPalette {
    colors: Vec<RGBColor>,
    next: usize,
}

impl FixedPalette {
    /// An empty list yields black.
    pub fn new(colors: Vec<RGBColor>) -> Self {
        Self { colors, next: 0 }
    }
}

impl PaletteGenerator for FixedPalette {
    fn next_color(&mut self) -> RGBColor {
        if self.colors.is_empty() {
            return RGBColor::BLACK;
        }
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_palette_is_reproducible() {
        let mut a = RandomPalette::seeded(7);
        let mut b = RandomPalette::seeded(7);
        let first: Vec<_> = (0..8).map(|_| a.next_color()).collect();
        let second: Vec<_> = (0..8).map(|_| b.next_color()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_palette_cycles() {
        let red = RGBColor::new(255, 0, 0);
        let blue = RGBColor::new(0, 0, 255);
        let mut palette = FixedPalette::new(vec![red, blue]);
        assert_eq!(palette.next_color(), red);
        assert_eq!(palette.next_color(), blue);
        assert_eq!(palette.next_color(), red);
        assert_eq!(FixedPalette::new(Vec::new()).next_color(), RGBColor::BLACK);
    }

    #[test]
    fn test_shared_palette_locks() {
        let palette = shared(FixedPalette::new(vec![RGBColor::WHITE]));
        let color = palette.lock().next_color();
        assert_eq!(color, RGBColor::WHITE);
    }
}
