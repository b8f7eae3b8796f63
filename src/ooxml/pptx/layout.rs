//! Named page geometries.
//!
//! A presentation has one active page size. Slides copy the active
//! [`LayoutSpec`] when they are created, so switching layouts later only
//! affects slides added afterwards.

use crate::common::error::{ConfigurationError, Result};
use crate::common::unit::inches_to_emu;
use phf::phf_map;
use std::collections::HashMap;

/// Name of the preset selected for a fresh presentation.
pub const DEFAULT_LAYOUT: &str = "LAYOUT_16x9";

/// A page geometry in EMU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    /// Name as written to `presentation.xml` (`sldSz@type` for presets)
    pub name: String,
    pub width: i64,
    pub height: i64,
}

impl LayoutSpec {
    pub fn new(name: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

struct Preset {
    name: &'static str,
    width: i64,
    height: i64,
}

static PRESETS: phf::Map<&'static str, Preset> = phf_map! {
    "LAYOUT_4x3" => Preset { name: "screen4x3", width: 9_144_000, height: 6_858_000 },
    "LAYOUT_16x9" => Preset { name: "screen16x9", width: 9_144_000, height: 5_143_500 },
    "LAYOUT_16x10" => Preset { name: "screen16x10", width: 9_144_000, height: 5_715_000 },
    "LAYOUT_WIDE" => Preset { name: "custom", width: 12_192_000, height: 6_858_000 },
};

/// Registry of page layouts keyed by the name callers select them with.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: HashMap<String, LayoutSpec>,
    active: String,
}

impl LayoutRegistry {
    /// Create a registry holding the built-in presets, with
    /// [`DEFAULT_LAYOUT`] active.
    pub fn new() -> Self {
        let layouts = PRESETS
            .entries()
            .map(|(key, p)| (key.to_string(), LayoutSpec::new(p.name, p.width, p.height)))
            .collect();
        Self {
            layouts,
            active: DEFAULT_LAYOUT.to_string(),
        }
    }

    /// Register a custom layout.
    ///
    /// # Arguments
    /// * `name` - Unique, non-empty layout name
    /// * `width_in` - Page width in inches
    /// * `height_in` - Page height in inches
    pub fn register_layout(&mut self, name: &str, width_in: f64, height_in: f64) -> Result<&LayoutSpec> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyLayoutName.into());
        }
        for (axis, value) in [("width", width_in), ("height", height_in)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::InvalidDimension {
                    name: name.to_string(),
                    axis,
                    value,
                }
                .into());
            }
        }
        if self.layouts.contains_key(name) {
            return Err(ConfigurationError::DuplicateLayout {
                name: name.to_string(),
            }
            .into());
        }

        let spec = LayoutSpec::new(name, inches_to_emu(width_in), inches_to_emu(height_in));
        log::debug!(name = name, width = spec.width, height = spec.height; "Registered layout");
        Ok(self.layouts.entry(name.to_string()).or_insert(spec))
    }

    /// Make `name` the layout used by subsequently created slides.
    pub fn select_layout(&mut self, name: &str) -> Result<&LayoutSpec> {
        if !self.layouts.contains_key(name) {
            return Err(ConfigurationError::UnknownLayout(name.to_string()).into());
        }
        self.active = name.to_string();
        Ok(self.active())
    }

    pub fn get(&self, name: &str) -> Option<&LayoutSpec> {
        self.layouts.get(name)
    }

    /// The currently active layout.
    pub fn active(&self) -> &LayoutSpec {
        // `active` only ever holds a key that was checked on insertion.
        self.layouts
            .get(&self.active)
            .or_else(|| self.layouts.get(DEFAULT_LAYOUT))
            .unwrap_or(&FALLBACK)
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// Whether `spec` is one of the built-in presets (written with a
    /// `type` attribute on `p:sldSz`).
    pub fn is_preset(spec: &LayoutSpec) -> bool {
        PRESETS
            .values()
            .any(|p| p.name == spec.name && p.width == spec.width && p.height == spec.height)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static FALLBACK: LayoutSpec = LayoutSpec {
    name: String::new(),
    width: 9_144_000,
    height: 5_143_500,
};
