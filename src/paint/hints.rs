//! Rendering hints: a small key→value mapping consulted when a paint context is derived.

use std::collections::BTreeMap;

/// Color-conversion quality preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRendering {
    /// Let the pipeline choose.
    Default,
    /// Prefer speed.
    Speed,
    /// Prefer accuracy.
    Quality,
}

/// General rendering quality preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rendering {
    /// Let the pipeline choose.
    Default,
    /// Prefer speed.
    Speed,
    /// Prefer quality; texture sampling becomes bilinear unless interpolation is set.
    Quality,
}

/// Image sampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Closest texel.
    #[default]
    NearestNeighbor,
    /// Weighted 2×2 texel neighbourhood.
    Bilinear,
}

/// Hint keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HintKey {
    /// See [`ColorRendering`].
    ColorRendering,
    /// See [`Rendering`].
    Rendering,
    /// See [`Interpolation`].
    Interpolation,
}

/// A hint value; each value belongs to exactly one [`HintKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HintValue {
    /// Value for [`HintKey::ColorRendering`].
    ColorRendering(ColorRendering),
    /// Value for [`HintKey::Rendering`].
    Rendering(Rendering),
    /// Value for [`HintKey::Interpolation`].
    Interpolation(Interpolation),
}

impl HintValue {
    /// The key this value is stored under.
    pub fn key(self) -> HintKey {
        match self {
            Self::ColorRendering(_) => HintKey::ColorRendering,
            Self::Rendering(_) => HintKey::Rendering,
            Self::Interpolation(_) => HintKey::Interpolation,
        }
    }
}

impl From<ColorRendering> for HintValue {
    fn from(v: ColorRendering) -> Self {
        Self::ColorRendering(v)
    }
}

impl From<Rendering> for HintValue {
    fn from(v: Rendering) -> Self {
        Self::Rendering(v)
    }
}

impl From<Interpolation> for HintValue {
    fn from(v: Interpolation) -> Self {
        Self::Interpolation(v)
    }
}

/// Key→value rendering hints.
///
/// Values carry their key, so a value can never be stored under a foreign key.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "HintsRepr", into = "HintsRepr")]
pub struct RenderingHints {
    map: BTreeMap<HintKey, HintValue>,
}

impl RenderingHints {
    /// Empty hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set substituted when a caller supplies no hints: `ColorRendering::Default` only.
    pub fn default_color_rendering() -> Self {
        Self::new().with(ColorRendering::Default)
    }

    /// Builder-style [`RenderingHints::insert`].
    pub fn with(mut self, value: impl Into<HintValue>) -> Self {
        self.insert(value);
        self
    }

    /// Store `value` under its key, returning the value it replaced.
    pub fn insert(&mut self, value: impl Into<HintValue>) -> Option<HintValue> {
        let value = value.into();
        self.map.insert(value.key(), value)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: HintKey) -> Option<HintValue> {
        self.map.get(&key).copied()
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&mut self, key: HintKey) -> Option<HintValue> {
        self.map.remove(&key)
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when no key is set.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (HintKey, HintValue)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }

    /// Typed [`HintKey::ColorRendering`] value.
    pub fn color_rendering(&self) -> Option<ColorRendering> {
        match self.get(HintKey::ColorRendering) {
            Some(HintValue::ColorRendering(v)) => Some(v),
            _ => None,
        }
    }

    /// Typed [`HintKey::Rendering`] value.
    pub fn rendering(&self) -> Option<Rendering> {
        match self.get(HintKey::Rendering) {
            Some(HintValue::Rendering(v)) => Some(v),
            _ => None,
        }
    }

    /// Typed [`HintKey::Interpolation`] value.
    pub fn interpolation(&self) -> Option<Interpolation> {
        match self.get(HintKey::Interpolation) {
            Some(HintValue::Interpolation(v)) => Some(v),
            _ => None,
        }
    }

    /// Texture filter implied by these hints.
    ///
    /// An explicit interpolation hint wins; otherwise `Rendering::Quality` selects bilinear.
    pub fn resolve_interpolation(&self) -> Interpolation {
        match (self.interpolation(), self.rendering()) {
            (Some(i), _) => i,
            (None, Some(Rendering::Quality)) => Interpolation::Bilinear,
            _ => Interpolation::NearestNeighbor,
        }
    }
}

/// Hints after the absent-hints normalization step.
///
/// Context derivation always hands concrete hints to the tiling sampler: caller hints are used
/// verbatim, a missing set is replaced by [`RenderingHints::default_color_rendering`].
#[derive(Clone, Debug)]
pub enum ResolvedHints<'a> {
    /// Caller-supplied hints.
    Provided(&'a RenderingHints),
    /// Substituted defaults.
    Defaulted(RenderingHints),
}

impl<'a> ResolvedHints<'a> {
    /// Apply the normalization step.
    pub fn normalize(hints: Option<&'a RenderingHints>) -> Self {
        match hints {
            Some(h) => Self::Provided(h),
            None => Self::Defaulted(RenderingHints::default_color_rendering()),
        }
    }

    /// The concrete hints.
    pub fn get(&self) -> &RenderingHints {
        match self {
            Self::Provided(h) => h,
            Self::Defaulted(h) => h,
        }
    }

    /// Whether defaults were substituted.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct HintsRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color_rendering: Option<ColorRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rendering: Option<Rendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpolation: Option<Interpolation>,
}

impl From<HintsRepr> for RenderingHints {
    fn from(r: HintsRepr) -> Self {
        let mut out = Self::new();
        if let Some(v) = r.color_rendering {
            out.insert(v);
        }
        if let Some(v) = r.rendering {
            out.insert(v);
        }
        if let Some(v) = r.interpolation {
            out.insert(v);
        }
        out
    }
}

impl From<RenderingHints> for HintsRepr {
    fn from(h: RenderingHints) -> Self {
        Self {
            color_rendering: h.color_rendering(),
            rendering: h.rendering(),
            interpolation: h.interpolation(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/hints.rs"]
mod tests;
