use crate::foundation::core::Color;
use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Opaque identifier of a text layer, unique within one editing session.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// Anchor position as percentages of the target surface (`0..=100` on each axis).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerPosition {
    /// Horizontal position, percent of surface width.
    pub x: f64,
    /// Vertical position, percent of surface height.
    pub y: f64,
}

/// Drop shadow offset in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowOffset {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// Three gradient stops at offsets 0, 0.5 and 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientColors {
    /// Stop at offset 0.
    pub start: Color,
    /// Stop at offset 0.5.
    pub middle: Color,
    /// Stop at offset 1.
    pub end: Color,
}

impl Default for GradientColors {
    fn default() -> Self {
        Self {
            start: Color::rgb(255, 0, 0),
            middle: Color::rgb(0, 255, 0),
            end: Color::rgb(0, 0, 255),
        }
    }
}

/// Extra shear applied in the layer's local frame, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkewTransform {
    /// Shear along x, degrees.
    pub skew_x: f64,
    /// Shear along y, degrees.
    pub skew_y: f64,
}

/// One independently styled text element drawn between the background and the foreground.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLayer {
    /// Stable identifier.
    pub id: LayerId,
    /// Text content, may be empty.
    pub text: String,
    /// Anchor position in percent of the surface.
    pub position: LayerPosition,
    /// Font size in pixels (see [`crate::config::FontSizePolicy`]).
    pub font_size: f64,
    /// Requested font family; unknown families fall back.
    pub font_family: String,
    /// Solid fill used when `gradient` is off.
    pub color: Color,
    /// Degrees, clockwise positive.
    pub rotation: f64,
    /// Uniform scale multiplier.
    pub scale: f64,
    /// Layer alpha in `[0, 1]`.
    pub opacity: f64,
    /// Glyph blur radius in pixels.
    pub blur: f64,
    /// Drop shadow toggle.
    pub shadow: bool,
    /// Drop shadow color.
    pub shadow_color: Color,
    /// Drop shadow blur radius in pixels.
    pub shadow_blur: f64,
    /// Drop shadow offset in pixels.
    pub shadow_offset: ShadowOffset,
    /// Gradient fill toggle.
    pub gradient: bool,
    /// Gradient stops.
    pub gradient_colors: GradientColors,
    /// Local shear.
    pub transform: SkewTransform,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            id: LayerId::default(),
            text: "New Text".to_string(),
            position: LayerPosition { x: 50.0, y: 50.0 },
            font_size: 24.0,
            font_family: "Arial".to_string(),
            color: Color::WHITE,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            blur: 0.0,
            shadow: false,
            shadow_color: Color::BLACK,
            shadow_blur: 5.0,
            shadow_offset: ShadowOffset { x: 2.0, y: 2.0 },
            gradient: false,
            gradient_colors: GradientColors::default(),
            transform: SkewTransform::default(),
        }
    }
}

impl TextLayer {
    /// Default-styled layer with the given id.
    pub fn with_id(id: LayerId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Reject values no renderer can make sense of.
    pub fn validate(&self) -> TextBehindResult<()> {
        let finite = [
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("fontSize", self.font_size),
            ("rotation", self.rotation),
            ("scale", self.scale),
            ("opacity", self.opacity),
            ("blur", self.blur),
            ("shadowBlur", self.shadow_blur),
            ("shadowOffset.x", self.shadow_offset.x),
            ("shadowOffset.y", self.shadow_offset.y),
            ("transform.skewX", self.transform.skew_x),
            ("transform.skewY", self.transform.skew_y),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(TextBehindError::validation(format!(
                    "layer {}: {name} must be finite",
                    self.id.0
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.position.x) || !(0.0..=100.0).contains(&self.position.y)
        {
            return Err(TextBehindError::validation(format!(
                "layer {}: position must be within 0..=100 percent",
                self.id.0
            )));
        }
        if self.font_size <= 0.0 {
            return Err(TextBehindError::validation(format!(
                "layer {}: fontSize must be > 0",
                self.id.0
            )));
        }
        if self.scale < 0.0 {
            return Err(TextBehindError::validation(format!(
                "layer {}: scale must be >= 0",
                self.id.0
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(TextBehindError::validation(format!(
                "layer {}: opacity must be within 0..=1",
                self.id.0
            )));
        }
        if self.blur < 0.0 || self.shadow_blur < 0.0 {
            return Err(TextBehindError::validation(format!(
                "layer {}: blur radii must be >= 0",
                self.id.0
            )));
        }
        Ok(())
    }
}

/// Partial update of a [`TextLayer`]; every present field replaces the layer's value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLayerPatch {
    pub text: Option<String>,
    pub position: Option<LayerPosition>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<Color>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub blur: Option<f64>,
    pub shadow: Option<bool>,
    pub shadow_color: Option<Color>,
    pub shadow_blur: Option<f64>,
    pub shadow_offset: Option<ShadowOffset>,
    pub gradient: Option<bool>,
    pub gradient_colors: Option<GradientColors>,
    pub transform: Option<SkewTransform>,
}

impl TextLayerPatch {
    /// Merge onto `layer`, returning the updated copy. The input is left untouched, so a patch
    /// that fails validation changes nothing.
    pub fn apply_to(&self, layer: &TextLayer) -> TextBehindResult<TextLayer> {
        let mut out = layer.clone();
        if let Some(v) = &self.text {
            out.text = v.clone();
        }
        if let Some(v) = self.position {
            out.position = v;
        }
        if let Some(v) = self.font_size {
            out.font_size = v;
        }
        if let Some(v) = &self.font_family {
            out.font_family = v.clone();
        }
        if let Some(v) = self.color {
            out.color = v;
        }
        if let Some(v) = self.rotation {
            out.rotation = v;
        }
        if let Some(v) = self.scale {
            out.scale = v;
        }
        if let Some(v) = self.opacity {
            out.opacity = v;
        }
        if let Some(v) = self.blur {
            out.blur = v;
        }
        if let Some(v) = self.shadow {
            out.shadow = v;
        }
        if let Some(v) = self.shadow_color {
            out.shadow_color = v;
        }
        if let Some(v) = self.shadow_blur {
            out.shadow_blur = v;
        }
        if let Some(v) = self.shadow_offset {
            out.shadow_offset = v;
        }
        if let Some(v) = self.gradient {
            out.gradient = v;
        }
        if let Some(v) = self.gradient_colors {
            out.gradient_colors = v;
        }
        if let Some(v) = self.transform {
            out.transform = v;
        }
        out.validate()?;
        Ok(out)
    }

    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
