use crate::foundation::core::{Color, Point, Vec2};
use crate::scene::layer::TextLayer;

/// One color stop of a linear gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis in `[0, 1]`.
    pub offset: f32,
    pub color: Color,
}

/// Horizontal gradient in the layer's local frame, from `x0` to `x1`.
///
/// Points before `x0` take the first stop, points past `x1` take the last one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub x1: f64,
    pub stops: [GradientStop; 3],
}

impl LinearGradient {
    /// Color at local x coordinate `x`.
    pub fn sample(&self, x: f64) -> Color {
        let span = self.x1 - self.x0;
        let t = if span.abs() <= f64::EPSILON {
            0.0
        } else {
            ((x - self.x0) / span).clamp(0.0, 1.0) as f32
        };

        let [a, b, c] = self.stops;
        if t <= a.offset {
            return a.color;
        }
        if t >= c.offset {
            return c.color;
        }
        let (lo, hi) = if t <= b.offset { (a, b) } else { (b, c) };
        let seg = hi.offset - lo.offset;
        if seg <= f32::EPSILON {
            return hi.color;
        }
        lo.color.lerp(hi.color, (t - lo.offset) / seg)
    }
}

/// Paint used for glyph fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillPaint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl FillPaint {
    /// Color at a point in the layer's local (pre-transform) frame.
    pub fn sample(&self, local: Point) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::LinearGradient(g) => g.sample(local.x),
        }
    }

    /// True when every sample is the same color.
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Solid(_))
    }
}

/// Drop shadow parameters in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    pub color: Color,
    /// Gaussian standard deviation of the shadow, in pixels.
    pub sigma: f32,
    /// Device-space offset; unaffected by the layer's rotation, scale and skew.
    pub offset: Vec2,
}

/// Everything needed to paint one layer, scoped to that layer's draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub fill: FillPaint,
    pub shadow: Option<ShadowParams>,
    /// Global alpha in `[0, 1]`.
    pub alpha: f32,
    /// Gaussian standard deviation of the layer blur, in pixels; `0` disables it.
    pub blur_sigma: f32,
}

/// Resolve a layer's paint for a glyph run `text_width` local units wide.
///
/// The run is centered on the local origin, so a gradient spans `[-w/2, w/2]`. `px_scale`
/// converts the layer's pixel-valued effect sizes (blur radii, shadow offset) to the target
/// surface.
pub fn resolve_style(layer: &TextLayer, text_width: f64, px_scale: f64) -> ResolvedStyle {
    let fill = if layer.gradient {
        let half = text_width.max(0.0) / 2.0;
        let colors = &layer.gradient_colors;
        FillPaint::LinearGradient(LinearGradient {
            x0: -half,
            x1: half,
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: colors.start,
                },
                GradientStop {
                    offset: 0.5,
                    color: colors.middle,
                },
                GradientStop {
                    offset: 1.0,
                    color: colors.end,
                },
            ],
        })
    } else {
        FillPaint::Solid(layer.color)
    };

    let px_scale = if px_scale.is_finite() && px_scale > 0.0 {
        px_scale
    } else {
        1.0
    };

    let shadow = if layer.shadow {
        let offset = Vec2::new(
            layer.shadow_offset.x * px_scale,
            layer.shadow_offset.y * px_scale,
        );
        // A canvas shadow only shows when it is both colored and displaced or blurred.
        let sigma = (layer.shadow_blur.max(0.0) * px_scale / 2.0) as f32;
        let visible = layer.shadow_color.a > 0 && (sigma > 0.0 || offset.hypot() > 0.0);
        visible.then_some(ShadowParams {
            color: layer.shadow_color,
            sigma,
            offset,
        })
    } else {
        None
    };

    ResolvedStyle {
        fill,
        shadow,
        alpha: layer.opacity.clamp(0.0, 1.0) as f32,
        blur_sigma: (layer.blur.max(0.0) * px_scale) as f32,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/style.rs"]
mod tests;
