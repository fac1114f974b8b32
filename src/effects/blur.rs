use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelBounds {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelBounds {
    /// Tight bounds of all pixels with non-zero alpha, or `None` for a fully transparent buffer.
    pub(crate) fn of_alpha(rgba: &[u8], width: u32, height: u32) -> Option<Self> {
        let mut out: Option<Self> = None;
        for y in 0..height {
            let row = &rgba[(y as usize * width as usize * 4)..((y as usize + 1) * width as usize * 4)];
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let x = x as u32;
                out = Some(match out {
                    None => Self {
                        x0: x,
                        y0: y,
                        x1: x + 1,
                        y1: y + 1,
                    },
                    Some(b) => Self {
                        x0: b.x0.min(x),
                        y0: b.y0.min(y),
                        x1: b.x1.max(x + 1),
                        y1: b.y1.max(y + 1),
                    },
                });
            }
        }
        out
    }

    /// Grow by `by` pixels on every side, clamped to the image.
    pub(crate) fn expand(self, by: u32, width: u32, height: u32) -> Self {
        Self {
            x0: self.x0.saturating_sub(by),
            y0: self.y0.saturating_sub(by),
            x1: self.x1.saturating_add(by).min(width),
            y1: self.y1.saturating_add(by).min(height),
        }
    }

    pub(crate) fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(self) -> u32 {
        self.y1 - self.y0
    }
}

/// Kernel radius covering three standard deviations.
pub(crate) fn kernel_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Gaussian blur of a premultiplied RGBA8 buffer with edge clamping.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> TextBehindResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TextBehindError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TextBehindError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur only the painted part of `buf`, in place.
///
/// Work is limited to the non-transparent bounds grown by the kernel radius. Pixels outside
/// that window are transparent before and after, so the result equals a full-buffer blur.
pub(crate) fn blur_painted_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> TextBehindResult<()> {
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(());
    }
    let Some(bounds) = PixelBounds::of_alpha(buf, width, height) else {
        return Ok(());
    };
    let window = bounds.expand(radius, width, height);
    let (ww, wh) = (window.width(), window.height());

    let mut region = Vec::with_capacity(ww as usize * wh as usize * 4);
    for y in window.y0..window.y1 {
        let start = (y as usize * width as usize + window.x0 as usize) * 4;
        region.extend_from_slice(&buf[start..start + ww as usize * 4]);
    }
    let blurred = blur_rgba8_premul(&region, ww, wh, radius, sigma)?;
    for (row, y) in (window.y0..window.y1).enumerate() {
        let start = (y as usize * width as usize + window.x0 as usize) * 4;
        let src = &blurred[row * ww as usize * 4..(row + 1) * ww as usize * 4];
        buf[start..start + ww as usize * 4].copy_from_slice(src);
    }
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TextBehindResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TextBehindError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding residue into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
