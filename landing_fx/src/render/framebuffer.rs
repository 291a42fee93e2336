use bevy::prelude::*;

use super::Surface;

/// CPU raster in RGBA8 sRGB, laid out row-major to match an
/// `Rgba8UnormSrgb` texture so it can be copied straight into an `Image`.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    background: Srgba,
    pixels: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, background: Srgba) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut framebuffer = Self {
            width,
            height,
            background,
            pixels: vec![0; byte_len(width, height)],
        };
        framebuffer.clear();
        framebuffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[index..index + 4]);
        Some(out)
    }

    /// Reallocates to the new size and clears.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixels = vec![0; byte_len(self.width, self.height)];
        self.clear();
    }

    /// Source-over blend of `color` scaled by `coverage` into one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Srgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = (color.alpha * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let index = ((y as u64 * self.width as u64 + x as u64) * 4) as usize;
        let dst = &mut self.pixels[index..index + 4];
        for (channel, src) in [color.red, color.green, color.blue].into_iter().enumerate() {
            let blended = src.clamp(0.0, 1.0) * 255.0 * alpha + dst[channel] as f32 * (1.0 - alpha);
            dst[channel] = blended.round() as u8;
        }
        dst[3] = (alpha * 255.0 + dst[3] as f32 * (1.0 - alpha)).round() as u8;
    }

    /// Pixel rows and columns intersecting the square around `center`.
    fn bounds(&self, center: Vec2, radius: f32) -> Option<(i64, i64, i64, i64)> {
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return None;
        }
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((center.y + radius).ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

/// RGBA8 buffer size, computed in `usize` so large surfaces cannot wrap.
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

impl Surface for Framebuffer {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn clear(&mut self) {
        let rgba = to_rgba8(self.background);
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Srgba) {
        if !from.is_finite() || !to.is_finite() || width <= 0.0 {
            return;
        }
        // Coverage ramps from 1 to 0 over the half pixel outside the stroke.
        let reach = width * 0.5 + 0.5;
        let delta = to - from;
        let length_sq = delta.length_squared();

        let y0 = ((from.y.min(to.y) - reach).floor() as i64).max(0);
        let y1 = ((from.y.max(to.y) + reach).ceil() as i64).min(self.height as i64 - 1);
        for py in y0..=y1 {
            let cy = py as f32 + 0.5;
            // Horizontal span of the segment between cy - reach and cy + reach.
            let (xa, xb) = if delta.y.abs() < f32::EPSILON {
                (from.x.min(to.x), from.x.max(to.x))
            } else {
                let t0 = ((cy - reach - from.y) / delta.y).clamp(0.0, 1.0);
                let t1 = ((cy + reach - from.y) / delta.y).clamp(0.0, 1.0);
                let (xa, xb) = (from.x + delta.x * t0, from.x + delta.x * t1);
                (xa.min(xb), xa.max(xb))
            };
            let x0 = ((xa - reach).floor() as i64).max(0);
            let x1 = ((xb + reach).ceil() as i64).min(self.width as i64 - 1);
            for px in x0..=x1 {
                let point = Vec2::new(px as f32 + 0.5, cy);
                let t = if length_sq > 0.0 {
                    ((point - from).dot(delta) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let distance = point.distance(from + delta * t);
                let coverage = (reach - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Srgba) {
        let Some((x0, y0, x1, y1)) = self.bounds(center, radius) else {
            return;
        };
        for py in y0..=y1 {
            for px in x0..=x1 {
                let distance = Vec2::new(px as f32 + 0.5, py as f32 + 0.5).distance(center);
                if distance < radius {
                    self.blend(px, py, color, 1.0 - distance / radius);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba) {
        let Some((x0, y0, x1, y1)) = self.bounds(center, radius + 0.5) else {
            return;
        };
        for py in y0..=y1 {
            for px in x0..=x1 {
                let distance = Vec2::new(px as f32 + 0.5, py as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }
}

fn to_rgba8(color: Srgba) -> [u8; 4] {
    [color.red, color.green, color.blue, color.alpha].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn byte_len_does_not_wrap_in_u32() {
        assert_eq!(byte_len(70_000, 70_000), 19_600_000_000);
        assert_eq!(byte_len(3, 2), 24);
    }

    const BACKGROUND: Srgba = Srgba::new(0.0, 0.0, 0.0, 1.0);
    const WHITE: Srgba = Srgba::new(1.0, 1.0, 1.0, 1.0);

    #[test]
    fn clear_paints_background() {
        let mut fb = Framebuffer::new(4, 3, Srgba::new(1.0, 0.0, 0.0, 1.0));
        fb.fill_circle(Vec2::new(2.0, 1.5), 3.0, WHITE);
        fb.clear();

        assert_eq!(fb.bytes().len(), 4 * 3 * 4);
        assert!(fb.bytes().chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn zero_sized_buffers_are_clamped() {
        let fb = Framebuffer::new(0, 0, BACKGROUND);
        assert_eq!((fb.width(), fb.height()), (1, 1));
        assert_eq!(fb.pixel(1, 0), None);
    }

    #[test]
    fn circle_fills_its_center_and_leaves_the_rest() {
        let mut fb = Framebuffer::new(20, 20, BACKGROUND);
        fb.fill_circle(Vec2::new(10.0, 10.0), 3.0, WHITE);

        assert_eq!(fb.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(fb.pixel(15, 10), Some([0, 0, 0, 255]));
    }

    #[test]
    fn glow_fades_toward_its_edge() {
        let mut fb = Framebuffer::new(40, 40, BACKGROUND);
        fb.fill_glow(Vec2::new(20.0, 20.0), 15.0, WHITE);

        let near = fb.pixel(20, 20).unwrap()[0];
        let mid = fb.pixel(27, 20).unwrap()[0];
        let edge = fb.pixel(34, 20).unwrap()[0];
        assert!(near > mid && mid > edge, "{near} {mid} {edge}");
        assert_eq!(fb.pixel(38, 20), Some([0, 0, 0, 255]));
    }

    #[test]
    fn line_covers_its_path_only() {
        let mut fb = Framebuffer::new(30, 30, BACKGROUND);
        fb.stroke_line(Vec2::new(2.0, 2.5), Vec2::new(27.0, 27.5), 1.0, WHITE);

        assert!(fb.pixel(14, 14).unwrap()[0] > 100);
        assert!(fb.pixel(5, 5).unwrap()[0] > 100);
        assert_eq!(fb.pixel(25, 5), Some([0, 0, 0, 255]));
        assert_eq!(fb.pixel(5, 25), Some([0, 0, 0, 255]));
    }

    #[test]
    fn translucent_paint_blends_over_background() {
        let mut fb = Framebuffer::new(10, 10, BACKGROUND);
        fb.fill_circle(Vec2::new(5.0, 5.0), 3.0, Srgba::new(1.0, 1.0, 1.0, 0.5));

        let [r, g, b, a] = fb.pixel(5, 5).unwrap();
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn offscreen_and_degenerate_shapes_are_ignored() {
        let mut fb = Framebuffer::new(10, 10, BACKGROUND);
        fb.fill_circle(Vec2::new(-50.0, -50.0), 4.0, WHITE);
        fb.fill_glow(Vec2::new(5.0, 5.0), f32::NAN, WHITE);
        fb.stroke_line(Vec2::new(f32::INFINITY, 0.0), Vec2::ZERO, 1.0, WHITE);
        fb.stroke_line(Vec2::new(-100.0, -100.0), Vec2::new(-90.0, -80.0), 1.0, WHITE);

        assert!(fb.bytes().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }
}
