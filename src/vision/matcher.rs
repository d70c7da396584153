// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Zero-mean normalized cross-correlation template matching.
//!
//! For every placement of the template inside the image the score is
//!
//! ```text
//!              Σ (T(x',y') - mean T) · (I(x+x',y+y') - mean I_window)
//! R(x,y) = ---------------------------------------------------------------
//!          sqrt( Σ (T - mean T)² · Σ (I_window - mean I_window)² )
//! ```
//!
//! which lies in `[-1, 1]` and is 1 for an exact (or affinely brightened) copy.
//! Window sums come from integral images. Because the zero-mean template sums
//! to zero, the window mean drops out of the cross term, which leaves a plain
//! cross-correlation. Large searches compute it for every placement at once in
//! the frequency domain; small ones sum it directly.

use super::frame::LumaImage;
use super::spectrum::{Complex, Grid};

/// Mean squared deviation below which a template or window counts as flat.
/// One 8-bit grey level is about 1.5e-5 in squared `[0, 1]` units.
const FLAT_VARIANCE: f64 = 1e-9;

/// Direct summation wins while its multiply count stays under this many
/// times the FFT's `cells * log2(cells)`.
const DIRECT_COST_FACTOR: usize = 4;

/// Best placement of a template: top-left corner within the searched image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Summed-area tables of pixel values and squared pixel values.
struct IntegralImage {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl IntegralImage {
    fn new(image: &LumaImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let stride = width + 1;
        let mut sum = vec![0.0; stride * (height + 1)];
        let mut sum_sq = vec![0.0; stride * (height + 1)];
        let raw = image.as_raw();

        for y in 0..height {
            let mut row_sum = 0.0;
            let mut row_sum_sq = 0.0;
            for x in 0..width {
                let v = raw[y * width + x] as f64;
                row_sum += v;
                row_sum_sq += v * v;
                let at = (y + 1) * stride + (x + 1);
                sum[at] = sum[at - stride] + row_sum;
                sum_sq[at] = sum_sq[at - stride] + row_sum_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let (a, b) = (y * self.stride + x, y * self.stride + x + w);
        let (c, d) = ((y + h) * self.stride + x, (y + h) * self.stride + x + w);
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }
}

/// Slide `template` over `image` and return the highest-scoring placement.
///
/// Returns `None` when the template is empty or does not fit inside the image.
/// Ties keep the first placement in row-major order.
pub fn match_template(image: &LumaImage, template: &LumaImage) -> Option<MatchScore> {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let (tw, th) = (template.width() as usize, template.height() as usize);
    if tw == 0 || th == 0 || tw > iw || th > ih {
        return None;
    }

    let n = (tw * th) as f64;
    let t_mean = template.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
    let t_zero: Vec<f64> = template.as_raw().iter().map(|&v| v as f64 - t_mean).collect();
    let t_energy: f64 = t_zero.iter().map(|v| v * v).sum();

    let flat = n * FLAT_VARIANCE;
    if t_energy <= flat {
        return Some(MatchScore {
            x: 0,
            y: 0,
            score: 0.0,
        });
    }

    let (cols, rows) = (iw - tw + 1, ih - th + 1);
    let cross = cross_terms(image, &t_zero, tw, th);
    let integral = IntegralImage::new(image);
    let mut best: Option<MatchScore> = None;

    for y in 0..rows {
        for x in 0..cols {
            let (sum, sum_sq) = integral.window(x, y, tw, th);
            let w_energy = (sum_sq - sum * sum / n).max(0.0);
            let score = if w_energy <= flat {
                0.0
            } else {
                (cross[y * cols + x] / (t_energy * w_energy).sqrt()).clamp(-1.0, 1.0)
            };

            if best.map_or(true, |b| score as f32 > b.score) {
                best = Some(MatchScore {
                    x: x as u32,
                    y: y as u32,
                    score: score as f32,
                });
            }
        }
    }

    best
}

/// `Σ I(x+x', y+y') · t(x', y')` for every placement, row-major.
fn cross_terms(image: &LumaImage, t_zero: &[f64], tw: usize, th: usize) -> Vec<f64> {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let placements = (iw - tw + 1) * (ih - th + 1);
    let (gw, gh) = (iw.next_power_of_two(), ih.next_power_of_two());
    let fft_cost = gw * gh * (gw.trailing_zeros() + gh.trailing_zeros()).max(1) as usize;

    if placements * tw * th <= DIRECT_COST_FACTOR * fft_cost {
        direct_cross_terms(image, t_zero, tw, th)
    } else {
        spectral_cross_terms(image, t_zero, tw, th)
    }
}

fn direct_cross_terms(image: &LumaImage, t_zero: &[f64], tw: usize, th: usize) -> Vec<f64> {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let (cols, rows) = (iw - tw + 1, ih - th + 1);
    let raw = image.as_raw();
    let mut cross = Vec::with_capacity(cols * rows);

    for y in 0..rows {
        for x in 0..cols {
            let mut sum = 0.0;
            for ty in 0..th {
                let row = &raw[(y + ty) * iw + x..(y + ty) * iw + x + tw];
                let t_row = &t_zero[ty * tw..(ty + 1) * tw];
                sum += row
                    .iter()
                    .zip(t_row)
                    .map(|(&i, &t)| i as f64 * t)
                    .sum::<f64>();
            }
            cross.push(sum);
        }
    }

    cross
}

/// Circular cross-correlation on a power-of-two grid covering the image.
/// Placements never wrap because the template always ends inside the image.
///
/// The image goes in the real part and the template in the imaginary part,
/// so one forward transform serves both.
fn spectral_cross_terms(image: &LumaImage, t_zero: &[f64], tw: usize, th: usize) -> Vec<f64> {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let (cols, rows) = (iw - tw + 1, ih - th + 1);
    let mut grid = Grid::zeroed(iw.next_power_of_two(), ih.next_power_of_two());
    let (gw, gh) = (grid.width, grid.height);

    for (i, &v) in image.as_raw().iter().enumerate() {
        grid.cells[(i / iw) * gw + i % iw].re = v as f64;
    }
    for (i, &t) in t_zero.iter().enumerate() {
        grid.cells[(i / tw) * gw + i % tw].im = t;
    }
    grid.transform(false);

    for ky in 0..gh {
        for kx in 0..gw {
            let here = ky * gw + kx;
            let there = ((gh - ky) % gh) * gw + (gw - kx) % gw;
            if there < here {
                continue;
            }
            let (z, mirror) = (grid.cells[here], grid.cells[there]);
            grid.cells[here] = correlate(z, mirror);
            grid.cells[there] = correlate(mirror, z);
        }
    }
    grid.transform(true);

    let scale = 1.0 / (gw * gh) as f64;
    let mut cross = Vec::with_capacity(cols * rows);
    for y in 0..rows {
        for x in 0..cols {
            cross.push(grid.at(x, y).re * scale);
        }
    }
    cross
}

/// Split a packed spectrum bin `z = I + iT` (with `mirror` at `-k`) and
/// return `I · conj(T)`.
fn correlate(z: Complex, mirror: Complex) -> Complex {
    let mirrored = mirror.conj();
    let image = z + mirrored;
    let template = z - mirrored;
    (image * template.conj()).rotate().scale(0.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn textured(width: u32, height: u32, seed: u32) -> LumaImage {
        LumaImage::from_fn(width, height, |x, y| {
            Luma([((x * 37 + y * 91 + seed * 13) % 251) as f32 / 251.0])
        })
    }

    fn paste(target: &mut LumaImage, patch: &LumaImage, at_x: u32, at_y: u32) {
        for (x, y, p) in patch.enumerate_pixels() {
            target.put_pixel(at_x + x, at_y + y, *p);
        }
    }

    #[test]
    fn finds_exact_copy() {
        let mut image = LumaImage::from_fn(40, 30, |x, y| Luma([((x * 5 + y * 3) % 17) as f32 / 17.0]));
        let template = textured(6, 5, 1);
        paste(&mut image, &template, 21, 12);

        let best = match_template(&image, &template).unwrap();
        assert_eq!((best.x, best.y), (21, 12));
        assert!(best.score > 0.999, "score was {}", best.score);
    }

    #[test]
    fn brightness_offset_still_scores_one() {
        let template = textured(5, 5, 2);
        let brighter = LumaImage::from_fn(5, 5, |x, y| Luma([template.get_pixel(x, y).0[0] * 0.5 + 0.25]));

        let best = match_template(&brighter, &template).unwrap();
        assert!(best.score > 0.999);
    }

    #[test]
    fn flat_image_scores_zero() {
        let image = LumaImage::from_pixel(20, 20, Luma([0.5]));
        let template = textured(4, 4, 3);

        let best = match_template(&image, &template).unwrap();
        assert_eq!(best.score, 0.0);
    }

    fn zero_mean(template: &LumaImage) -> Vec<f64> {
        let raw = template.as_raw();
        let mean = raw.iter().map(|&v| v as f64).sum::<f64>() / raw.len() as f64;
        raw.iter().map(|&v| v as f64 - mean).collect()
    }

    #[test]
    fn spectral_and_direct_cross_terms_agree() {
        let image = LumaImage::from_fn(37, 29, |x, y| Luma([((x * x + 7 * y) % 53) as f32 / 53.0]));
        let template = textured(6, 5, 4);
        let t_zero = zero_mean(&template);

        let direct = direct_cross_terms(&image, &t_zero, 6, 5);
        let spectral = spectral_cross_terms(&image, &t_zero, 6, 5);

        assert_eq!(direct.len(), 32 * 25);
        assert_eq!(direct.len(), spectral.len());
        for (d, s) in direct.iter().zip(&spectral) {
            assert!((d - s).abs() < 1e-9, "direct {} vs spectral {}", d, s);
        }
    }

    #[test]
    fn finds_copy_in_screen_sized_frame() {
        let mut image = LumaImage::from_fn(640, 360, |x, y| {
            Luma([((x * x + 3 * y * y + x * y) % 97) as f32 / 97.0])
        });
        let template = textured(48, 48, 5);
        paste(&mut image, &template, 411, 203);

        let best = match_template(&image, &template).unwrap();
        assert_eq!((best.x, best.y), (411, 203));
        assert!(best.score > 0.999, "score was {}", best.score);
    }

    #[test]
    fn finds_copy_in_last_placement() {
        let mut image = LumaImage::from_fn(300, 200, |x, y| Luma([((x * 11 + y * y) % 89) as f32 / 89.0]));
        let template = textured(32, 24, 6);
        paste(&mut image, &template, 268, 176);

        let best = match_template(&image, &template).unwrap();
        assert_eq!((best.x, best.y), (268, 176));
        assert!(best.score > 0.999, "score was {}", best.score);
    }

    #[test]
    fn oversized_template_has_no_placement() {
        let image = textured(4, 4, 0);
        let template = textured(5, 3, 0);
        assert!(match_template(&image, &template).is_none());
    }
}
