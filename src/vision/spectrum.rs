// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Radix-2 FFT over power-of-two grids, used for cross-correlation.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Multiply by `i`.
    pub fn rotate(self) -> Self {
        Self::new(-self.im, self.re)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.re * factor, self.im * factor)
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Twiddle factors for one transform length.
struct Plan {
    len: usize,
    twiddles: Vec<Complex>,
}

impl Plan {
    fn new(len: usize) -> Self {
        debug_assert!(len.is_power_of_two());
        let twiddles = (0..len / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / len as f64;
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();
        Self { len, twiddles }
    }

    /// In-place iterative transform of `data`, whose length is `self.len`.
    /// The inverse is unnormalized.
    fn run(&self, data: &mut [Complex], inverse: bool) {
        let n = self.len;

        let mut j = 0;
        for i in 1..n {
            let mut bit = n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j |= bit;
            if i < j {
                data.swap(i, j);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for start in (0..n).step_by(size) {
                for k in 0..half {
                    let twiddle = self.twiddles[k * stride];
                    let twiddle = if inverse { twiddle.conj() } else { twiddle };
                    let even = data[start + k];
                    let odd = data[start + k + half] * twiddle;
                    data[start + k] = even + odd;
                    data[start + k + half] = even - odd;
                }
            }
            size <<= 1;
        }
    }
}

/// A row-major complex grid whose sides are powers of two.
pub(crate) struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Complex>,
}

impl Grid {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Complex::ZERO; width * height],
        }
    }

    pub fn at(&self, x: usize, y: usize) -> Complex {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: Complex) {
        self.cells[y * self.width + x] = value;
    }

    /// 2-D transform: every row, then every column.
    pub fn transform(&mut self, inverse: bool) {
        let rows = Plan::new(self.width);
        for row in self.cells.chunks_exact_mut(self.width) {
            rows.run(row, inverse);
        }

        let columns = Plan::new(self.height);
        let mut column = vec![Complex::ZERO; self.height];
        for x in 0..self.width {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = self.cells[y * self.width + x];
            }
            columns.run(&mut column, inverse);
            for (y, cell) in column.iter().enumerate() {
                self.cells[y * self.width + x] = *cell;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dft(input: &[Complex]) -> Vec<Complex> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input.iter().enumerate().fold(Complex::ZERO, |acc, (t, &v)| {
                    let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                    acc + v * Complex::new(angle.cos(), angle.sin())
                })
            })
            .collect()
    }

    #[test]
    fn matches_naive_dft() {
        let input: Vec<Complex> = (0..16)
            .map(|i| Complex::new((i * 7 % 5) as f64, (i % 3) as f64 - 1.0))
            .collect();
        let mut fast = input.clone();
        Plan::new(16).run(&mut fast, false);

        for (a, b) in fast.iter().zip(naive_dft(&input)) {
            assert!((a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9);
        }
    }

    #[test]
    fn inverse_restores_grid() {
        let mut grid = Grid::zeroed(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                grid.set(x, y, Complex::new((x * 3 + y) as f64, 0.0));
            }
        }

        grid.transform(false);
        grid.transform(true);

        for y in 0..4 {
            for x in 0..8 {
                let restored = grid.at(x, y).scale(1.0 / 32.0);
                assert!((restored.re - (x * 3 + y) as f64).abs() < 1e-9);
                assert!(restored.im.abs() < 1e-9);
            }
        }
    }
}
