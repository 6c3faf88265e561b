//! Built-in Cases
//!
//! Two reference transforms so the CLI has something to time out of the box.
//! Both copy the stored input into a complex work buffer before each run, the
//! way a plugged-in library would be driven.

use fftbench_core::{CaseError, CaseRegistry, RegistryError, Transform};
use std::f64::consts::PI;

/// Naive DFT refuses sizes above 2^12; O(n²) gets impractical past that
pub const NAIVE_DFT_MAX_SIZE: usize = 1 << 12;

/// Registry holding every built-in case, enabled
pub fn builtin_registry() -> Result<CaseRegistry, RegistryError> {
    let mut registry = CaseRegistry::new();
    registry.register_transform(Radix2::default())?;
    registry.register_transform(NaiveDft::default())?;
    Ok(registry)
}

/// Iterative in-place radix-2 Cooley-Tukey FFT
#[derive(Default)]
pub struct Radix2 {
    input: Vec<f64>,
    re: Vec<f64>,
    im: Vec<f64>,
    // (cos, sin) of -2πk/n for k < n/2
    twiddles: Vec<(f64, f64)>,
}

impl Radix2 {
    fn bit_reverse(&mut self) {
        let n = self.re.len();
        let mut j = 0;
        for i in 1..n {
            let mut bit = n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j |= bit;
            if i < j {
                self.re.swap(i, j);
                self.im.swap(i, j);
            }
        }
    }
}

impl Transform for Radix2 {
    fn name(&self) -> &str {
        "radix2"
    }

    fn initialize(&mut self, data: &[f64]) -> Result<(), CaseError> {
        let n = data.len();
        if n < 2 || !n.is_power_of_two() {
            return Err(CaseError::unsupported(n, "length must be a power of two >= 2"));
        }
        self.input = data.to_vec();
        self.re = vec![0.0; n];
        self.im = vec![0.0; n];
        self.twiddles = (0..n / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / n as f64;
                (angle.cos(), angle.sin())
            })
            .collect();
        Ok(())
    }

    fn transform(&mut self, forward: bool) -> Result<(), CaseError> {
        let n = self.input.len();
        if n == 0 {
            return Err(CaseError::Fault("transform called before initialize".to_string()));
        }
        self.re.copy_from_slice(&self.input);
        self.im.fill(0.0);
        self.bit_reverse();

        let sign = if forward { 1.0 } else { -1.0 };
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let (wr, wi) = self.twiddles[k * stride];
                    let wi = wi * sign;
                    let a = start + k;
                    let b = a + half;
                    let tr = self.re[b] * wr - self.im[b] * wi;
                    let ti = self.re[b] * wi + self.im[b] * wr;
                    self.re[b] = self.re[a] - tr;
                    self.im[b] = self.im[a] - ti;
                    self.re[a] += tr;
                    self.im[a] += ti;
                }
            }
            len <<= 1;
        }
        Ok(())
    }
}

/// Direct O(n²) discrete Fourier transform
#[derive(Default)]
pub struct NaiveDft {
    input: Vec<f64>,
    re: Vec<f64>,
    im: Vec<f64>,
}

impl Transform for NaiveDft {
    fn name(&self) -> &str {
        "naive-dft"
    }

    fn initialize(&mut self, data: &[f64]) -> Result<(), CaseError> {
        let n = data.len();
        if n > NAIVE_DFT_MAX_SIZE {
            return Err(CaseError::unsupported(
                n,
                format!("naive DFT is capped at {}", NAIVE_DFT_MAX_SIZE),
            ));
        }
        self.input = data.to_vec();
        self.re = vec![0.0; n];
        self.im = vec![0.0; n];
        Ok(())
    }

    fn transform(&mut self, forward: bool) -> Result<(), CaseError> {
        let n = self.input.len();
        let sign = if forward { -1.0 } else { 1.0 };
        for k in 0..n {
            let mut sum_re = 0.0;
            let mut sum_im = 0.0;
            for (t, &x) in self.input.iter().enumerate() {
                let angle = sign * 2.0 * PI * ((k * t) % n) as f64 / n as f64;
                sum_re += x * angle.cos();
                sum_im += x * angle.sin();
            }
            self.re[k] = sum_re;
            self.im[k] = sum_im;
        }
        Ok(())
    }
}
