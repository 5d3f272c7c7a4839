//! core/surface.rs — Constraint-count surface `Z = k · base^u · y` in log2.
//!
//! `u` is sampled evenly so that the batch size `base^u` spreads evenly on
//! the axis; `y` is the tree height. The grid stores `log2 Z` with rows
//! indexed by `y` and columns by `u`.

use crate::core::error::{CoreError, DomainError};
use crate::core::grid::Grid;

/// `n` evenly spaced samples on `[start, end]` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i + 1 == n { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Constraints per (leaf, level), e.g. 243 or 678.
    pub coefficient: f64,
    pub base: f64,
    pub u_min: f64,
    pub u_max: f64,
    pub u_steps: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub y_steps: usize,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            coefficient: 678.0,
            base: 4.0,
            u_min: 0.0,
            u_max: 5.0,
            u_steps: 500,
            y_min: 20.0,
            y_max: 41.0,
            y_steps: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub u: Vec<f64>,
    pub y: Vec<f64>,
    pub log2_z: Grid,
    pub base: f64,
}

impl Surface {
    /// Base-2 exponent of the batch size `base^u`.
    #[inline]
    pub fn x_exponent(&self, u: f64) -> f64 {
        u * self.base.log2()
    }
}

pub fn constraint_surface(params: &SurfaceParams) -> Result<Surface, CoreError> {
    for v in [params.coefficient, params.base, params.y_min] {
        if !v.is_finite() {
            return Err(DomainError::NotFinite.into());
        }
        if v <= 0.0 {
            return Err(DomainError::NonPositive(v).into());
        }
    }
    if params.y_max < params.y_min {
        return Err(DomainError::EmptyRange {
            vmin: params.y_min,
            vmax: params.y_max,
        }
        .into());
    }

    let u = linspace(params.u_min, params.u_max, params.u_steps);
    let y = linspace(params.y_min, params.y_max, params.y_steps);
    let log2_k = params.coefficient.log2();
    let log2_base = params.base.log2();

    // log2(k · base^u · y) = log2 k + u·log2 base + log2 y
    let log2_z = Grid::from_fn(y.len(), u.len(), |r, c| {
        log2_k + u[c] * log2_base + y[r].log2()
    })?;

    Ok(Surface {
        u,
        y,
        log2_z,
        base: params.base,
    })
}
