//! core/grid.rs — Row-major 2-D table of f64 for heatmaps and surfaces.
//!
//! `NaN` marks a missing cell. Min/max and normalization skip it.

use crate::core::error::ShapeMismatchError;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Wrap `values` (row-major) as a `rows × cols` grid.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ShapeMismatchError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeMismatchError::Empty);
        }
        if values.len() != rows * cols {
            return Err(ShapeMismatchError::CellCount {
                expected: rows * cols,
                found: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeMismatchError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(ShapeMismatchError::Empty);
        }
        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * cols);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != cols {
                return Err(ShapeMismatchError::RaggedGrid {
                    row,
                    expected: cols,
                    found: r.len(),
                });
            }
            values.extend(r);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            values,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, ShapeMismatchError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeMismatchError::Empty);
        }
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                values.push(f(r, c));
            }
        }
        Ok(Self { rows, cols, values })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Iterate `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let cols = self.cols;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / cols, i % cols, v))
    }

    /// Apply `f` to every present cell; missing (`NaN`) cells stay missing.
    pub fn try_map<E>(&self, mut f: impl FnMut(f64) -> Result<f64, E>) -> Result<Self, E> {
        let mut values = Vec::with_capacity(self.values.len());
        for &v in &self.values {
            values.push(if v.is_nan() { f64::NAN } else { f(v)? });
        }
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            values,
        })
    }

    /// Smallest and largest present value, `None` if every cell is missing.
    pub fn finite_min_max(&self) -> Option<(f64, f64)> {
        finite_min_max(&self.values)
    }
}

/// Min/max over the finite entries of `values`.
pub fn finite_min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
