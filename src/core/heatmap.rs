//! core/heatmap.rs — Pivot (group, column, value) records into a grid and
//! rescale it so the smallest cell becomes 1.

use std::collections::BTreeSet;

use crate::core::error::{CoreError, DomainError, ShapeMismatchError};
use crate::core::grid::Grid;

/// Grid with labelled rows (groups) and integer column keys (e.g. tree height).
#[derive(Clone, Debug, PartialEq)]
pub struct Heatmap {
    pub row_labels: Vec<String>,
    pub col_keys: Vec<u32>,
    pub grid: Grid,
}

/// Pivot records; rows and columns are sorted, missing cells are `NaN`.
/// A repeated (row, col) keeps the last value.
pub fn pivot<'a>(
    records: impl IntoIterator<Item = (&'a str, u32, f64)>,
) -> Result<Heatmap, ShapeMismatchError> {
    let records: Vec<(&str, u32, f64)> = records.into_iter().collect();
    let row_labels: Vec<String> = records
        .iter()
        .map(|(r, _, _)| *r)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let col_keys: Vec<u32> = records
        .iter()
        .map(|(_, c, _)| *c)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if row_labels.is_empty() {
        return Err(ShapeMismatchError::Empty);
    }

    let mut values = vec![f64::NAN; row_labels.len() * col_keys.len()];
    for (r, c, v) in records {
        // Both searches hit: the keys were collected from these records.
        let (Ok(ri), Ok(ci)) = (
            row_labels.binary_search_by(|l| l.as_str().cmp(r)),
            col_keys.binary_search(&c),
        ) else {
            continue;
        };
        values[ri * col_keys.len() + ci] = v;
    }
    let grid = Grid::new(row_labels.len(), col_keys.len(), values)?;
    Ok(Heatmap {
        row_labels,
        col_keys,
        grid,
    })
}

impl Heatmap {
    /// Divide every cell by the smallest present value.
    pub fn normalized_to_min(&self) -> Result<Heatmap, CoreError> {
        let (min, _) = self
            .grid
            .finite_min_max()
            .ok_or(ShapeMismatchError::Empty)?;
        if min <= 0.0 {
            return Err(DomainError::NonPositive(min).into());
        }
        let grid = self.grid.try_map(|v| Ok::<_, CoreError>(v / min))?;
        Ok(Heatmap {
            row_labels: self.row_labels.clone(),
            col_keys: self.col_keys.clone(),
            grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_sorts_rows_and_columns() {
        let hm = pivot([
            ("Poseidon", 2, 4.0),
            ("MiMC", 1, 2.0),
            ("Poseidon", 1, 3.0),
            ("MiMC", 2, 8.0),
        ])
        .unwrap();
        assert_eq!(hm.row_labels, vec!["MiMC", "Poseidon"]);
        assert_eq!(hm.col_keys, vec![1, 2]);
        assert_eq!(hm.grid.row(0), &[2.0, 8.0]);
        assert_eq!(hm.grid.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn pivot_marks_missing_cells() {
        let hm = pivot([("A", 1, 1.0), ("B", 2, 2.0)]).unwrap();
        assert!(hm.grid.get(0, 1).unwrap().is_nan());
        assert!(hm.grid.get(1, 0).unwrap().is_nan());
        assert!(pivot(std::iter::empty()).is_err());
    }

    #[test]
    fn normalized_min_is_one() {
        let hm = pivot([("A", 1, 2.5), ("A", 2, 10.0), ("B", 1, 5.0)]).unwrap();
        let n = hm.normalized_to_min().unwrap();
        assert_eq!(n.grid.row(0), &[1.0, 4.0]);
        assert_eq!(n.grid.get(1, 0), Some(2.0));
        assert!(n.grid.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn normalization_needs_positive_min() {
        let hm = pivot([("A", 1, 0.0), ("A", 2, 1.0)]).unwrap();
        assert_eq!(
            hm.normalized_to_min(),
            Err(CoreError::Domain(DomainError::NonPositive(0.0)))
        );
    }
}
