//! core/paired.rs — Pointwise comparison of two aligned cost series.
//!
//! Splits index positions into Group A (`baseline[i] < candidate[i]`) and
//! Group B (the rest), computes overall means and the vertical connector
//! segments that link both point clouds. Index positions are 1-based.

use serde::{Deserialize, Serialize};

use crate::core::error::ShapeMismatchError;

/// Which group receives indices where both series are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// `baseline <= candidate` goes to Group A.
    GroupA,
    /// Only strict `baseline < candidate` goes to Group A.
    #[default]
    GroupB,
}

impl TieBreak {
    #[inline]
    fn in_group_a(self, baseline: f64, candidate: f64) -> bool {
        match self {
            TieBreak::GroupA => baseline <= candidate,
            TieBreak::GroupB => baseline < candidate,
        }
    }
}

/// Baseline/candidate values at one index position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedPair {
    pub index: usize,
    pub baseline: f64,
    pub candidate: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonGroup {
    pub points: Vec<IndexedPair>,
}

impl ComparisonGroup {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.index).collect()
    }

    pub fn baseline_points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.points.iter().map(|p| (p.index, p.baseline))
    }

    pub fn candidate_points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.points.iter().map(|p| (p.index, p.candidate))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    /// `baseline[i] < candidate[i]`.
    pub group_a: ComparisonGroup,
    pub group_b: ComparisonGroup,
}

impl Partition {
    #[inline]
    pub fn total(&self) -> usize {
        self.group_a.len() + self.group_b.len()
    }
}

/// Vertical connector from `low` to `high` at `index`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub low: f64,
    pub high: f64,
}

fn check_aligned(baseline: &[f64], candidate: &[f64]) -> Result<(), ShapeMismatchError> {
    if baseline.len() != candidate.len() {
        return Err(ShapeMismatchError::LengthMismatch {
            baseline: baseline.len(),
            candidate: candidate.len(),
        });
    }
    if baseline.is_empty() {
        return Err(ShapeMismatchError::Empty);
    }
    Ok(())
}

/// Validated, equal-length baseline/candidate pair.
#[derive(Clone, Debug, PartialEq)]
pub struct PairedSeries {
    baseline: Vec<f64>,
    candidate: Vec<f64>,
}

impl PairedSeries {
    pub fn new(baseline: Vec<f64>, candidate: Vec<f64>) -> Result<Self, ShapeMismatchError> {
        check_aligned(&baseline, &candidate)?;
        Ok(Self {
            baseline,
            candidate,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    #[inline]
    pub fn baseline(&self) -> &[f64] {
        &self.baseline
    }

    #[inline]
    pub fn candidate(&self) -> &[f64] {
        &self.candidate
    }

    /// Divide every candidate value by `divisor` (e.g. amortised per-leaf cost).
    pub fn with_candidate_divisor(mut self, divisor: f64) -> Self {
        for v in &mut self.candidate {
            *v /= divisor;
        }
        self
    }
}

/// Arithmetic mean over the whole series.
pub fn mean(series: &[f64]) -> Result<f64, ShapeMismatchError> {
    if series.is_empty() {
        return Err(ShapeMismatchError::Empty);
    }
    Ok(series.iter().sum::<f64>() / series.len() as f64)
}

/// Partition with ties assigned to Group B.
pub fn partition(baseline: &[f64], candidate: &[f64]) -> Result<Partition, ShapeMismatchError> {
    Comparator::default().partition(baseline, candidate)
}

pub fn connector_segments(
    baseline: &[f64],
    candidate: &[f64],
) -> Result<Vec<Segment>, ShapeMismatchError> {
    check_aligned(baseline, candidate)?;
    Ok(baseline
        .iter()
        .zip(candidate)
        .enumerate()
        .map(|(i, (&b, &c))| Segment {
            index: i + 1,
            low: b.min(c),
            high: b.max(c),
        })
        .collect())
}

/// Everything a comparison figure needs from one dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub partition: Partition,
    pub baseline_mean: f64,
    pub candidate_mean: f64,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Comparator {
    pub tie_break: TieBreak,
}

impl Comparator {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn partition(
        &self,
        baseline: &[f64],
        candidate: &[f64],
    ) -> Result<Partition, ShapeMismatchError> {
        check_aligned(baseline, candidate)?;
        let mut out = Partition::default();
        for (i, (&b, &c)) in baseline.iter().zip(candidate).enumerate() {
            let pair = IndexedPair {
                index: i + 1,
                baseline: b,
                candidate: c,
            };
            if self.tie_break.in_group_a(b, c) {
                out.group_a.points.push(pair);
            } else {
                out.group_b.points.push(pair);
            }
        }
        Ok(out)
    }

    pub fn compare(&self, series: &PairedSeries) -> Result<Comparison, ShapeMismatchError> {
        let (b, c) = (series.baseline(), series.candidate());
        Ok(Comparison {
            partition: self.partition(b, c)?,
            baseline_mean: mean(b)?,
            candidate_mean: mean(c)?,
            segments: connector_segments(b, c)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn worked_example() {
        let baseline = [5.0, 15.0, 25.0];
        let candidate = [10.0, 10.0, 20.0];
        let p = partition(&baseline, &candidate).unwrap();
        assert_eq!(p.group_a.indices(), vec![1]);
        assert_eq!(
            p.group_a.points[0],
            IndexedPair {
                index: 1,
                baseline: 5.0,
                candidate: 10.0
            }
        );
        assert_eq!(p.group_b.indices(), vec![2, 3]);
        let pairs: Vec<(f64, f64)> = p
            .group_b
            .points
            .iter()
            .map(|x| (x.baseline, x.candidate))
            .collect();
        assert_eq!(pairs, vec![(15.0, 10.0), (25.0, 20.0)]);
        assert_relative_eq!(mean(&baseline).unwrap(), 15.0);
        assert_relative_eq!(mean(&candidate).unwrap(), 40.0 / 3.0);
    }

    #[test]
    fn mean_of_small_series() {
        assert_eq!(mean(&[10.0, 20.0, 30.0]).unwrap(), 20.0);
        assert_eq!(mean(&[]), Err(ShapeMismatchError::Empty));
    }

    #[test]
    fn ties_follow_tie_break() {
        let b = [1.0, 2.0, 3.0];
        let c = [1.0, 5.0, 3.0];
        let p = partition(&b, &c).unwrap();
        assert_eq!(p.group_a.indices(), vec![2]);
        assert_eq!(p.group_b.indices(), vec![1, 3]);

        let p = Comparator::new(TieBreak::GroupA).partition(&b, &c).unwrap();
        assert_eq!(p.group_a.indices(), vec![1, 2, 3]);
        assert!(p.group_b.is_empty());
    }

    #[test]
    fn shape_errors() {
        assert_eq!(
            partition(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(ShapeMismatchError::LengthMismatch {
                baseline: 2,
                candidate: 3
            })
        );
        assert_eq!(partition(&[], &[]), Err(ShapeMismatchError::Empty));
        assert_eq!(
            connector_segments(&[1.0], &[]),
            Err(ShapeMismatchError::LengthMismatch {
                baseline: 1,
                candidate: 0
            })
        );
        assert!(PairedSeries::new(vec![], vec![]).is_err());
    }

    #[test]
    fn segments_span_min_to_max() {
        let segs = connector_segments(&[5.0, 15.0, 7.0], &[10.0, 10.0, 7.0]).unwrap();
        assert_eq!(
            segs,
            vec![
                Segment {
                    index: 1,
                    low: 5.0,
                    high: 10.0
                },
                Segment {
                    index: 2,
                    low: 10.0,
                    high: 15.0
                },
                Segment {
                    index: 3,
                    low: 7.0,
                    high: 7.0
                },
            ]
        );
    }

    #[test]
    fn compare_bundles_everything() {
        let series = PairedSeries::new(vec![5.0, 15.0, 25.0], vec![20.0, 20.0, 80.0])
            .unwrap()
            .with_candidate_divisor(2.0);
        assert_eq!(series.candidate(), &[10.0, 10.0, 40.0]);
        let cmp = Comparator::default().compare(&series).unwrap();
        assert_eq!(cmp.partition.group_a.indices(), vec![1, 3]);
        assert_eq!(cmp.partition.total(), 3);
        assert_eq!(cmp.segments.len(), 3);
        assert_relative_eq!(cmp.baseline_mean, 15.0);
        assert_relative_eq!(cmp.candidate_mean, 20.0);
    }

    #[test]
    fn compare_reports_broken_series() {
        let series = PairedSeries {
            baseline: vec![1.0, 2.0],
            candidate: vec![1.0],
        };
        assert_eq!(
            Comparator::default().compare(&series),
            Err(ShapeMismatchError::LengthMismatch {
                baseline: 2,
                candidate: 1
            })
        );
        let empty = PairedSeries {
            baseline: vec![],
            candidate: vec![],
        };
        assert_eq!(
            Comparator::default().compare(&empty),
            Err(ShapeMismatchError::Empty)
        );
    }
}
