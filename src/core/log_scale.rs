//! core/log_scale.rs — Base-2 logarithmic value scaling.
//!
//! Maps positive values spanning several orders of magnitude onto [0,1]
//! for colour bars and axes, either continuously (`Log2Norm`) or one band
//! per exponent range (`BucketNorm`).
//! Example: range 1..1024 → log2 span [0,10]; 32 → 0.5, 1024 → 1.0.

use crate::core::error::{CoreError, DomainError, ShapeMismatchError};
use crate::core::grid::{Grid, finite_min_max};

/// Positive, non-empty value range `vmin < vmax`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    vmin: f64,
    vmax: f64,
}

impl ScaleRange {
    pub fn new(vmin: f64, vmax: f64) -> Result<Self, DomainError> {
        if !vmin.is_finite() || !vmax.is_finite() {
            return Err(DomainError::NotFinite);
        }
        if vmin <= 0.0 {
            return Err(DomainError::NonPositive(vmin));
        }
        if vmax <= vmin {
            return Err(DomainError::EmptyRange { vmin, vmax });
        }
        Ok(Self { vmin, vmax })
    }

    /// Range `2^lo ..= 2^hi`.
    pub fn from_exponents(lo: i32, hi: i32) -> Result<Self, DomainError> {
        Self::new(2f64.powi(lo), 2f64.powi(hi))
    }

    /// Range spanned by the finite entries of `values`.
    pub fn from_data(values: &[f64]) -> Result<Self, CoreError> {
        let (lo, hi) = finite_min_max(values).ok_or(ShapeMismatchError::Empty)?;
        Ok(Self::new(lo, hi)?)
    }

    #[inline]
    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    #[inline]
    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    #[inline]
    pub fn log2_min(&self) -> f64 {
        self.vmin.log2()
    }

    #[inline]
    pub fn log2_max(&self) -> f64 {
        self.vmax.log2()
    }

    /// Width of the range in octaves.
    #[inline]
    pub fn log2_span(&self) -> f64 {
        self.log2_max() - self.log2_min()
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.vmin, self.vmax)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.vmin && value <= self.vmax
    }
}

/// Value → [0,1] position mapping with an inverse, independent of any renderer.
pub trait Normalizer {
    fn normalize(&self, value: f64) -> Result<f64, DomainError>;
    fn inverse(&self, position: f64) -> f64;
}

fn check_positive(value: f64) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NotFinite);
    }
    if value <= 0.0 {
        return Err(DomainError::NonPositive(value));
    }
    Ok(())
}

/// `(log2 v − log2 vmin) / (log2 vmax − log2 vmin)`, optionally clamping `v`
/// into the range first.
pub fn normalize(value: f64, range: &ScaleRange, clip: bool) -> Result<f64, DomainError> {
    check_positive(value)?;
    let v = if clip { range.clamp(value) } else { value };
    Ok((v.log2() - range.log2_min()) / range.log2_span())
}

/// Exact inverse of [`normalize`] for unclipped values.
pub fn inverse(position: f64, range: &ScaleRange) -> f64 {
    2f64.powf(position * range.log2_span() + range.log2_min())
}

/// Continuous log2 normalization over a fixed range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Log2Norm {
    range: ScaleRange,
    clip: bool,
}

impl Log2Norm {
    pub fn new(range: ScaleRange) -> Self {
        Self { range, clip: false }
    }

    /// Range taken from the min/max of `values`.
    pub fn fit(values: &[f64]) -> Result<Self, CoreError> {
        Ok(Self::new(ScaleRange::from_data(values)?))
    }

    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    #[inline]
    pub fn range(&self) -> &ScaleRange {
        &self.range
    }

    #[inline]
    pub fn clip(&self) -> bool {
        self.clip
    }

    /// Normalize a slice, passing `NaN` (missing) entries through.
    pub fn normalize_all(&self, values: &[f64]) -> Result<Vec<f64>, DomainError> {
        values
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    Ok(f64::NAN)
                } else {
                    self.normalize(v)
                }
            })
            .collect()
    }
}

impl Normalizer for Log2Norm {
    #[inline]
    fn normalize(&self, value: f64) -> Result<f64, DomainError> {
        normalize(value, &self.range, self.clip)
    }

    #[inline]
    fn inverse(&self, position: f64) -> f64 {
        inverse(position, &self.range)
    }
}

/// Normalize every present cell of `grid`. Without an explicit range the
/// grid's own min/max is used.
pub fn normalize_grid(
    grid: &Grid,
    range: Option<ScaleRange>,
    clip: bool,
) -> Result<Grid, CoreError> {
    let range = match range {
        Some(r) => r,
        None => ScaleRange::from_data(grid.values())?,
    };
    let norm = Log2Norm::new(range).with_clip(clip);
    Ok(grid.try_map(|v| norm.normalize(v))?)
}

/// One exponent band `[lo, hi)` of log2-space; the last band is `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bucket {
    pub index: usize,
    pub lo: f64,
    pub hi: f64,
    pub closed: bool,
}

impl Bucket {
    /// Whether `log2_value` falls in this band.
    #[inline]
    pub fn contains_log2(&self, log2_value: f64) -> bool {
        log2_value >= self.lo && (log2_value < self.hi || (self.closed && log2_value == self.hi))
    }

    /// Raw-value bounds `(2^lo, 2^hi)`.
    #[inline]
    pub fn value_bounds(&self) -> (f64, f64) {
        (2f64.powf(self.lo), 2f64.powf(self.hi))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// Integer-exponent buckets covering `[floor(log2 vmin), ceil(log2 vmax)]`,
/// `step` exponents wide. A trailing partial step is cut at the upper bound.
pub fn bucketize(range: &ScaleRange, step: u32) -> Result<Vec<Bucket>, DomainError> {
    if step == 0 {
        return Err(DomainError::ZeroStep);
    }
    let lo = range.log2_min().floor() as i64;
    let hi = range.log2_max().ceil() as i64;
    let step = i64::from(step);

    let mut buckets = Vec::with_capacity(((hi - lo) / step + 1) as usize);
    let mut start = lo;
    while start < hi {
        let end = (start + step).min(hi);
        buckets.push(Bucket {
            index: buckets.len(),
            lo: start as f64,
            hi: end as f64,
            closed: end == hi,
        });
        start = end;
    }
    Ok(buckets)
}

/// Discrete log2 normalization: one position per exponent bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketNorm {
    range: ScaleRange,
    buckets: Vec<Bucket>,
}

impl BucketNorm {
    pub fn new(range: ScaleRange, step: u32) -> Result<Self, DomainError> {
        let buckets = bucketize(&range, step)?;
        Ok(Self { range, buckets })
    }

    #[inline]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn range(&self) -> &ScaleRange {
        &self.range
    }

    /// Bucket containing `log2(value)`, or `None` outside the covered span.
    pub fn bucket_of(&self, value: f64) -> Result<Option<usize>, DomainError> {
        check_positive(value)?;
        Ok(self.bucket_of_log2(value.log2()))
    }

    /// Bucket containing an exponent that is already in log2-space.
    pub fn bucket_of_log2(&self, log2_value: f64) -> Option<usize> {
        let first = self.buckets.first()?;
        if log2_value < first.lo {
            return None;
        }
        // Buckets share one width except possibly the last, so the index is
        // a floor division; the scan below corrects rounding at boundaries.
        let guess = ((log2_value - first.lo) / first.width()).floor() as usize;
        let guess = guess.min(self.buckets.len() - 1);
        let lo = guess.saturating_sub(1);
        let hi = (guess + 1).min(self.buckets.len() - 1);
        (lo..=hi).find(|&i| self.buckets[i].contains_log2(log2_value))
    }

    /// Like [`Self::bucket_of_log2`], but values below or above the covered
    /// span go to the first or last bucket.
    pub fn nearest_bucket_log2(&self, log2_value: f64) -> usize {
        match self.bucket_of_log2(log2_value) {
            Some(i) => i,
            None if self.buckets.first().is_some_and(|b| log2_value < b.lo) => 0,
            None => self.buckets.len().saturating_sub(1),
        }
    }

    /// Position of bucket `index` on [0,1].
    #[inline]
    pub fn position_of(&self, index: usize) -> f64 {
        let n = self.buckets.len();
        if n <= 1 {
            0.0
        } else {
            index.min(n - 1) as f64 / (n - 1) as f64
        }
    }
}

impl Normalizer for BucketNorm {
    /// Values outside the covered span clip to the first or last bucket.
    fn normalize(&self, value: f64) -> Result<f64, DomainError> {
        check_positive(value)?;
        Ok(self.position_of(self.nearest_bucket_log2(value.log2())))
    }

    /// Lower boundary value of the bucket at `position`.
    fn inverse(&self, position: f64) -> f64 {
        let n = self.buckets.len();
        if n == 0 {
            return self.range.vmin();
        }
        let index = (position.clamp(0.0, 1.0) * (n - 1) as f64).round() as usize;
        self.buckets[index].value_bounds().0
    }
}

/// Base-2 exponent label, `round(log2 value)` rendered as `2^n`.
pub fn format_exponent_label(value: f64) -> Result<String, DomainError> {
    check_positive(value)?;
    Ok(format!("2^{}", nearest_exponent(value.log2())))
}

/// Halves round to the even exponent.
#[inline]
fn nearest_exponent(log2: f64) -> i64 {
    log2.round_ties_even() as i64
}
