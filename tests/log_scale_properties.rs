use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use costfig::core::error::DomainError;
use costfig::core::log_scale::{
    BucketNorm, Log2Norm, Normalizer, ScaleRange, bucketize, format_exponent_label, inverse,
    normalize,
};

const TRIALS: usize = 2_000;

fn random_range(rng: &mut StdRng) -> ScaleRange {
    let lo = rng.random_range(-20.0..20.0);
    let span = rng.random_range(0.1..30.0);
    ScaleRange::new(2f64.powf(lo), 2f64.powf(lo + span)).unwrap()
}

#[test]
fn inverse_undoes_normalize_inside_range() {
    let mut rng = StdRng::seed_from_u64(0xC0575);
    for _ in 0..TRIALS {
        let range = random_range(&mut rng);
        let e = rng.random_range(range.log2_min()..=range.log2_max());
        let v = 2f64.powf(e).clamp(range.vmin(), range.vmax());
        let p = normalize(v, &range, false).unwrap();
        assert!((-1e-12..=1.0 + 1e-12).contains(&p), "position {p} for {v}");
        assert_relative_eq!(inverse(p, &range), v, max_relative = 1e-9);
    }
}

#[test]
fn normalize_is_repeatable_and_monotone() {
    let mut rng = StdRng::seed_from_u64(7);
    let range = ScaleRange::new(1.0, 1024.0).unwrap();
    let norm = Log2Norm::new(range);
    let mut values: Vec<f64> = (0..200).map(|_| rng.random_range(1.0..1024.0)).collect();
    values.sort_by(f64::total_cmp);

    let first = norm.normalize_all(&values).unwrap();
    let second = norm.normalize_all(&values).unwrap();
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn documented_examples() {
    let range = ScaleRange::new(1.0, 1024.0).unwrap();
    assert_relative_eq!(normalize(1024.0, &range, false).unwrap(), 1.0);
    assert_relative_eq!(normalize(32.0, &range, false).unwrap(), 0.5);
    assert_eq!(
        normalize(0.0, &ScaleRange::new(1.0, 100.0).unwrap(), false),
        Err(DomainError::NonPositive(0.0))
    );
    assert!(matches!(
        ScaleRange::new(8.0, 8.0),
        Err(DomainError::EmptyRange { .. })
    ));
}

#[test]
fn clipping_pins_out_of_range_values() {
    let norm = Log2Norm::new(ScaleRange::new(4.0, 64.0).unwrap()).with_clip(true);
    assert_relative_eq!(norm.normalize(1.0).unwrap(), 0.0);
    assert_relative_eq!(norm.normalize(1e6).unwrap(), 1.0);
    // Non-positive input is rejected even with clipping on.
    assert!(norm.normalize(-3.0).is_err());

    let open = Log2Norm::new(ScaleRange::new(4.0, 64.0).unwrap());
    assert_relative_eq!(open.normalize(1.0).unwrap(), -0.5);
}

#[test]
fn every_value_lands_in_exactly_one_bucket() {
    let range = ScaleRange::from_exponents(10, 26).unwrap();
    let buckets = bucketize(&range, 1).unwrap();
    assert_eq!(buckets.len(), 16);
    for (i, w) in buckets.windows(2).enumerate() {
        assert_eq!(w[0].hi, w[1].lo, "gap after bucket {i}");
    }

    let norm = BucketNorm::new(range, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(26);
    let mut samples: Vec<f64> = (0..TRIALS)
        .map(|_| 2f64.powf(rng.random_range(10.0..=26.0)))
        .collect();
    // Every boundary, including both ends.
    samples.extend((10..=26).map(|e| 2f64.powi(e)));

    for v in samples {
        let hits = buckets
            .iter()
            .filter(|b| b.contains_log2(v.log2()))
            .count();
        assert_eq!(hits, 1, "value {v} hit {hits} buckets");
        let idx = norm.bucket_of(v).unwrap().unwrap();
        assert!(buckets[idx].contains_log2(v.log2()));
    }
    assert_eq!(norm.bucket_of(2f64.powi(26)).unwrap(), Some(15));
    assert_eq!(norm.bucket_of(2f64.powi(11)).unwrap(), Some(1));
}

#[test]
fn exponent_labels() {
    assert_eq!(format_exponent_label(1024.0).unwrap(), "2^10");
    assert_eq!(format_exponent_label(1000.0).unwrap(), "2^10");
    assert_eq!(format_exponent_label(0.25).unwrap(), "2^-2");
    assert!(format_exponent_label(0.0).is_err());
}
