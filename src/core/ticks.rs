//! Axis and colour-bar tick helpers.

/// Powers of two `2^lo, 2^(lo+every), …` up to `2^hi` inclusive.
pub fn exponent_ticks(lo: i32, hi: i32, every: u32) -> Vec<f64> {
    let every = every.max(1) as usize;
    (lo..=hi).step_by(every).map(|e| 2f64.powi(e)).collect()
}

/// Whether `exponent` is an integer on the grid `first, first + every, …`.
pub fn is_exponent_tick(exponent: f64, first: f64, every: u32) -> bool {
    let k = (exponent - first) / every.max(1) as f64;
    (exponent - exponent.round()).abs() < 1e-6 && (k - k.round()).abs() < 1e-6 && k > -1e-6
}

/// Scientific notation with a signed two-digit exponent, e.g. `1.50e+05`.
pub fn format_scientific(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let s = format!("{value:.digits$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_second_power() {
        assert_eq!(
            exponent_ticks(0, 11, 2),
            vec![1.0, 4.0, 16.0, 64.0, 256.0, 1024.0]
        );
        assert_eq!(exponent_ticks(3, 4, 0), vec![8.0, 16.0]);
    }

    #[test]
    fn exponent_tick_grid() {
        let ticks: Vec<i32> = (-2..=12).filter(|&e| is_exponent_tick(e as f64, 0.0, 2)).collect();
        assert_eq!(ticks, vec![0, 2, 4, 6, 8, 10, 12]);
        assert!(!is_exponent_tick(3.5, 0.5, 1));
        assert!(is_exponent_tick(11.0, 10.0, 0));
    }

    #[test]
    fn scientific_matches_printf_style() {
        assert_eq!(format_scientific(150_000.0, 2), "1.50e+05");
        assert_eq!(format_scientific(0.00123, 1), "1.2e-03");
        assert_eq!(format_scientific(3.0, 2), "3.00e+00");
        assert_eq!(format_scientific(1.23e123, 1), "1.2e+123");
    }
}
