use crate::constants::DOUBLE_EQ_EPSILON;
use crate::errors::FactreeError;

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), FactreeError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), FactreeError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(FactreeError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Relative-epsilon equality for leaf values.
///
/// Exact matches (including equal infinities) are equal, values near zero
/// are compared absolutely, everything else relative to their magnitude.
#[inline]
pub fn double_equality(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if a == 0.0 || b == 0.0 || diff < f64::MIN_POSITIVE {
        return diff < DOUBLE_EQ_EPSILON * f64::MIN_POSITIVE;
    }
    diff / (a.abs() + b.abs()).min(f64::MAX) < DOUBLE_EQ_EPSILON
}

/// Element-wise `double_equality` over two distributions.
pub fn vec_equality(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| double_equality(*x, *y))
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function for `x > 0` (Lanczos approximation).
/// Returns `+inf` at `x == 0`, where the gamma function has its pole.
pub fn ln_gamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::INFINITY;
    }
    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEF[0];
    let t = x + LANCZOS_G + 0.5;
    for (i, c) in LANCZOS_COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Log of the multivariate beta function.
pub fn log_beta(values: &[f64]) -> f64 {
    let sum_of_log_gammas: f64 = values.iter().map(|v| ln_gamma(*v)).sum();
    sum_of_log_gammas - ln_gamma(values.iter().sum())
}
