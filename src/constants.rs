/// Score returned for a candidate that cannot be scored at all.
pub const UNSCOREABLE: f64 = f64::NEG_INFINITY;
/// Default margin by which a candidate test must beat the current choice.
pub const DEFAULT_SPLIT_THRESH: f64 = 0.0;
/// Default Dirichlet pseudo count used by the BDeu score.
pub const DEFAULT_PSEUDO_COUNT: f64 = 1.0;
/// Relative tolerance used by `double_equality`.
pub const DOUBLE_EQ_EPSILON: f64 = 1e-6;
