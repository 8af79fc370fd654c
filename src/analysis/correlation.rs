use statrs::distribution::{ContinuousCDF, StudentsT};

/// Spearman rank correlation with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub rho: f64,
    pub p_value: f64,
    pub n: usize,
}

/// 1-based ranks, ties receiving the average of the positions they span
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let average = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = average;
        }
        start = end + 1;
    }
    ranks
}

/// Pearson correlation coefficient. NaN when either side has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Two-sided p-value for a correlation coefficient under Student's t with
/// `n - 2` degrees of freedom.
fn p_value(rho: f64, n: usize) -> f64 {
    if rho.is_nan() || n < 3 {
        return f64::NAN;
    }
    if rho.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = rho * (df / (1.0 - rho * rho)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// Spearman correlation of two equal-length samples.
pub fn spearman(x: &[f64], y: &[f64]) -> Correlation {
    let n = x.len().min(y.len());
    let rho = pearson(&rank(&x[..n]), &rank(&y[..n]));
    Correlation {
        rho,
        p_value: p_value(rho, n),
        n,
    }
}

/// Least-squares line `y = slope * x + intercept`. `None` for fewer than two
/// points or constant `x`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;
    let sxx: f64 = x[..n].iter().map(|xi| (xi - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = x[..n]
        .iter()
        .zip(&y[..n])
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rank_with_ties() {
        assert_eq!(rank(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn test_monotonic_increasing_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 100.0, 101.0, 5000.0];
        let result = spearman(&x, &y);
        assert!((result.rho - 1.0).abs() < 1e-12);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.n, 5);
    }

    #[test]
    fn test_monotonic_decreasing_is_minus_one() {
        let result = spearman(&[1.0, 2.0, 3.0, 4.0], &[9.0, 7.0, 3.0, 1.0]);
        assert!((result.rho + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // d = [0, -2, 1, 1, 0] → rho = 1 - 6*6/(5*24) = 0.7
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 4.0, 2.0, 3.0, 5.0];
        let result = spearman(&x, &y);
        assert!((result.rho - 0.7).abs() < 1e-12);
        // t = 0.7 * sqrt(3 / 0.51) ≈ 1.698, two-sided p ≈ 0.188
        assert!((result.p_value - 0.188).abs() < 0.005);
    }

    #[test]
    fn test_constant_side_is_nan() {
        let result = spearman(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        assert!(result.rho.is_nan());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_linear_fit() {
        let (slope, intercept) = linear_fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert_eq!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]), None);
    }
}
