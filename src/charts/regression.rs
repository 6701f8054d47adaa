use serde::Serialize;

/// Ordinary least squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through `points`.
///
/// Returns `None` with fewer than two points or when every x is equal.
pub fn fit_line(points: &[[f64; 2]]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for [x, y] in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if negligible(sxx, points.iter().map(|p| p[0])) {
        return None;
    }

    let slope = sxy / sxx;
    let r_squared = if negligible(syy, points.iter().map(|p| p[1])) {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}

/// Whether a sum of squared deviations is rounding noise relative to the
/// magnitude of the values it was computed from.
fn negligible(sum_sq: f64, values: impl Iterator<Item = f64>) -> bool {
    let (mut n, mut scale) = (0.0, 0.0_f64);
    for v in values {
        n += 1.0;
        scale = scale.max(v.abs());
    }
    let tol = 4.0 * f64::EPSILON * scale;
    sum_sq <= n * tol * tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line() {
        let t = fit_line(&[[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]]).unwrap();
        assert!((t.slope - 2.0).abs() < 1e-12);
        assert!((t.intercept - 1.0).abs() < 1e-12);
        assert!((t.r_squared - 1.0).abs() < 1e-12);
        assert!((t.at(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn noisy_line_has_partial_fit() {
        let t = fit_line(&[[0.0, 0.0], [1.0, 2.0], [2.0, 1.0], [3.0, 3.0]]).unwrap();
        assert!((t.slope - 0.8).abs() < 1e-12);
        assert!(t.r_squared > 0.0 && t.r_squared < 1.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(fit_line(&[]), None);
        assert_eq!(fit_line(&[[1.0, 2.0]]), None);
        assert_eq!(fit_line(&[[1.0, 2.0], [1.0, 5.0]]), None);
    }

    #[test]
    fn tiny_spread_still_fits() {
        let t = fit_line(&[[0.0, 1e-9], [1e-9, 4e-9], [2e-9, 7e-9]]).unwrap();
        assert!((t.slope - 3.0).abs() < 1e-6);
        assert!((t.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn equal_x_with_rounding_has_no_line() {
        assert_eq!(fit_line(&[[0.1, 1.0], [0.1, 2.0], [0.1, 3.0]]), None);
    }

    #[test]
    fn flat_y_is_perfect_fit() {
        let t = fit_line(&[[0.0, 4.0], [2.0, 4.0]]).unwrap();
        assert_eq!(t.slope, 0.0);
        assert_eq!(t.r_squared, 1.0);
    }
}
