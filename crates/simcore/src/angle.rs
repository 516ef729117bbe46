//! Angle helpers
//!
//! All angles crossing the public API are in degrees, measured counter-clockwise
//! from +X (forward) toward +Y (left).

/// Wrap an angle in degrees into `(-180, 180]`.
///
/// One remainder plus at most one correction, so the cost is constant and
/// large accumulated headings do not drift. `-180` maps to `180`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let mut angle = degrees % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    }
    if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit vector `(cos, sin)` for an angle in degrees.
pub fn unit_vector(degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cos, sin)
}

/// Smallest signed rotation in degrees that takes `from` onto `to`.
pub fn shortest_rotation(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_negative_half_turn_maps_to_positive() {
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(540.0), 180.0);
    }

    #[test]
    fn test_range_and_idempotence() {
        let mut a = -2000.0;
        while a < 2000.0 {
            let n = normalize_angle(a);
            assert!(n > -180.0 && n <= 180.0, "{} -> {}", a, n);
            assert_eq!(normalize_angle(n), n);
            a += 7.3;
        }
    }

    #[test]
    fn test_periodicity() {
        for &a in &[0.0, 45.0, -90.0, 179.5, -179.5, 12.25] {
            for k in -5..=5 {
                let shifted = a + 360.0 * k as f64;
                assert_abs_diff_eq!(normalize_angle(shifted), normalize_angle(a), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_large_input_is_exact() {
        // 1e6 full turns plus 30 degrees
        assert_abs_diff_eq!(normalize_angle(360.0e6 + 30.0), 30.0, epsilon = 1e-6);
        assert_abs_diff_eq!(normalize_angle(-360.0e6 - 30.0), -30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shortest_rotation_crosses_seam() {
        assert_abs_diff_eq!(shortest_rotation(170.0, -170.0), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shortest_rotation(-170.0, 170.0), -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_vector() {
        let (x, y) = unit_vector(90.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-12);
    }
}
