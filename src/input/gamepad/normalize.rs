//! Stick normalization for gilrs values
//!
//! gilrs reports each stick axis independently in [-1.0, 1.0], so the raw
//! values of most pads form a square. XR thumbsticks report a circle; the
//! bridge maps the square onto the circle so diagonals behave the same on
//! both.

/// Map square input to circular output.
///
/// Points on the edge of the square land on the unit circle; interior points
/// scale proportionally.
///
/// # Examples
/// - Full up (0, 1) → (0, 1)
/// - Corner (1, 1) → (0.707, 0.707)
/// - Half diagonal (0.5, 0.5) → (0.354, 0.354)
pub fn square_to_circle(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude < 0.0001 {
        return (0.0, 0.0);
    }

    // Distance to edge of square in this direction
    let max_axis = x.abs().max(y.abs());
    let scale = max_axis / magnitude;

    (x * scale, y * scale)
}

/// Clamp input to the unit circle, leaving interior points untouched
pub fn radial_clamp(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude <= 1.0 {
        (x, y)
    } else {
        (x / magnitude, y / magnitude)
    }
}

/// Normalize a raw gilrs stick reading into xr-standard thumbstick space
///
/// gilrs Y is positive when pushed up; xr-standard Y is negative when pushed
/// forward, so Y is flipped here. The clamp only catches readings slightly
/// outside the square.
pub fn stick_to_thumbstick(x: f32, y: f32) -> (f32, f32) {
    let (x, y) = square_to_circle(x, y);
    let (x, y) = radial_clamp(x, y);
    (x, -y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_to_circle_cardinal() {
        let (x, y) = square_to_circle(0.0, 1.0);
        assert!((x - 0.0).abs() < 0.001);
        assert!((y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_square_to_circle_diagonal() {
        let (x, y) = square_to_circle(1.0, 1.0);
        let mag = (x * x + y * y).sqrt();
        assert!((mag - 1.0).abs() < 0.01, "Diagonal magnitude was {}", mag);
    }

    #[test]
    fn test_square_to_circle_center() {
        assert_eq!(square_to_circle(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_radial_clamp_keeps_interior() {
        assert_eq!(radial_clamp(0.5, 0.5), (0.5, 0.5));
        let (x, y) = radial_clamp(2.0, 0.0);
        assert!((x - 1.0).abs() < 1e-6 && y == 0.0);
    }

    #[test]
    fn test_stick_full_diagonal_keeps_full_magnitude() {
        let (x, y) = stick_to_thumbstick(1.0, 1.0);
        let mag = (x * x + y * y).sqrt();
        assert!((mag - 1.0).abs() < 1e-4, "Diagonal magnitude was {}", mag);
        assert!(x > 0.0 && y < 0.0);

        let (x, y) = stick_to_thumbstick(1.2, -1.1);
        assert!((x * x + y * y).sqrt() <= 1.0 + 1e-6);
    }

    #[test]
    fn test_stick_forward_is_negative_y() {
        let (x, y) = stick_to_thumbstick(0.0, 1.0);
        assert!(x.abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-5);
    }
}
