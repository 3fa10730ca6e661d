/// Gravitational acceleration at the lunar surface [m/s²]
pub const SURFACE_GRAVITY: f64 = 1.622;
/// Orbital speed at the lunar equator [m/s]
pub const EQUATORIAL_SPEED: f64 = 1700.0;

/// Effective downward acceleration for a vehicle moving at the given horizontal speed [m/s²].
///
/// Gravity is attenuated linearly towards zero as the horizontal speed approaches orbital
/// speed, and keeps going negative beyond it. Callers get the raw value, no clamping.
pub fn effective_gravity(horizontal_speed: f64) -> f64 {
    let n = horizontal_speed.abs() / EQUATORIAL_SPEED;
    (1.0 - n) * SURFACE_GRAVITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_gravity_when_hovering() {
        assert_eq!(effective_gravity(0.0), 1.622);
    }

    #[test]
    fn no_gravity_at_orbital_speed() {
        assert_eq!(effective_gravity(1700.0), 0.0);
        assert_eq!(effective_gravity(-1700.0), 0.0);
    }

    #[test]
    fn extrapolates_beyond_orbital_speed() {
        assert_eq!(effective_gravity(3400.0), -1.622);
    }

    #[test]
    fn direction_of_travel_does_not_matter() {
        assert_eq!(effective_gravity(932.0), effective_gravity(-932.0));
        assert!(effective_gravity(932.0) < SURFACE_GRAVITY);
    }
}
