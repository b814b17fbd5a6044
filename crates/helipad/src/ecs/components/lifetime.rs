//! Lifetime Component
//!
//! Counts simulated time for entities that despawn after a duration.

/// Lifetime component for entities that should despawn after a duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Simulated seconds the entity has been alive
    pub elapsed: f32,
    /// How long the entity should live (in seconds, 0 = forever)
    pub duration: f32,
}

impl Lifetime {
    /// Create a new lifetime component
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    /// Advance by one step
    pub fn advance(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
    }

    /// Check if this entity's lifetime has expired
    pub fn is_expired(&self) -> bool {
        self.duration > 0.0 && self.elapsed >= self.duration
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.elapsed).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_not_expired() {
        let mut lifetime = Lifetime::new(5.0);
        lifetime.advance(2.0);
        assert!(!lifetime.is_expired());
    }

    #[test]
    fn test_lifetime_expired() {
        let mut lifetime = Lifetime::new(5.0);
        lifetime.advance(6.0);
        assert!(lifetime.is_expired());
    }

    #[test]
    fn test_infinite_lifetime() {
        let mut lifetime = Lifetime::new(0.0);
        lifetime.advance(1000.0);
        assert!(!lifetime.is_expired());
        assert_eq!(lifetime.remaining(), f32::INFINITY);
    }

    #[test]
    fn test_remaining_time() {
        let mut lifetime = Lifetime::new(10.0);
        lifetime.advance(3.0);
        assert_eq!(lifetime.remaining(), 7.0);
        lifetime.advance(9.0);
        assert_eq!(lifetime.remaining(), 0.0);
    }
}
