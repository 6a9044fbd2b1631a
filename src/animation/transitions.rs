use crate::animation::easing::EasingType;
use crate::core::geo::num_wrap;
use crate::core::viewport::{scale_to_zoom, zoom_to_scale, Transform};
use instant::Instant;
use std::f64::consts::{PI, TAU};
use std::time::Duration;

/// State of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    NotStarted,
    Running,
    Completed,
}

/// An eased move from one committed transform to the next.
///
/// The clock starts on the first `sample`, so a transition created between
/// frames does not lose its opening frames.
#[derive(Debug, Clone)]
pub struct TransformTransition {
    from: Transform,
    to: Transform,
    duration: Duration,
    easing: EasingType,
    start_time: Option<Instant>,
    state: TransitionState,
}

impl TransformTransition {
    pub fn new(from: Transform, to: Transform, duration: Duration) -> Self {
        Self::with_easing(from, to, duration, EasingType::EaseOut)
    }

    pub fn with_easing(
        from: Transform,
        to: Transform,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            start_time: None,
            state: TransitionState::NotStarted,
        }
    }

    pub fn target(&self) -> Transform {
        self.to
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == TransitionState::Completed
    }

    /// Advances to `now` and returns the transform to display
    pub fn sample(&mut self, now: Instant) -> Transform {
        let start = *self.start_time.get_or_insert(now);
        self.state = TransitionState::Running;

        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (now.saturating_duration_since(start).as_secs_f64() / self.duration.as_secs_f64())
                .clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            self.state = TransitionState::Completed;
            return self.to;
        }

        self.interpolate(self.easing.apply(progress))
    }

    fn interpolate(&self, t: f64) -> Transform {
        let (a, b) = (&self.from, &self.to);

        // scale moves in zoom space, rotation along the shorter arc
        let zoom = scale_to_zoom(a.k) + (scale_to_zoom(b.k) - scale_to_zoom(a.k)) * t;
        let mut dr = b.r - a.r;
        if dr > PI {
            dr -= TAU;
        } else if dr < -PI {
            dr += TAU;
        }

        Transform {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            k: zoom_to_scale(zoom),
            r: Transform::normalize_rotation(num_wrap(a.r + dr * t, 0.0, TAU)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transforms() -> (Transform, Transform) {
        (
            Transform::new(0.0, 0.0, zoom_to_scale(10.0), 0.1),
            Transform::new(100.0, -50.0, zoom_to_scale(12.0), 6.2),
        )
    }

    #[test]
    fn test_starts_at_origin_and_completes() {
        let (from, to) = transforms();
        let mut transition = TransformTransition::new(from, to, Duration::from_millis(250));
        let t0 = Instant::now();

        let first = transition.sample(t0);
        assert_eq!(transition.state(), TransitionState::Running);
        assert!((first.x - from.x).abs() < 1e-9);
        assert!((first.k - from.k).abs() < 1e-6);

        let last = transition.sample(t0 + Duration::from_millis(300));
        assert!(transition.is_finished());
        assert_eq!(last, to);
    }

    #[test]
    fn test_rotation_takes_short_arc() {
        let (from, to) = transforms();
        let mut transition =
            TransformTransition::with_easing(from, to, Duration::from_millis(100), EasingType::Linear);
        let t0 = Instant::now();
        transition.sample(t0);
        let mid = transition.sample(t0 + Duration::from_millis(50));
        // 0.1 -> 6.2 crosses zero instead of sweeping through PI
        assert!(mid.r < 0.2 || mid.r > 6.0, "r = {}", mid.r);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let (from, to) = transforms();
        let mut transition = TransformTransition::new(from, to, Duration::ZERO);
        assert_eq!(transition.sample(Instant::now()), to);
        assert!(transition.is_finished());
    }
}
