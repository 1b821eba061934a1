use std::time::Duration;

use crate::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    /// `t²`, used by the object placement grow.
    EaseIn,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Interpolate for Quat {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.nlerp(*other, t)
    }
}

/// A value moving from `start` to `end`, stepped explicitly by the host's
/// frame loop. Dropping it cancels the motion.
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate + Clone> {
    start: T,
    end: T,
    current: T,
    spec: AnimationSpec,
    elapsed: Duration,
}

impl<T: Interpolate + Clone> Tween<T> {
    pub fn new(start: T, end: T, spec: AnimationSpec) -> Self {
        Self {
            current: start.clone(),
            start,
            end,
            spec,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `dt`; returns true while the tween still has work to do.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);

        if self.elapsed < self.spec.delay {
            return true;
        }

        let running = self.elapsed - self.spec.delay;
        if running >= self.spec.duration {
            self.current = self.end.clone();
            return false;
        }

        let t = running.as_secs_f32() / self.spec.duration.as_secs_f32();
        let eased = self.spec.easing.interpolate(t);
        self.current = self.start.interpolate(&self.end, eased);
        true
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.end
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.spec.delay + self.spec.duration
    }
}
