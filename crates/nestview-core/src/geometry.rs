use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    /// Principal scroll axis of a list (local +z).
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    pub const BACK: Vec3 = Vec3::new(0.0, 0.0, -1.0);
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            *self * (1.0 / len)
        }
    }

    pub fn lerp(&self, other: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        *self + (other - *self) * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, o: Vec3) {
        *self = *self + o;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Quat {
        let a = axis.normalized();
        let (s, c) = (radians * 0.5).sin_cos();
        Quat {
            x: a.x * s,
            y: a.y * s,
            z: a.z * s,
            w: c,
        }
    }

    fn dot(&self, o: &Quat) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z + self.w * o.w
    }

    fn normalized(&self) -> Quat {
        let len = self.dot(self).sqrt();
        if len <= f32::EPSILON {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    /// Normalized linear interpolation along the shorter arc; `t` is clamped.
    pub fn nlerp(&self, other: Quat, t: f32) -> Quat {
        let t = t.clamp(0.0, 1.0);
        let sign = if self.dot(&other) < 0.0 { -1.0 } else { 1.0 };
        Quat {
            x: self.x + (other.x * sign - self.x) * t,
            y: self.y + (other.y * sign - self.y) * t,
            z: self.z + (other.z * sign - self.z) * t,
            w: self.w + (other.w * sign - self.w) * t,
        }
        .normalized()
    }

    pub fn angle_to(&self, other: Quat) -> f32 {
        let d = self.dot(&other).abs().min(1.0);
        2.0 * d.acos()
    }
}

impl Mul for Quat {
    type Output = Quat;
    fn mul(self, o: Quat) -> Quat {
        Quat {
            w: self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            x: self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            y: self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            z: self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        }
    }
}

/// Position + rotation, the part of a transform the placement helpers touch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Axis-aligned box in some local space.
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    pub fn extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents()
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents()
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y && p.z >= lo.z && p.z <= hi.z
    }
}

/// Clip region handed to rows so content outside the list bounds is cut.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipVolume {
    pub center: Vec3,
    pub extents: Vec3,
}

impl ClipVolume {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            center: bounds.center,
            extents: bounds.extents(),
        }
    }
}
