use core::f32::consts::PI;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Unit vector, or `ZERO` for a degenerate input.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            self / len
        }
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Agent heading: a current angle that turns toward a target angle at a
/// bounded rate.
///
/// The unit vector is regenerated whenever the current angle changes, so
/// readers never see a vector that disagrees with `angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading {
    angle: f32,
    target: f32,
    vec: Vec2,
}

impl Heading {
    pub fn new(angle: f32) -> Self {
        let angle = wrap_angle(angle);
        Self {
            angle,
            target: angle,
            vec: Vec2::from_angle(angle),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn vec(&self) -> Vec2 {
        self.vec
    }

    /// Sets the angle the heading turns toward on subsequent `update`s.
    pub fn steer_to(&mut self, angle: f32) {
        self.target = wrap_angle(angle);
    }

    pub fn steer_toward(&mut self, direction: Vec2) {
        if direction.length() > f32::EPSILON {
            self.steer_to(direction.angle());
        }
    }

    /// Turns the target by `delta` without touching the current angle.
    pub fn perturb(&mut self, delta: f32) {
        self.target = wrap_angle(self.target + delta);
    }

    pub fn set_now(&mut self, angle: f32) {
        self.angle = wrap_angle(angle);
        self.target = self.angle;
        self.vec = Vec2::from_angle(self.angle);
    }

    pub fn set_vec_now(&mut self, direction: Vec2) {
        if direction.length() > f32::EPSILON {
            self.set_now(direction.angle());
        }
    }

    pub fn add_now(&mut self, delta: f32) {
        self.set_now(self.angle + delta);
    }

    /// Rotates toward the target by at most `turn_speed * dt` radians.
    pub fn update(&mut self, dt: f32, turn_speed: f32) {
        let diff = wrap_angle(self.target - self.angle);
        if diff == 0.0 {
            return;
        }
        let max_step = (turn_speed * dt).max(0.0);
        let step = diff.clamp(-max_step, max_step);
        self.angle = wrap_angle(self.angle + step);
        self.vec = Vec2::from_angle(self.angle);
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::new(0.0)
    }
}
