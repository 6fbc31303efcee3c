use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// An integer point or displacement on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Wrap onto a toroidal grid of size `bounds`.
    ///
    /// Uses euclidean remainder, so negative components land on the high end:
    /// `(-1, 0).wrap((15, 10)) == (14, 0)`.
    pub fn wrap(self, bounds: Vector2) -> Self {
        Self {
            x: self.x.rem_euclid(bounds.x),
            y: self.y.rem_euclid(bounds.y),
        }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Vector2 {
    type Output = Vector2;

    fn mul(self, n: i32) -> Vector2 {
        Vector2::new(self.x * n, self.y * n)
    }
}

/// Floor division by a scalar
impl Div<i32> for Vector2 {
    type Output = Vector2;

    fn div(self, n: i32) -> Vector2 {
        Vector2::new(self.x.div_euclid(n), self.y.div_euclid(n))
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
