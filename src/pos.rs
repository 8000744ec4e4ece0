use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Substituted for a zero length before dividing by it.
pub const EPSILON_DISTANCE: f32 = 0.001;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub const ZERO: Pos = Pos { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Pos { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Pos) -> f32 {
        (*other - *self).length()
    }

    /// Length of the vector, with zero replaced by [`EPSILON_DISTANCE`].
    pub fn length_or_epsilon(&self) -> f32 {
        let length = self.length();
        if length == 0.0 {
            EPSILON_DISTANCE
        } else {
            length
        }
    }

    /// Unit direction and the (epsilon-guarded) length it was divided by.
    pub fn normalized_or_epsilon(&self) -> (Pos, f32) {
        let length = self.length_or_epsilon();
        (*self * (1.0 / length), length)
    }
}

impl Add for Pos {
    type Output = Pos;
    fn add(self, other: Self) -> Self::Output {
        Pos::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Pos {
    type Output = Pos;
    fn sub(self, other: Self) -> Self::Output {
        Pos::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Pos {
    type Output = Pos;
    fn mul(self, other: f32) -> Self::Output {
        Pos::new(self.x * other, self.y * other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn zero_vector_normalizes_without_dividing_by_zero() {
        let (dir, length) = Pos::ZERO.normalized_or_epsilon();
        assert_eq!(length, EPSILON_DISTANCE);
        assert_eq!(dir, Pos::ZERO);
    }

    #[test]
    fn normalized_has_unit_length() {
        let (dir, length) = Pos::new(-6.0, 8.0).normalized_or_epsilon();
        assert_approx_eq!(length, 10.0);
        assert_approx_eq!(dir.length(), 1.0);
        assert_approx_eq!(dir.x, -0.6);
    }
}
