use crate::pos::Pos;

/// Axis-aligned box in canvas coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        BBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            top: self.y,
            bottom: self.y + self.height,
            left: self.x,
            right: self.x + self.width,
        }
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.bounds().contains(p)
    }
}

impl Bounds {
    /// Edges count as inside.
    pub fn contains(&self, p: Pos) -> bool {
        if p.x < self.left || p.x > self.right {
            return false;
        }
        if p.y < self.top || p.y > self.bottom {
            return false;
        }

        true
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bounds_are_derived_from_the_box() {
        let bbox = BBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            bbox.bounds(),
            Bounds {
                top: 20.0,
                bottom: 70.0,
                left: 10.0,
                right: 110.0
            }
        );
    }

    #[test]
    fn containment_includes_edges() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains(Pos::new(0.0, 10.0)));
        assert!(bbox.contains(Pos::new(5.0, 5.0)));
        assert!(!bbox.contains(Pos::new(10.1, 5.0)));
        assert!(!bbox.contains(Pos::new(5.0, -0.1)));
    }
}
