use crate::bounds::Bounds;
use crate::pos::Pos;
use crate::scale::scale;

/// Tuning for the ball's grip and physics, all in canvas pixels and seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallPhysics {
    pub min_radius: f32,
    pub max_radius: f32,
    pub canvas_height: f32,
    /// Added to the fall velocity every second.
    pub gravity: f32,
    /// Downward pull on the grip point every second while slipping.
    pub slip_bias: f32,
    /// Radius above which a held ball starts slipping out of the grip.
    pub heaviness_radius: f32,
    /// Grip offset from the centre below which slipping stops.
    pub slip_release_offset: f32,
    /// Fraction of the pointer movement that pulls the grip toward the centre.
    pub grip_tighten_rate: f32,
}

impl Default for BallPhysics {
    fn default() -> Self {
        BallPhysics {
            min_radius: 30.0,
            max_radius: 80.0,
            canvas_height: 640.0,
            gravity: 20.0,
            slip_bias: 10.0,
            heaviness_radius: 55.0,
            slip_release_offset: 24.0,
            grip_tighten_rate: 0.1,
        }
    }
}

/// Where on the ball the pointer holds it.
///
/// `dir` points from the grip point toward the centre; the grip point sits
/// `radial_ratio * radius` away from the centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GripOffset {
    pub dir: Pos,
    pub radial_ratio: f32,
}

impl GripOffset {
    pub const NONE: GripOffset = GripOffset {
        dir: Pos::ZERO,
        radial_ratio: 0.0,
    };

    /// Grip computed from a ball-local point (relative to the centre).
    pub fn from_local(local: Pos, radius: f32) -> Self {
        let (dir, distance) = local.normalized_or_epsilon();
        GripOffset {
            dir: dir * -1.0,
            radial_ratio: distance / radius,
        }
    }

    /// Vector from the grip point to the ball centre.
    pub fn displacement(&self, radius: f32) -> Pos {
        self.dir * (self.radial_ratio * radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallState {
    Resting,
    Falling,
    Grabbed,
    SlippingAway,
}

#[derive(Clone, Debug)]
pub struct Ball {
    pub pos: Pos,
    radius: f32,
    y_velocity: f32,
    grip: GripOffset,
    held: bool,
    is_slipping: bool,
    physics: BallPhysics,
}

impl Ball {
    pub fn new(pos: Pos, physics: BallPhysics) -> Self {
        let mut ball = Ball {
            pos,
            radius: physics.max_radius,
            y_velocity: 0.0,
            grip: GripOffset::NONE,
            held: false,
            is_slipping: false,
            physics,
        };
        ball.update_radius();
        ball
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn y_velocity(&self) -> f32 {
        self.y_velocity
    }

    pub fn grip(&self) -> GripOffset {
        self.grip
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_slipping(&self) -> bool {
        self.is_slipping
    }

    pub fn physics(&self) -> &BallPhysics {
        &self.physics
    }

    /// The ball is largest at the top of the canvas and smallest at the floor.
    pub fn radius_at(&self, y: f32) -> f32 {
        scale(
            0.0,
            self.physics.canvas_height - self.physics.min_radius,
            y,
            self.physics.max_radius,
            self.physics.min_radius,
        )
    }

    pub fn update_radius(&mut self) {
        self.radius = self.radius_at(self.pos.y);
    }

    pub fn state(&self, floor: f32) -> BallState {
        match (self.held, self.is_slipping) {
            (true, true) => BallState::SlippingAway,
            (true, false) => BallState::Grabbed,
            (false, _) if self.is_on_ground(floor) => BallState::Resting,
            (false, _) => BallState::Falling,
        }
    }

    /// `travel.bottom` is the resting boundary the centre may not sink below.
    pub fn limit_to_bounds(&mut self, travel: &Bounds) {
        if self.pos.y > travel.bottom {
            self.pos.y = travel.bottom;
        } else if self.pos.y - self.radius < travel.top {
            self.pos.y = travel.top + self.radius;
        }

        if self.pos.x - self.radius < travel.left {
            self.pos.x = travel.left + self.radius;
        } else if self.pos.x + self.radius > travel.right {
            self.pos.x = travel.right - self.radius;
        }
    }

    pub fn is_on_ground(&self, floor: f32) -> bool {
        self.pos.y >= floor
    }

    pub fn hit_test(&self, p: Pos) -> bool {
        self.pos.distance(&p) <= self.radius
    }

    /// Starts holding the ball if `pointer` is on it.
    pub fn grab(&mut self, pointer: Pos) -> bool {
        if !self.hit_test(pointer) {
            return false;
        }

        self.held = true;
        self.y_velocity = 0.0;
        self.update_grip_offset(pointer);
        self.grip.radial_ratio = self.grip.radial_ratio.clamp(0.0, 1.0);
        true
    }

    pub fn release(&mut self) {
        self.held = false;
        self.is_slipping = false;
        self.grip = GripOffset::NONE;
    }

    pub fn grip_is_lost(&self, pointer: Pos) -> bool {
        !self.hit_test(pointer)
    }

    fn update_grip_offset(&mut self, pointer: Pos) {
        self.grip = GripOffset::from_local(pointer - self.pos, self.radius);
    }

    fn settle(&mut self, travel: &Bounds) {
        self.update_radius();
        self.limit_to_bounds(travel);
    }

    /// Pulls the held ball onto the pointer, then back out by the grip offset.
    ///
    /// Pointer jitter close to the centre slides the grip toward the centre by
    /// `grip_tighten_rate` of the movement.
    pub fn drag_to(&mut self, pointer: Pos, pointer_movement: f32, travel: &Bounds) {
        self.y_velocity = 0.0;

        let (dir, distance) = (pointer - self.pos).normalized_or_epsilon();
        self.pos += dir * distance;

        if distance < self.physics.min_radius * 1.2 || distance < self.radius * 0.8 {
            let offset = self.grip.radial_ratio * self.radius;
            let tightened = offset - pointer_movement * self.physics.grip_tighten_rate;
            self.grip.radial_ratio = (tightened / self.radius).max(0.0);
        }

        self.pos += self.grip.displacement(self.radius);

        self.settle(travel);
        self.settle(travel);
    }

    /// A heavy ball sags in the grip: the grip point slides toward the bottom
    /// of the ball until it is close enough to the centre again.
    ///
    /// Returns whether slipping ran this tick.
    pub fn slip(&mut self, dt: f32, pointer: Pos, travel: &Bounds) -> bool {
        if self.radius <= self.physics.heaviness_radius && !self.is_slipping {
            return false;
        }
        self.is_slipping = true;

        let mut offset = self.grip.displacement(self.radius);
        self.pos -= offset;
        offset.y += self.physics.slip_bias * dt;

        let (dir, distance) = offset.normalized_or_epsilon();
        self.grip = GripOffset {
            dir,
            radial_ratio: distance / self.radius,
        };
        self.pos += self.grip.displacement(self.radius);

        self.settle(travel);
        self.update_grip_offset(pointer);

        if self.grip.radial_ratio * self.radius < self.physics.slip_release_offset {
            self.is_slipping = false;
        }

        true
    }

    /// Gravity step for a free ball. Returns whether the ball moved.
    pub fn fall(&mut self, dt: f32, travel: &Bounds) -> bool {
        if self.held {
            return false;
        }
        if self.is_on_ground(travel.bottom) {
            self.y_velocity = 0.0;
            return false;
        }

        let old_y = self.pos.y;
        self.y_velocity += self.physics.gravity * dt;
        self.pos.y += self.y_velocity;
        self.settle(travel);

        if self.is_on_ground(travel.bottom) {
            self.y_velocity = 0.0;
        }

        old_y != self.pos.y
    }

    /// Places the ball's centre on `y`, e.g. the resting boundary after a
    /// note shift.
    pub fn pin_to(&mut self, y: f32) {
        self.pos.y = y;
        self.y_velocity = 0.0;
        self.update_radius();
    }
}
