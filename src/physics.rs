//! Arcade physics: axis-aligned boxes, constant gravity, no rotation.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Strict overlap; boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Anchor position. Where the anchor sits inside the box is set by `origin`.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Anchor as a fraction of the size: (0, 0) top-left, (0.5, 0.5) centre.
    pub origin: (f32, f32),
    pub vx: f32,
    pub vy: f32,
    pub allow_gravity: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32, origin: (f32, f32)) -> Self {
        Self {
            x,
            y,
            width,
            height,
            origin,
            vx: 0.0,
            vy: 0.0,
            allow_gravity: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        let left = self.x - self.width * self.origin.0;
        let top = self.y - self.height * self.origin.1;
        Rect {
            left,
            top,
            right: left + self.width,
            bottom: top + self.height,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Physics {
    pub gravity: f32,
    pub paused: bool,
}

impl Physics {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            paused: false,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Semi-implicit Euler: velocity first, then position.
    pub fn step(&self, body: &mut Body, dt: f32) {
        if self.paused {
            return;
        }
        if body.allow_gravity {
            body.vy += self.gravity * dt;
        }
        body.x += body.vx * dt;
        body.y += body.vy * dt;
    }
}
