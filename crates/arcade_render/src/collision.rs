//! Discrete AABB overlap over every sprite kind.
//!
//! Tests run once per step on end-of-step positions; there is no swept
//! test, so a fast body can tunnel through a thin one. Callers cap velocity
//! where that matters.

use glam::Vec2;

use crate::animation::AnimatedSprite;
use crate::sprite::{Body, FlatSprite, ImageSprite, Sprite, SpriteRef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_body(body: &Body) -> Self {
        Self {
            min: body.position,
            max: body.position + body.size,
        }
    }

    /// Strict overlap: rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Anything that can take part in a collision test. `None` means "not
/// collidable right now" (inactive, released, empty).
pub trait Collider {
    fn aabb(&self) -> Option<Aabb>;
}

impl Collider for Body {
    fn aabb(&self) -> Option<Aabb> {
        self.active.then(|| Aabb::from_body(self))
    }
}

impl Collider for FlatSprite {
    fn aabb(&self) -> Option<Aabb> {
        self.body.aabb()
    }
}

impl Collider for ImageSprite {
    fn aabb(&self) -> Option<Aabb> {
        self.body.aabb()
    }
}

impl Collider for Sprite {
    fn aabb(&self) -> Option<Aabb> {
        self.body().aabb()
    }
}

impl Collider for SpriteRef<'_> {
    fn aabb(&self) -> Option<Aabb> {
        self.body().aabb()
    }
}

/// Tests the displayed frame, gated on the animation being active.
impl Collider for AnimatedSprite {
    fn aabb(&self) -> Option<Aabb> {
        if !self.is_active() {
            return None;
        }
        self.current_frame().and_then(|f| f.aabb())
    }
}

impl<T: Collider> Collider for Option<T> {
    fn aabb(&self) -> Option<Aabb> {
        self.as_ref().and_then(Collider::aabb)
    }
}

impl<T: Collider + ?Sized> Collider for &T {
    fn aabb(&self) -> Option<Aabb> {
        (**self).aabb()
    }
}

/// True iff both operands are collidable and their boxes strictly overlap.
pub fn overlaps(a: &impl Collider, b: &impl Collider) -> bool {
    match (a.aabb(), b.aabb()) {
        (Some(a), Some(b)) => a.intersects(&b),
        _ => false,
    }
}
