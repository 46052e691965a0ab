//! Bounded per-frame paint list. Insertion order is back-to-front.

use crate::animation::AnimatedSprite;
use crate::sprite::{Sprite, SpriteRef};

/// Entries are snapshots taken at `add` time, so later moves of the source
/// sprite do not show until the next frame re-adds it. Image snapshots share
/// pixel storage with their source.
#[derive(Debug)]
pub struct SpriteGroup {
    entries: Vec<Sprite>,
    capacity: usize,
}

impl SpriteGroup {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sprite. Once the group is full this silently does nothing;
    /// size the group for the worst case.
    pub fn add<'a>(&mut self, sprite: impl Into<SpriteRef<'a>>) {
        if self.is_full() {
            log::trace!("Sprite group full ({}), entry dropped", self.capacity);
            return;
        }
        self.entries.push(sprite.into().snapshot());
    }

    /// Append the animation's displayed frame as an image entry. No-op for an
    /// inactive or empty animation.
    pub fn add_animated_frame(&mut self, anim: &AnimatedSprite) {
        if !anim.is_active() {
            return;
        }
        if let Some(frame) = anim.current_frame() {
            self.add(frame);
        }
    }

    /// Per-tick reset. Keeps the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = SpriteRef<'_>> {
        self.entries.iter().map(Sprite::view)
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.entries.get(index)
    }
}
