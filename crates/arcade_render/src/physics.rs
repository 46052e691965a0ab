//! Gravity-integrated movement with outer-bound clamping.
//!
//! Only the window's top and bottom edges are enforced. Interior geometry
//! (platforms, bricks, pipes) is the caller's business: resolve it per axis
//! against the position this leaves behind.

use crate::sprite::Body;

/// Explicit Euler step: velocity first, then position. `y` is clamped into
/// `[0, window_height - height]`; touching either bound zeroes `vy`.
pub fn integrate(body: &mut Body, gravity: f32, window_height: f32) {
    body.velocity.y += gravity;
    body.position.y += body.velocity.y;
    body.position.x += body.velocity.x;

    if body.position.y < 0.0 {
        body.position.y = 0.0;
        body.velocity.y = 0.0;
    }
    let floor = window_height - body.size.y;
    if body.position.y > floor {
        body.position.y = floor;
        body.velocity.y = 0.0;
    }
}
