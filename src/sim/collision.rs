//! Axis-aligned collision detection
//!
//! Everything in the arena is a box: avatar, flags, obstacles. Overlap is
//! strict on both axes, so boxes that merely share an edge do not collide.

use glam::Vec2;

/// Strict AABB overlap between two boxes given by top-left corner and size.
///
/// True iff each box's min is strictly below the other's max on both axes.
#[inline]
pub fn boxes_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_b.x < pos_a.x + size_a.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_b.y < pos_a.y + size_a.y
}
