//! View offset: where the world is drawn relative to the viewport
//!
//! The renderer translates the world by `offset`. Each step the offset closes a fixed
//! fraction of the gap to `target`. The blend is per step, not per second, so the feel
//! depends on frame rate.

use glam::Vec2;

use crate::consts::CAMERA_TRANSITION_FRICTION;

/// Offset that centres `focus` in a viewport of `viewport` size
#[inline]
pub fn focus_offset(focus: Vec2, viewport: Vec2) -> Vec2 {
    -(focus - viewport / 2.0)
}

/// World-space rectangle, exclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewRect {
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.y > self.min.y && point.x < self.max.x && point.y < self.max.y
    }
}

/// Rendered offset and the offset it is easing toward
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub target: Vec2,
}

impl Camera {
    /// Aim at `focus`
    pub fn focus(&mut self, focus: Vec2, viewport: Vec2) {
        self.target = focus_offset(focus, viewport);
    }

    /// Snap the rendered offset to the target
    pub fn jump(&mut self) {
        self.offset = self.target;
    }

    /// Close a fixed fraction of the gap to the target
    pub fn smooth(&mut self) {
        self.offset += (self.target - self.offset) * CAMERA_TRANSITION_FRICTION;
    }

    /// Visible world rectangle grown by `margin` on every side
    pub fn view_rect(&self, viewport: Vec2, margin: f32) -> ViewRect {
        let origin = -self.offset;
        ViewRect {
            min: origin - Vec2::splat(margin),
            max: origin + viewport + Vec2::splat(margin),
        }
    }
}
