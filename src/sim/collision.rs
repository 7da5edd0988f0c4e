//! Axis-separated movement resolution against static obstacles
//!
//! A body is moved along X first, pushed out of anything it ran into, then
//! moved along Y and pushed out again. Resolving each axis on its own keeps
//! the math trivial. The price is that a body moving further than an
//! obstacle's thickness in one step can clip through a corner, so step sizes
//! must stay below the smallest obstacle dimension.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AxisAlignedBody, MovableBody, Rect};
use super::tilemap::ObstacleQuery;

/// Which sides of a body were blocked during one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    #[inline]
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    #[inline]
    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

/// Outcome of a single resolution (immutable per tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Vec2,
    pub flags: CollisionFlags,
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Move `body` by `velocity * dt` and push it out of any obstacle it enters.
///
/// Flags are computed fresh on every call. An axis with zero velocity is
/// never corrected, even if the body already overlaps something, since no
/// push direction can be derived from it. When several obstacles overlap on
/// the same axis the nearest one (the most restrictive clamp) wins, so the
/// result does not depend on obstacle insertion order.
pub fn resolve<O>(body: &AxisAlignedBody, velocity: Vec2, dt: f32, obstacles: &O) -> Resolution
where
    O: ObstacleQuery + ?Sized,
{
    let mut rect = body.rect();
    let mut flags = CollisionFlags::NONE;

    sweep_axis(&mut rect, Axis::X, velocity.x * dt, obstacles, &mut flags);
    sweep_axis(&mut rect, Axis::Y, velocity.y * dt, obstacles, &mut flags);

    Resolution {
        position: rect.position(),
        flags,
    }
}

/// Resolve any body exposing the `MovableBody` capability
pub fn resolve_body<B, O>(body: &B, dt: f32, obstacles: &O) -> Resolution
where
    B: MovableBody + ?Sized,
    O: ObstacleQuery + ?Sized,
{
    resolve(&body.body(), body.velocity(), dt, obstacles)
}

fn sweep_axis<O>(rect: &mut Rect, axis: Axis, delta: f32, obstacles: &O, flags: &mut CollisionFlags)
where
    O: ObstacleQuery + ?Sized,
{
    match axis {
        Axis::X => rect.x += delta,
        Axis::Y => rect.y += delta,
    }

    if delta == 0.0 {
        return;
    }

    let mut clamp: Option<f32> = None;
    for obstacle in obstacles.overlapping(*rect) {
        // Edge the moving rect must be pushed back to
        let edge = match (axis, delta > 0.0) {
            (Axis::X, true) => obstacle.left(),
            (Axis::X, false) => obstacle.right(),
            (Axis::Y, true) => obstacle.top(),
            (Axis::Y, false) => obstacle.bottom(),
        };
        clamp = Some(match clamp {
            None => edge,
            Some(current) if delta > 0.0 => current.min(edge),
            Some(current) => current.max(edge),
        });
    }

    let Some(edge) = clamp else {
        return;
    };

    match (axis, delta > 0.0) {
        (Axis::X, true) => {
            rect.set_right(edge);
            flags.right = true;
        }
        (Axis::X, false) => {
            rect.set_left(edge);
            flags.left = true;
        }
        (Axis::Y, true) => {
            rect.set_bottom(edge);
            flags.bottom = true;
        }
        (Axis::Y, false) => {
            rect.set_top(edge);
            flags.top = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn body(x: f32, y: f32, w: f32, h: f32) -> AxisAlignedBody {
        AxisAlignedBody::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_free_movement_integrates() {
        let obstacles: Vec<Rect> = Vec::new();
        let result = resolve(&body(0.0, 0.0, 10.0, 10.0), Vec2::new(60.0, -120.0), DT, &obstacles);
        assert!((result.position.x - 1.0).abs() < 1e-5);
        assert!((result.position.y + 2.0).abs() < 1e-5);
        assert_eq!(result.flags, CollisionFlags::NONE);
    }

    #[test]
    fn test_falling_onto_floor() {
        let floor = vec![Rect::new(0.0, 200.0, 5000.0, 20.0)];
        let result = resolve(&body(50.0, 181.0, 9.0, 18.0), Vec2::new(0.0, 120.0), DT, &floor);
        assert_eq!(result.position.y, 182.0);
        assert!(result.flags.bottom);
        assert!(!result.flags.top && !result.flags.horizontal());
    }

    #[test]
    fn test_hitting_ceiling() {
        let ceiling = vec![Rect::new(0.0, 0.0, 100.0, 20.0)];
        let result = resolve(&body(10.0, 21.0, 9.0, 18.0), Vec2::new(0.0, -120.0), DT, &ceiling);
        assert_eq!(result.position.y, 20.0);
        assert!(result.flags.top);
        assert!(!result.flags.bottom);
    }

    #[test]
    fn test_walls_on_both_sides() {
        let walls = vec![Rect::new(100.0, 0.0, 20.0, 100.0), Rect::new(0.0, 0.0, 20.0, 100.0)];

        let right = resolve(&body(90.0, 10.0, 9.0, 18.0), Vec2::new(120.0, 0.0), DT, &walls);
        assert_eq!(right.position.x, 91.0);
        assert!(right.flags.right && !right.flags.left);

        let left = resolve(&body(21.0, 10.0, 9.0, 18.0), Vec2::new(-120.0, 0.0), DT, &walls);
        assert_eq!(left.position.x, 20.0);
        assert!(left.flags.left && !left.flags.right);
    }

    #[test]
    fn test_zero_velocity_overlap_is_left_alone() {
        let block = vec![Rect::new(0.0, 0.0, 100.0, 100.0)];
        let start = body(40.0, 40.0, 10.0, 10.0);
        let result = resolve(&start, Vec2::ZERO, DT, &block);
        assert_eq!(result.position, start.position);
        assert!(!result.flags.any());
    }

    #[test]
    fn test_nearest_obstacle_wins_on_one_axis() {
        // Both walls are entered in the same step; the closer one stops the body
        let near = Rect::new(100.0, 0.0, 20.0, 100.0);
        let far = Rect::new(102.0, 0.0, 20.0, 100.0);
        let start = body(88.0, 10.0, 9.0, 18.0);
        let v = Vec2::new(600.0, 0.0);

        let a = resolve(&start, v, DT, &vec![near, far]);
        let b = resolve(&start, v, DT, &vec![far, near]);
        assert_eq!(a.position.x, 91.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_flags_are_not_carried_between_calls() {
        let floor = vec![Rect::new(0.0, 200.0, 5000.0, 20.0)];
        let landed = resolve(&body(50.0, 181.0, 9.0, 18.0), Vec2::new(0.0, 120.0), DT, &floor);
        assert!(landed.flags.bottom);

        let lifted = AxisAlignedBody::new(landed.position, Vec2::new(9.0, 18.0));
        let jumping = resolve(&lifted, Vec2::new(0.0, -280.0), DT, &floor);
        assert_eq!(jumping.flags, CollisionFlags::NONE);
    }

    #[test]
    fn test_resolve_body_uses_capability() {
        let floor = vec![Rect::new(0.0, 200.0, 5000.0, 20.0)];
        let mover = (body(50.0, 181.0, 9.0, 18.0), Vec2::new(0.0, 120.0));
        let result = resolve_body(&mover, DT, floor.as_slice());
        assert!(result.flags.bottom);
    }

    #[test]
    fn test_diagonal_into_l_corner_is_order_independent() {
        let floor = Rect::new(0.0, 100.0, 200.0, 20.0);
        let wall = Rect::new(100.0, 0.0, 20.0, 100.0);
        let start = body(89.0, 80.0, 9.0, 18.0);
        let v = Vec2::new(240.0, 240.0);

        let a = resolve(&start, v, DT, &vec![floor, wall]);
        let b = resolve(&start, v, DT, &vec![wall, floor]);
        assert_eq!(a, b);
        assert_eq!(a.position, Vec2::new(91.0, 82.0));
        assert!(a.flags.right && a.flags.bottom);
    }

    /// Integer-aligned obstacles keep the clamped edges exact in f32
    fn obstacle_strategy() -> impl Strategy<Value = Rect> {
        (-20i32..20, -20i32..20, 10i32..40, 10i32..40)
            .prop_map(|(gx, gy, w, h)| Rect::new((gx * 40) as f32, (gy * 40) as f32, w as f32, h as f32))
    }

    proptest! {
        #[test]
        fn prop_no_tunneling_at_low_speed(
            obstacles in prop::collection::vec(obstacle_strategy(), 1..12),
            start_x in -800.0f32..800.0,
            start_y in -800.0f32..800.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
        ) {
            // Max step of 500/60 ≈ 8.3 stays under the smallest obstacle side (10)
            let start = body(start_x, start_y, 9.0, 18.0);
            prop_assume!(obstacles.overlapping(start.rect()).next().is_none());

            let result = resolve(&start, Vec2::new(vx, vy), DT, &obstacles);
            let end = Rect::from_pos_size(result.position, start.size);
            prop_assert!(obstacles.overlapping(end).next().is_none());
        }

        #[test]
        fn prop_resolution_is_order_independent(
            mut obstacles in prop::collection::vec(obstacle_strategy(), 1..8),
            start_x in -400.0f32..400.0,
            start_y in -400.0f32..400.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
        ) {
            let start = body(start_x, start_y, 9.0, 18.0);
            prop_assume!(obstacles.overlapping(start.rect()).next().is_none());

            let v = Vec2::new(vx, vy);
            let forward = resolve(&start, v, DT, &obstacles);
            obstacles.reverse();
            let reversed = resolve(&start, v, DT, &obstacles);
            prop_assert_eq!(forward, reversed);
        }
    }
}
