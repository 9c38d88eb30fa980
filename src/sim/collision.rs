//! Ball collision detection and response against boxes and field walls

use glam::Vec2;

use super::geom::Aabb;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle vs box
///
/// A center inside the box (tunneling) is pushed out through the nearest face.
pub fn ball_box_collision(ball_pos: Vec2, ball_radius: f32, bounds: &Aabb) -> CollisionResult {
    let closest = bounds.clamp_point(ball_pos);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center inside: pick the face with the least overlap
    let to_min = ball_pos - bounds.min;
    let to_max = bounds.max - ball_pos;
    let faces = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .fold((f32::INFINITY, Vec2::X), |best, face| if face.0 < best.0 { face } else { best });

    CollisionResult {
        hit: true,
        point: ball_pos + normal * depth,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Top/bottom wall check. Balls leaving through the sides are lost, not bounced.
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, field: &Aabb) -> CollisionResult {
    if ball_pos.y + ball_radius > field.max.y {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, field.max.y),
            normal: Vec2::NEG_Y,
            penetration: ball_pos.y + ball_radius - field.max.y,
        };
    }
    if ball_pos.y - ball_radius < field.min.y {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, field.min.y),
            normal: Vec2::Y,
            penetration: field.min.y - (ball_pos.y - ball_radius),
        };
    }
    CollisionResult::miss()
}

/// Whether the ball has fully left the field through a side edge
pub fn ball_out_of_play(ball_pos: Vec2, ball_radius: f32, field: &Aabb) -> bool {
    ball_pos.x + ball_radius < field.min.x || ball_pos.x - ball_radius > field.max.x
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Paddle rebound: always heads back toward the center, picks up the
/// paddle's motion, keeps its speed
pub fn paddle_rebound(velocity: Vec2, dir_to_center: f32, influence: Vec2, influence_factor: f32) -> Vec2 {
    let speed = velocity.length();
    let mut out = Vec2::new(velocity.x.abs() * dir_to_center, velocity.y);
    out += influence * influence_factor;

    // Never let the paddle's own motion flip the ball back behind it
    if out.x * dir_to_center <= 0.0 {
        out.x = dir_to_center * speed.max(1.0) * 0.25;
    }
    out.normalize_or_zero() * speed
}
