//! Axis-aligned box geometry for paddles, bricks and the playfield
//!
//! Boxes are stored as min/max corners in world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given full size centered on `center`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Same box moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Point inside or on the boundary
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether `other` lies completely within this box (both corners contained)
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Overlap test (touching edges count as overlap)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Closest point on or inside the box
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Center position that keeps a box of `size` fully inside this one,
    /// as close as possible to `center`
    pub fn clamp_box_center(&self, center: Vec2, size: Vec2) -> Vec2 {
        let half = size.abs() * 0.5;
        let lo = self.min + half;
        let hi = self.max - half;
        Vec2::new(
            if lo.x <= hi.x { center.x.clamp(lo.x, hi.x) } else { self.center().x },
            if lo.y <= hi.y { center.y.clamp(lo.y, hi.y) } else { self.center().y },
        )
    }

    /// Slab test: distance along `dir` (unit length) from `origin` to the first
    /// entry into the box. Origins already inside report 0.
    pub fn ray_entry(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..2 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let mut t0 = (lo - o) * inv;
                let mut t1 = (hi - o) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(t_min)
    }

    /// Distance along `dir` from an inside point to where the ray leaves the box
    pub fn ray_exit(&self, origin: Vec2, dir: Vec2) -> f32 {
        let mut t_exit = f32::INFINITY;
        for axis in 0..2 {
            let d = dir[axis];
            if d > f32::EPSILON {
                t_exit = t_exit.min((self.max[axis] - origin[axis]) / d);
            } else if d < -f32::EPSILON {
                t_exit = t_exit.min((self.min[axis] - origin[axis]) / d);
            }
        }
        if t_exit.is_finite() { t_exit.max(0.0) } else { 0.0 }
    }
}
