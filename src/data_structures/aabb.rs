//! Axis-aligned bounding boxes.

use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3};

/// A min/max corner pair.
///
/// An empty box has `min > max` on every axis so that `union` with any other
/// box yields the other box unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }

    /// Half the size of the box along each axis.
    pub fn extent(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Bounding box of this box after an affine transformation.
    ///
    /// Uses Arvo's method: each output axis accumulates the min/max of the
    /// matrix column contributions instead of transforming all eight corners.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let translation = matrix.w.truncate();
        let mut min = translation;
        let mut max = translation;
        let lo = [self.min.x, self.min.y, self.min.z];
        let hi = [self.max.x, self.max.y, self.max.z];
        let columns = [matrix.x.truncate(), matrix.y.truncate(), matrix.z.truncate()];
        for (col, column) in columns.iter().enumerate() {
            for row in 0..3 {
                let a = column[row] * lo[col];
                let b = column[row] * hi[col];
                min[row] += a.min(b);
                max[row] += a.max(b);
            }
        }
        Aabb {
            min: Point3::from_vec(min),
            max: Point3::from_vec(max),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
