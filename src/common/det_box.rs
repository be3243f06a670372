use serde::{Deserialize, Serialize};

/// Axis aligned box in model input pixel space, stored as top-left / bottom-right corners.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct DetBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl DetBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from its center point and size.
    pub fn from_cxcy_wh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn from_array(b: [f32; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Returns the center x-coordinate of the bounding box.
    pub fn cx(&self) -> f32 {
        (self.x1 + self.x2) / 2.
    }

    /// Returns the center y-coordinate of the bounding box.
    pub fn cy(&self) -> f32 {
        (self.y1 + self.y2) / 2.
    }

    /// Computes the area of the bounding box. Inverted boxes report a non-positive area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.x2 > self.x1 && self.y2 > self.y1)
    }

    /// Computes the intersection area between this bounding box and another.
    pub fn intersect(&self, other: &DetBox) -> f32 {
        let left = self.x1.max(other.x1);
        let right = self.x2.min(other.x2);
        let top = self.y1.max(other.y1);
        let bottom = self.y2.min(other.y2);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &DetBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Intersection over union. Zero when the boxes do not overlap or either one is degenerate.
    pub fn iou(&self, other: &DetBox) -> f32 {
        if self.area() <= 0. || other.area() <= 0. {
            return 0.;
        }
        let inter = self.intersect(other);
        if inter <= 0. {
            return 0.;
        }
        let union = self.union(other);
        if union <= 0. {
            0.
        } else {
            inter / union
        }
    }

    /// Clamps every corner into `[0, size]`.
    pub fn clamp_to_square(self, size: f32) -> Self {
        Self {
            x1: self.x1.clamp(0., size),
            y1: self.y1.clamp(0., size),
            x2: self.x2.clamp(0., size),
            y2: self.y2.clamp(0., size),
        }
    }

    /// Checks if this bounding box completely contains another bounding box `other`.
    pub fn contains(&self, other: &DetBox) -> bool {
        self.x1 <= other.x1 && self.x2 >= other.x2 && self.y1 <= other.y1 && self.y2 >= other.y2
    }

    /// Returns the bounding box coordinates as `[x1, y1, x2, y2]`.
    pub fn as_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn as_xy_wh_i32(&self) -> (i32, i32, i32, i32) {
        (self.x1.round() as i32,
         self.y1.round() as i32,
         self.width().round() as i32,
         self.height().round() as i32)
    }
}

impl From<[f32; 4]> for DetBox {
    fn from(b: [f32; 4]) -> Self {
        Self::from_array(b)
    }
}
