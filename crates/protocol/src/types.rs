use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether `p` lies inside the rectangle (right/bottom edges exclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Whether any part of the rectangle overlaps the vertical band `[top, bottom)`.
    pub fn overlaps_rows(&self, top: f64, bottom: f64) -> bool {
        self.y < bottom && self.bottom() > top
    }
}

/// The drawable area handed to a view, in logical pixels.
///
/// `x`/`y` place the view inside the host surface; every command a view
/// emits is relative to this origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Device pixel ratio of the host surface.
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            dpr: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, 10.0)));
    }

    #[test]
    fn rect_overlaps_rows() {
        let r = Rect::new(0.0, 40.0, 10.0, 40.0);
        assert!(r.overlaps_rows(0.0, 41.0));
        assert!(!r.overlaps_rows(0.0, 40.0));
        assert!(!r.overlaps_rows(80.0, 120.0));
    }

    #[test]
    fn viewport_rect_uses_origin() {
        let mut vp = Viewport::new(100.0, 200.0);
        vp.x = 5.0;
        vp.y = 7.0;
        assert_eq!(vp.rect(), Rect::new(5.0, 7.0, 100.0, 200.0));
    }
}
