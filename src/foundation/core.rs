use crate::foundation::error::{TilePaintError, TilePaintResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Integer pixel rectangle in device space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DeviceRect {
    /// Build a rectangle from its origin and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest pixel rectangle covering `rect` (edges floored/ceiled).
    ///
    /// Fails for non-finite input or when the cover does not fit the `i32` pixel grid.
    pub fn cover(rect: Rect) -> TilePaintResult<Self> {
        if !rect.is_finite() {
            return Err(TilePaintError::invalid_argument(
                "device rect cover requires finite edges",
            ));
        }
        let rect = rect.abs();
        let x0 = rect.x0.floor();
        let y0 = rect.y0.floor();
        let x1 = rect.x1.ceil();
        let y1 = rect.y1.ceil();
        let lo = f64::from(i32::MIN);
        let hi = f64::from(i32::MAX);
        if x0 < lo || y0 < lo || x1 > hi || y1 > hi {
            return Err(TilePaintError::invalid_argument(
                "device rect cover exceeds the pixel grid",
            ));
        }
        Ok(Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// `true` when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when pixel `(x, y)` lies inside.
    pub fn contains(self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        x >= i64::from(self.x) && x < self.right() && y >= i64::from(self.y) && y < self.bottom()
    }

    /// Overlap of two rectangles (empty at the origin-clamped corner when disjoint).
    pub fn intersect(self, other: Self) -> Self {
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0) as u32,
            height: (y1 - y0).max(0) as u32,
        }
    }

    /// The same area as a floating-point [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let [r, g, b, a] = crate::foundation::math::premultiply([r, g, b, a]);
        Self { r, g, b, a }
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from channels in `[r, g, b, a]` order (already premultiplied).
    pub fn from_array(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}
