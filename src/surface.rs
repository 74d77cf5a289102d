use glam::*;
use image::RgbaImage;

use crate::error::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
}

/// Axis-aligned rectangle in canvas pixels, top-left origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub pos: IVec2,
    pub size: UVec2,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> PixelRect {
        PixelRect {
            pos: ivec2(x, y),
            size: uvec2(w, h),
        }
    }

    pub fn max(&self) -> IVec2 {
        self.pos + self.size.as_ivec2()
    }

    pub fn center(&self) -> IVec2 {
        self.pos + self.size.as_ivec2() / 2
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        let min = self.pos.as_vec2();
        let max = self.max().as_vec2();
        p.x >= min.x && p.y >= min.y && p.x < max.x && p.y < max.y
    }

    /// Containment with all four edges inside.
    pub fn contains_inclusive(&self, p: Vec2) -> bool {
        let min = self.pos.as_vec2();
        let max = self.max().as_vec2();
        p.x >= min.x && p.y >= min.y && p.x <= max.x && p.y <= max.y
    }

    /// Grow (or shrink, for negative `by`) on every side.
    pub fn inflate(&self, by: i32) -> PixelRect {
        PixelRect {
            pos: self.pos - IVec2::splat(by),
            size: (self.size.as_ivec2() + IVec2::splat(by * 2))
                .max(IVec2::ZERO)
                .as_uvec2(),
        }
    }
}

/// Handle of a picture uploaded to a surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PictureId(pub u32);

/// An uploaded picture together with its pixel size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub picture: PictureId,
    pub size: UVec2,
}

impl Sprite {
    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            pos: IVec2::ZERO,
            size: self.size,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Font {
    Title,
    Body,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft(IVec2),
    Center(IVec2),
}

/// Where a frame gets drawn. Coordinates are canvas pixels.
pub trait Surface {
    fn size(&self) -> UVec2;

    fn load_picture(&mut self, image: &RgbaImage) -> Result<PictureId>;
    fn release_picture(&mut self, picture: PictureId);

    fn clear(&mut self, color: Rgb);
    /// Draw the `src` region of `picture` stretched over `dst`.
    fn blit(&mut self, picture: PictureId, src: PixelRect, dst: PixelRect);
    /// Rectangle border drawn inward from `rect`'s edges.
    fn outline(&mut self, color: Rgb, rect: PixelRect, thickness: u32);
    fn text(&mut self, text: &str, font: Font, color: Rgb, anchor: TextAnchor);
    fn measure_text(&mut self, text: &str, font: Font) -> f32;

    fn present(&mut self) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_bounds_include_far_edges() {
        let rect = PixelRect::new(2, 2, 100, 100);
        assert!(rect.contains_inclusive(vec2(102.0, 102.0)));
        assert!(rect.contains_inclusive(vec2(2.0, 2.0)));
        assert!(!rect.contains_inclusive(vec2(102.5, 50.0)));
        assert!(!rect.contains_inclusive(vec2(1.0, 50.0)));
    }

    #[test]
    fn half_open_bounds_exclude_far_edges() {
        let rect = PixelRect::new(350, 300, 300, 60);
        assert!(rect.contains(vec2(350.0, 300.0)));
        assert!(rect.contains(vec2(649.0, 359.0)));
        assert!(!rect.contains(vec2(650.0, 330.0)));
        assert!(!rect.contains(vec2(400.0, 360.0)));
    }

    #[test]
    fn inflate_grows_every_side() {
        let rect = PixelRect::new(10, 20, 100, 50).inflate(2);
        assert_eq!(rect, PixelRect::new(8, 18, 104, 54));
        assert_eq!(PixelRect::new(0, 0, 2, 2).inflate(-3).size, UVec2::ZERO);
    }
}
