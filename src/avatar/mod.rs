use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("avatar image has no pixels")]
    EmptyImage,
    #[error("crop region does not overlap the image")]
    EmptyCrop,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type AvatarResult<T> = std::result::Result<T, AvatarError>;

/// Crop rectangle in the coordinates of the rotated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Largest centered square inside a `width` x `height` image.
    pub fn centered_square(width: u32, height: u32) -> Self {
        let side = width.min(height);
        let x = i32::try_from((width - side) / 2).unwrap_or(0);
        let y = i32::try_from((height - side) / 2).unwrap_or(0);
        Self::new(x, y, side, side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Nearest quarter turn for an arbitrary angle in degrees.
    pub fn from_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(360);
        match (normalized + 45) / 90 % 4 {
            1 => Rotation::Cw90,
            2 => Rotation::Cw180,
            3 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarTransform {
    pub rotation: Rotation,
    pub crop: Option<CropRect>,
    /// Longest edge after processing; `0` disables downscaling.
    pub max_size: u32,
}

impl Default for AvatarTransform {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            crop: None,
            max_size: crate::config::DEFAULT_AVATAR_MAX_SIZE,
        }
    }
}

/// Clamp a crop to the image; `None` when nothing of it remains.
pub fn bounded_crop(rect: CropRect, source_width: u32, source_height: u32) -> Option<CropRect> {
    if rect.width == 0 || rect.height == 0 || source_width == 0 || source_height == 0 {
        return None;
    }
    let source_width = i64::from(source_width);
    let source_height = i64::from(source_height);
    let left = i64::from(rect.x).max(0);
    let top = i64::from(rect.y).max(0);
    let right = (i64::from(rect.x) + i64::from(rect.width)).min(source_width);
    let bottom = (i64::from(rect.y) + i64::from(rect.height)).min(source_height);
    if left >= right || top >= bottom {
        return None;
    }

    Some(CropRect::new(
        i32::try_from(left).ok()?,
        i32::try_from(top).ok()?,
        u32::try_from(right - left).ok()?,
        u32::try_from(bottom - top).ok()?,
    ))
}

fn downscaled_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max_size == 0 || longest <= max_size {
        return (width, height);
    }
    let scale = f64::from(max_size) / f64::from(longest);
    let scaled = |edge: u32| ((f64::from(edge) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

impl AvatarTransform {
    /// Rotate, then crop, then downscale.
    pub fn apply(&self, source: &RgbaImage) -> AvatarResult<RgbaImage> {
        if source.width() == 0 || source.height() == 0 {
            return Err(AvatarError::EmptyImage);
        }

        let rotated = match self.rotation {
            Rotation::None => source.clone(),
            Rotation::Cw90 => imageops::rotate90(source),
            Rotation::Cw180 => imageops::rotate180(source),
            Rotation::Cw270 => imageops::rotate270(source),
        };

        let cropped = match self.crop {
            Some(rect) => {
                let bounded = bounded_crop(rect, rotated.width(), rotated.height())
                    .ok_or(AvatarError::EmptyCrop)?;
                if bounded != rect {
                    tracing::debug!(?rect, ?bounded, "avatar crop clamped to image bounds");
                }
                imageops::crop_imm(
                    &rotated,
                    bounded.x as u32,
                    bounded.y as u32,
                    bounded.width,
                    bounded.height,
                )
                .to_image()
            }
            None => rotated,
        };

        let (width, height) = downscaled_size(cropped.width(), cropped.height(), self.max_size);
        if (width, height) == cropped.dimensions() {
            return Ok(cropped);
        }
        Ok(imageops::resize(
            &cropped,
            width,
            height,
            imageops::FilterType::Triangle,
        ))
    }

    /// Decode any supported format, transform, and re-encode as PNG.
    pub fn apply_to_bytes(&self, encoded: &[u8]) -> AvatarResult<Vec<u8>> {
        let source = image::load_from_memory(encoded)?.to_rgba8();
        let processed = self.apply(&source)?;
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(processed).write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn rotation_from_degrees_snaps_to_quarter_turns() {
        assert_eq!(Rotation::from_degrees(0), Rotation::None);
        assert_eq!(Rotation::from_degrees(90), Rotation::Cw90);
        assert_eq!(Rotation::from_degrees(-90), Rotation::Cw270);
        assert_eq!(Rotation::from_degrees(181), Rotation::Cw180);
        assert_eq!(Rotation::from_degrees(350), Rotation::None);
        assert_eq!(Rotation::from_degrees(720 + 270), Rotation::Cw270);
    }

    #[test]
    fn bounded_crop_clamps_to_source() {
        assert_eq!(
            bounded_crop(CropRect::new(-10, -10, 50, 50), 30, 20),
            Some(CropRect::new(0, 0, 30, 20))
        );
        assert_eq!(
            bounded_crop(CropRect::new(5, 5, 10, 10), 30, 20),
            Some(CropRect::new(5, 5, 10, 10))
        );
        assert_eq!(bounded_crop(CropRect::new(40, 0, 10, 10), 30, 20), None);
        assert_eq!(bounded_crop(CropRect::new(0, 0, 0, 10), 30, 20), None);
    }

    #[test]
    fn centered_square_uses_shorter_edge() {
        assert_eq!(CropRect::centered_square(300, 200), CropRect::new(50, 0, 200, 200));
        assert_eq!(CropRect::centered_square(120, 160), CropRect::new(0, 20, 120, 120));
    }

    #[test]
    fn rotation_then_crop_uses_rotated_coordinates() {
        let source = gradient_image(40, 20);
        let transform = AvatarTransform {
            rotation: Rotation::Cw90,
            crop: Some(CropRect::new(0, 0, 20, 20)),
            max_size: 0,
        };
        let out = transform.apply(&source).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        // After a clockwise quarter turn the source's bottom-left lands top-left.
        assert_eq!(out.get_pixel(0, 0), source.get_pixel(0, 19));
    }

    #[test]
    fn downscale_keeps_aspect_ratio() {
        let transform = AvatarTransform {
            max_size: 50,
            ..AvatarTransform::default()
        };
        let out = transform.apply(&gradient_image(200, 100)).unwrap();
        assert_eq!(out.dimensions(), (50, 25));

        let small = transform.apply(&gradient_image(30, 10)).unwrap();
        assert_eq!(small.dimensions(), (30, 10));
    }

    #[test]
    fn empty_inputs_are_errors() {
        let transform = AvatarTransform::default();
        assert!(matches!(
            transform.apply(&RgbaImage::new(0, 0)),
            Err(AvatarError::EmptyImage)
        ));
        let off_canvas = AvatarTransform {
            crop: Some(CropRect::new(100, 100, 5, 5)),
            ..AvatarTransform::default()
        };
        assert!(matches!(
            off_canvas.apply(&gradient_image(10, 10)),
            Err(AvatarError::EmptyCrop)
        ));
        assert!(matches!(
            transform.apply_to_bytes(b"not an image"),
            Err(AvatarError::Image(_))
        ));
    }

    #[test]
    fn apply_to_bytes_outputs_png() {
        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(gradient_image(64, 48))
            .write_to(&mut encoded, ImageFormat::Png)
            .unwrap();
        let transform = AvatarTransform {
            crop: Some(CropRect::centered_square(64, 48)),
            max_size: 32,
            ..AvatarTransform::default()
        };
        let png = transform.apply_to_bytes(encoded.get_ref()).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }
}
