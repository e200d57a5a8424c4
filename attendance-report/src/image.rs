// Image decoding and aspect-fit placement

use ::image::{Rgba, RgbImage};

use crate::error::AssetError;
use crate::geometry::Rect;

/// Uniformly scale `intrinsic` into `bounds`. One axis matches the box
/// exactly, the other is no larger than the box. `None` for degenerate sizes.
pub fn scale_to_fit(
    intrinsic_w: f32,
    intrinsic_h: f32,
    box_w: f32,
    box_h: f32,
) -> Option<(f32, f32)> {
    let finite = [intrinsic_w, intrinsic_h, box_w, box_h]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
    if !finite {
        return None;
    }

    let scale_w = box_w / intrinsic_w;
    let scale_h = box_h / intrinsic_h;
    if scale_w <= scale_h {
        // Width-constrained
        Some((box_w, (intrinsic_h * scale_w).min(box_h)))
    } else {
        // Height-constrained
        Some(((intrinsic_w * scale_h).min(box_w), box_h))
    }
}

/// Aspect-fit `intrinsic` into `bounds` and center it.
pub fn place_in_box(intrinsic_w: f32, intrinsic_h: f32, bounds: Rect) -> Option<Rect> {
    let (w, h) = scale_to_fit(intrinsic_w, intrinsic_h, bounds.width, bounds.height)?;
    Some(Rect::new(
        bounds.x + (bounds.width - w) / 2.0,
        bounds.y + (bounds.height - h) / 2.0,
        w,
        h,
    ))
}

/// An image flattened to 8-bit RGB, ready to embed.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl DecodedImage {
    /// Decode PNG or JPEG bytes, compositing any transparency onto white.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img =
            ::image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;

        let rgba_image = img.to_rgba8();
        let (width, height) = rgba_image.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetError::Decode(format!(
                "degenerate image {}x{}",
                width, height
            )));
        }

        let mut rgb_image = RgbImage::new(width, height);
        for (x, y, pixel) in rgba_image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            let alpha = a as f32 / 255.0;
            let bg = 255.0;
            let blend = |c: u8| (c as f32 * alpha + bg * (1.0 - alpha)) as u8;
            rgb_image.put_pixel(x, y, ::image::Rgb([blend(r), blend(g), blend(b)]));
        }

        Ok(Self {
            width,
            height,
            rgb: rgb_image.into_raw(),
        })
    }

    pub fn place_in(&self, bounds: Rect) -> Option<Rect> {
        place_in_box(self.width as f32, self.height as f32, bounds)
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use ::image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    let img = RgbaImage::from_pixel(width, height, Rgba([20, 20, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
