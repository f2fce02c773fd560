//! Image redaction

use image::{DynamicImage, Rgba, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use sani_core::{BoundingBox, Error, RedactionMethod, Result};
use std::path::Path;

const BLUR_SIGMA: f32 = 10.0;

/// Obscure every box in `image`. Returns how many boxes were applied.
///
/// Boxes are clipped to the image; boxes with nothing left are skipped.
pub fn redact_boxes(
    image: &mut DynamicImage,
    boxes: &[BoundingBox],
    method: RedactionMethod,
) -> usize {
    let (width, height) = (image.width(), image.height());
    let black = Rgba([0u8, 0u8, 0u8, 255u8]);
    let mut applied = 0;

    for bbox in boxes {
        let Some(b) = bbox.clamp(width, height) else {
            tracing::debug!("Skipping box {:?} outside {}x{} image", bbox, width, height);
            continue;
        };

        match method {
            RedactionMethod::Blackbox => {
                let rect = Rect::at(b.x0 as i32, b.y0 as i32).of_size(b.width(), b.height());
                draw_filled_rect_mut(image, rect, black);
            }
            RedactionMethod::Blur => {
                let blurred = image
                    .crop_imm(b.x0, b.y0, b.width(), b.height())
                    .blur(BLUR_SIGMA);
                imageops::replace(image, &blurred, b.x0 as i64, b.y0 as i64);
            }
        }
        applied += 1;
    }

    applied
}

/// Write `image` to `path`; the format follows the extension.
pub fn save_redacted(image: &DynamicImage, path: &Path) -> Result<()> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

    // JPEG has no alpha channel
    let result = if is_jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
    } else {
        image.save(path)
    };

    result.map_err(|e| Error::Image(format!("failed to write {}: {}", path.display(), e)))
}
