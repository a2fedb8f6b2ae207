//! Pixel transforms on decoded bitmaps
//!
//! These run on straight-alpha RGBA [`Bitmap`]s before they are uploaded to
//! a Cairo surface. Each returns a new bitmap and leaves the input alone,
//! since the input is shared with whoever decoded it.

use line_watchface_types::Bitmap;

/// Luma weights of a zero-saturation color matrix
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

const BLUR_PASSES: usize = 3;

/// Desaturate, keeping alpha
pub fn grayscale(bitmap: &Bitmap) -> Bitmap {
    let mut out = bitmap.clone();
    for px in out.pixels_mut().chunks_exact_mut(4) {
        let luma = LUMA_R * f32::from(px[0]) + LUMA_G * f32::from(px[1]) + LUMA_B * f32::from(px[2]);
        let value = luma.round().clamp(0.0, 255.0) as u8;
        px[0] = value;
        px[1] = value;
        px[2] = value;
    }
    out
}

/// Mask everything outside the inscribed disc, with a one pixel soft edge
pub fn crop_to_disc(bitmap: &Bitmap) -> Bitmap {
    let mut out = bitmap.clone();
    let width = out.width();
    let height = out.height();
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let radius = f64::from(width.min(height)) / 2.0;

    for y in 0..height {
        for x in 0..width {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
            if coverage < 1.0 {
                let mut px = out.pixel(x, y);
                px[3] = (f64::from(px[3]) * coverage).round() as u8;
                out.set_pixel(x, y, px);
            }
        }
    }
    out
}

/// Nearest-neighbour downsample to half size (at least 1x1)
pub fn downsample_half(bitmap: &Bitmap) -> Bitmap {
    let width = ((f64::from(bitmap.width()) * 0.5).round() as u32).max(1);
    let height = ((f64::from(bitmap.height()) * 0.5).round() as u32).max(1);
    let mut out = Bitmap::filled(width, height, [0; 4]);
    for y in 0..height {
        let src_y = (y * 2).min(bitmap.height() - 1);
        for x in 0..width {
            let src_x = (x * 2).min(bitmap.width() - 1);
            out.set_pixel(x, y, bitmap.pixel(src_x, src_y));
        }
    }
    out
}

/// Approximate gaussian blur reaching about `radius` pixels.
///
/// Three box passes per axis on premultiplied values, edges clamped.
pub fn box_blur(bitmap: &Bitmap, radius: u32) -> Bitmap {
    if radius == 0 {
        return bitmap.clone();
    }
    let width = bitmap.width() as usize;
    let height = bitmap.height() as usize;
    let box_radius = radius.div_ceil(BLUR_PASSES as u32) as usize;

    let mut buffer = to_premultiplied(bitmap);
    let mut scratch = vec![0.0f32; buffer.len()];
    for _ in 0..BLUR_PASSES {
        blur_pass(&buffer, &mut scratch, width, height, box_radius, Axis::Horizontal);
        blur_pass(&scratch, &mut buffer, width, height, box_radius, Axis::Vertical);
    }
    from_premultiplied(&buffer, bitmap.width(), bitmap.height())
}

/// Half-size downsample followed by [`box_blur`]
pub fn blur(bitmap: &Bitmap, radius: u32) -> Bitmap {
    box_blur(&downsample_half(bitmap), radius)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn blur_pass(
    src: &[f32],
    dst: &mut [f32],
    width: usize,
    height: usize,
    radius: usize,
    axis: Axis,
) {
    let (lines, len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let index = |line: usize, pos: usize| match axis {
        Axis::Horizontal => (line * width + pos) * 4,
        Axis::Vertical => (pos * width + line) * 4,
    };
    let span = (2 * radius + 1) as f32;
    let last = len - 1;

    for line in 0..lines {
        for channel in 0..4 {
            let sample = |pos: isize| src[index(line, pos.clamp(0, last as isize) as usize) + channel];

            let mut sum: f32 = (-(radius as isize)..=radius as isize).map(sample).sum();
            for pos in 0..len {
                dst[index(line, pos) + channel] = sum / span;
                let leaving = pos as isize - radius as isize;
                let entering = pos as isize + radius as isize + 1;
                sum += sample(entering) - sample(leaving);
            }
        }
    }
}

fn to_premultiplied(bitmap: &Bitmap) -> Vec<f32> {
    let mut out = Vec::with_capacity(bitmap.pixels().len());
    for px in bitmap.pixels().chunks_exact(4) {
        let alpha = f32::from(px[3]) / 255.0;
        out.push(f32::from(px[0]) * alpha);
        out.push(f32::from(px[1]) * alpha);
        out.push(f32::from(px[2]) * alpha);
        out.push(f32::from(px[3]));
    }
    out
}

fn from_premultiplied(buffer: &[f32], width: u32, height: u32) -> Bitmap {
    let mut out = Bitmap::filled(width, height, [0; 4]);
    for (dst, src) in out.pixels_mut().chunks_exact_mut(4).zip(buffer.chunks_exact(4)) {
        let alpha = src[3];
        if alpha <= 0.0 {
            dst.copy_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let unpremultiply = 255.0 / alpha;
        for channel in 0..3 {
            dst[channel] = (src[channel] * unpremultiply).round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = alpha.round().clamp(0.0, 255.0) as u8;
    }
    out
}
