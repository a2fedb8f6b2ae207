//! Moving pixels between [`Bitmap`]s and Cairo image surfaces

use cairo::{Context, Extend, Filter, Format, ImageSurface, SurfacePattern};
use line_watchface_types::{Bitmap, BitmapError, Color, Rect};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),
    #[error("invalid bitmap: {0}")]
    Bitmap(#[from] BitmapError),
    #[error("{width}x{height} does not fit a cairo surface")]
    TooLarge { width: u32, height: u32 },
}

fn premultiply(channel: u8, alpha: u8) -> u32 {
    (u32::from(channel) * u32::from(alpha) + 127) / 255
}

fn unpremultiply(channel: u32, alpha: u32) -> u8 {
    if alpha == 0 {
        0
    } else {
        ((channel * 255 + alpha / 2) / alpha).min(255) as u8
    }
}

/// Upload straight RGBA into a premultiplied ARGB32 surface
pub fn bitmap_to_surface(bitmap: &Bitmap) -> Result<ImageSurface, SurfaceError> {
    let too_large = || SurfaceError::TooLarge {
        width: bitmap.width(),
        height: bitmap.height(),
    };
    let width = i32::try_from(bitmap.width()).map_err(|_| too_large())?;
    let height = i32::try_from(bitmap.height()).map_err(|_| too_large())?;
    let stride = Format::ARgb32.stride_for_width(bitmap.width())?;

    let row_bytes = stride as usize;
    let mut data = vec![0u8; row_bytes * height as usize];
    for (y, row) in data.chunks_exact_mut(row_bytes).enumerate() {
        for x in 0..bitmap.width() {
            let [r, g, b, a] = bitmap.pixel(x, y as u32);
            let argb = (u32::from(a) << 24)
                | (premultiply(r, a) << 16)
                | (premultiply(g, a) << 8)
                | premultiply(b, a);
            let offset = x as usize * 4;
            row[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
        }
    }

    Ok(ImageSurface::create_for_data(
        data,
        Format::ARgb32,
        width,
        height,
        stride,
    )?)
}

/// Read an ARGB32 surface back into straight RGBA
pub fn surface_to_bitmap(surface: &mut ImageSurface) -> Result<Bitmap, SurfaceError> {
    surface.flush();
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let stride = surface.stride().max(0) as usize;

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    surface.with_data(|data| {
        for row in data.chunks_exact(stride).take(height as usize) {
            for px in row[..width as usize * 4].chunks_exact(4) {
                let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                let a = argb >> 24;
                pixels.push(unpremultiply((argb >> 16) & 0xFF, a));
                pixels.push(unpremultiply((argb >> 8) & 0xFF, a));
                pixels.push(unpremultiply(argb & 0xFF, a));
                pixels.push(a as u8);
            }
        }
    })?;

    Ok(Bitmap::new(width, height, pixels)?)
}

fn scaled_pattern(surface: &ImageSurface, bitmap: &Bitmap, dest: &Rect) -> SurfacePattern {
    let pattern = SurfacePattern::create(surface);
    pattern.set_filter(Filter::Good);
    pattern.set_extend(Extend::Pad);
    let mut matrix = cairo::Matrix::identity();
    matrix.scale(
        f64::from(bitmap.width()) / dest.width().max(f64::EPSILON),
        f64::from(bitmap.height()) / dest.height().max(f64::EPSILON),
    );
    matrix.translate(-dest.left, -dest.top);
    pattern.set_matrix(matrix);
    pattern
}

/// Draw `bitmap` stretched over `dest`
pub fn draw_bitmap(cr: &Context, bitmap: &Bitmap, dest: &Rect) -> Result<(), SurfaceError> {
    let surface = bitmap_to_surface(bitmap)?;
    cr.save()?;
    cr.set_source(&scaled_pattern(&surface, bitmap, dest))?;
    cr.rectangle(dest.left, dest.top, dest.width(), dest.height());
    cr.fill()?;
    cr.restore()?;
    Ok(())
}

/// Paint `color` through the alpha of `bitmap` stretched over `dest`
pub fn draw_tinted(
    cr: &Context,
    bitmap: &Bitmap,
    dest: &Rect,
    color: Color,
) -> Result<(), SurfaceError> {
    let surface = bitmap_to_surface(bitmap)?;
    cr.save()?;
    cr.rectangle(dest.left, dest.top, dest.width(), dest.height());
    cr.clip();
    color.apply_to_cairo(cr);
    cr.mask(&scaled_pattern(&surface, bitmap, dest))?;
    cr.restore()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_round_trip_premultiplies() {
        let mut bitmap = Bitmap::filled(3, 2, [200, 100, 50, 255]);
        bitmap.set_pixel(1, 1, [255, 0, 0, 128]);
        bitmap.set_pixel(2, 0, [12, 34, 56, 0]);

        let mut surface = bitmap_to_surface(&bitmap).unwrap();
        let back = surface_to_bitmap(&mut surface).unwrap();
        assert_eq!(back.pixel(0, 0), [200, 100, 50, 255]);
        assert_eq!(back.pixel(1, 1), [255, 0, 0, 128]);
        // Color of a fully transparent pixel is not representable
        assert_eq!(back.pixel(2, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_bitmap_stretches() {
        let mut target = ImageSurface::create(Format::ARgb32, 10, 10).unwrap();
        {
            let cr = Context::new(&target).unwrap();
            let bitmap = Bitmap::filled(2, 2, [0, 255, 0, 255]);
            draw_bitmap(&cr, &bitmap, &Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        }
        let out = surface_to_bitmap(&mut target).unwrap();
        assert_eq!(out.pixel(5, 5), [0, 255, 0, 255]);
        assert_eq!(out.pixel(9, 0), [0, 255, 0, 255]);
    }

    #[test]
    fn test_draw_tinted_uses_alpha_only() {
        let mut target = ImageSurface::create(Format::ARgb32, 4, 4).unwrap();
        {
            let cr = Context::new(&target).unwrap();
            let glyph = Bitmap::filled(4, 4, [10, 20, 30, 255]);
            draw_tinted(&cr, &glyph, &Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE).unwrap();
        }
        let out = surface_to_bitmap(&mut target).unwrap();
        assert_eq!(out.pixel(2, 2), [255, 255, 255, 255]);
    }
}
