use crate::address::{AddressMode, map_index};
use crate::color::Rgba;
use crate::image::ImageView;

/// A 2x2 texel block in reading order: `[p00, p10, p01, p11]`.
pub type Quad = [Rgba; 4];

/// Reads one texel at an integer coordinate, resolving out-of-range reads
/// with `mode`.
///
/// An empty image has no texel to clamp or wrap to; reads from it return the
/// border color for [`AddressMode::Border`] and [`Rgba::TRANSPARENT`]
/// otherwise.
#[inline]
pub fn fetch(img: &ImageView<'_, Rgba>, x: isize, y: isize, mode: &AddressMode) -> Rgba {
    let fallback = match mode {
        AddressMode::Border(c) => *c,
        _ => Rgba::TRANSPARENT,
    };

    match (
        map_index(x, img.width(), mode),
        map_index(y, img.height(), mode),
    ) {
        // SAFETY: `map_index` only returns indices in `[0, len)`.
        (Some(xi), Some(yi)) => unsafe { *img.get_unchecked(xi, yi) },
        _ => fallback,
    }
}

/// Reads the 2x2 block whose top-left texel is `(x, y)`.
///
/// Fully interior blocks skip address resolution.
#[inline]
pub fn fetch_quad(img: &ImageView<'_, Rgba>, x: isize, y: isize, mode: &AddressMode) -> Quad {
    let interior = x >= 0
        && y >= 0
        && (x as usize) + 1 < img.width()
        && (y as usize) + 1 < img.height();

    if interior {
        let (xu, yu) = (x as usize, y as usize);
        // SAFETY: `xu + 1 < width` and `yu + 1 < height` are checked above.
        unsafe {
            [
                *img.get_unchecked(xu, yu),
                *img.get_unchecked(xu + 1, yu),
                *img.get_unchecked(xu, yu + 1),
                *img.get_unchecked(xu + 1, yu + 1),
            ]
        }
    } else {
        [
            fetch(img, x, y, mode),
            fetch(img, x + 1, y, mode),
            fetch(img, x, y + 1, mode),
            fetch(img, x + 1, y + 1, mode),
        ]
    }
}

/// Blends a quad with two row lerps by `fx` followed by one column lerp by
/// `fy`.
#[inline]
pub fn blend_quad(quad: &Quad, fx: f32, fy: f32) -> Rgba {
    let [p00, p10, p01, p11] = *quad;
    let top = p00.lerp(p10, fx);
    let bottom = p01.lerp(p11, fx);
    top.lerp(bottom, fy)
}

/// Floor-based bilinear sample at texel-center coordinates, where integer
/// `(x, y)` is the center of texel `(x, y)`.
pub fn sample_bilinear(img: &ImageView<'_, Rgba>, x: f32, y: f32, mode: &AddressMode) -> Rgba {
    let x0 = x.floor();
    let y0 = y.floor();
    let quad = fetch_quad(img, x0 as isize, y0 as isize, mode);
    blend_quad(&quad, x - x0, y - y0)
}

#[cfg(test)]
mod tests {
    use crate::address::AddressMode;
    use crate::color::Rgba;
    use crate::image::Image;
    use crate::sample::{blend_quad, fetch, fetch_quad, sample_bilinear};

    fn gray(v: f32) -> Rgba {
        Rgba::new(v, v, v, 1.0)
    }

    fn ramp_3x2() -> Image<Rgba> {
        Image::from_fn(3, 2, |x, y| gray((10 * y + x) as f32))
    }

    #[test]
    fn fetch_out_of_range_per_mode() {
        let img = ramp_3x2();
        let view = img.as_view();
        let border = Rgba::new(9.0, 8.0, 7.0, 0.0);

        assert_eq!(fetch(&view, 3, 1, &AddressMode::Clamp), gray(12.0));
        assert_eq!(fetch(&view, -1, 0, &AddressMode::Clamp), gray(0.0));
        assert_eq!(fetch(&view, 3, 1, &AddressMode::Wrap), gray(10.0));
        assert_eq!(fetch(&view, 0, 2, &AddressMode::Wrap), gray(0.0));
        assert_eq!(fetch(&view, 3, 1, &AddressMode::Border(border)), border);
        assert_eq!(fetch(&view, 2, 1, &AddressMode::Border(border)), gray(12.0));
    }

    #[test]
    fn fetch_from_empty_image_returns_fallback() {
        let img: Image<Rgba> = Image::from_vec(0, 0, Vec::new()).expect("empty image");
        let view = img.as_view();
        let border = Rgba::splat(0.5);

        assert_eq!(fetch(&view, 0, 0, &AddressMode::Clamp), Rgba::TRANSPARENT);
        assert_eq!(fetch(&view, 0, 0, &AddressMode::Border(border)), border);
    }

    #[test]
    fn quad_interior_and_edge() {
        let img = ramp_3x2();
        let view = img.as_view();

        let q = fetch_quad(&view, 0, 0, &AddressMode::Clamp);
        assert_eq!(q, [gray(0.0), gray(1.0), gray(10.0), gray(11.0)]);

        let q = fetch_quad(&view, 2, 1, &AddressMode::Clamp);
        assert_eq!(q, [gray(12.0); 4]);
    }

    #[test]
    fn bilinear_center_and_fraction() {
        let img = ramp_3x2();
        let view = img.as_view();

        let c = sample_bilinear(&view, 0.5, 0.5, &AddressMode::Clamp);
        assert_eq!(c, gray(5.5));

        let c = sample_bilinear(&view, 1.25, 0.0, &AddressMode::Clamp);
        assert!(c.max_abs_diff(gray(1.25)) < 1e-6);
    }

    #[test]
    fn blend_quad_lerps_rows_then_columns() {
        let quad = [gray(0.0), gray(4.0), gray(8.0), gray(16.0)];

        assert_eq!(blend_quad(&quad, 0.0, 0.0), gray(0.0));
        assert_eq!(blend_quad(&quad, 1.0, 1.0), gray(16.0));
        // top = 1.0, bottom = 10.0
        assert_eq!(blend_quad(&quad, 0.25, 0.5), gray(5.5));
    }
}
