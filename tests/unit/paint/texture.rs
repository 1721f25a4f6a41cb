use image::Rgba;

use super::*;
use crate::assets::synth::checkerboard;
use crate::foundation::error::TilePaintError;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn board() -> Arc<RgbaImage> {
    checkerboard(2, 2, 1, WHITE, BLACK).unwrap()
}

fn ctx(
    paint: &TexturePaint,
    xform: Affine,
    hints: Option<&RenderingHints>,
) -> Box<dyn PaintContext> {
    paint
        .create_context(
            ColorModel::Rgba8Premul,
            DeviceRect::new(0, 0, 8, 8),
            Rect::new(0.0, 0.0, 8.0, 8.0),
            xform,
            hints,
        )
        .unwrap()
}

#[test]
fn new_rejects_degenerate_anchor() {
    for anchor in [
        Rect::new(0.0, 0.0, 0.0, 2.0),
        Rect::new(0.0, 0.0, 2.0, 0.0),
        Rect::new(0.0, 0.0, f64::NAN, 2.0),
        Rect::new(0.0, 0.0, f64::INFINITY, 2.0),
    ] {
        let err = TexturePaint::new(board(), anchor).unwrap_err();
        assert!(
            matches!(err, TilePaintError::InvalidArgument(_)),
            "{anchor:?}"
        );
    }
}

#[test]
fn new_rejects_empty_image() {
    let err = TexturePaint::new(Arc::new(RgbaImage::new(0, 3)), Rect::new(0.0, 0.0, 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, TilePaintError::InvalidArgument(_)));
}

#[test]
fn accessors_forward_construction_inputs() {
    let img = board();
    let anchor = Rect::new(5.0, 5.0, 105.0, 105.0);
    let paint = TexturePaint::new(Arc::clone(&img), anchor).unwrap();
    assert_eq!(paint.anchor_rect(), anchor);
    assert!(Arc::ptr_eq(paint.image(), &img));
    assert_eq!(paint.transparency(), Transparency::Opaque);
}

#[test]
fn nearest_tiles_in_both_directions() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let c = ctx(&paint, Affine::IDENTITY, None);
    assert_eq!(c.sample(0, 0), WHITE);
    assert_eq!(c.sample(1, 0), BLACK);
    assert_eq!(c.sample(-1, 0), BLACK);
    assert_eq!(c.sample(-2, -2), WHITE);
    assert_eq!(c.sample(101, 56), BLACK);
}

#[test]
fn anchor_origin_shifts_tile_phase() {
    let paint = TexturePaint::new(board(), Rect::new(5.0, 5.0, 7.0, 7.0)).unwrap();
    let c = ctx(&paint, Affine::IDENTITY, None);
    assert_eq!(c.sample(5, 5), WHITE);
    assert_eq!(c.sample(4, 5), BLACK);
    assert_eq!(c.sample(6, 6), WHITE);
}

#[test]
fn anchor_size_stretches_image() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    let c = ctx(&paint, Affine::IDENTITY, None);
    assert_eq!(c.sample(0, 0), WHITE);
    assert_eq!(c.sample(1, 1), WHITE);
    assert_eq!(c.sample(2, 0), BLACK);
    assert_eq!(c.sample(3, 3), WHITE);
    assert_eq!(c.sample(4, 0), WHITE);
}

#[test]
fn non_invertible_transform_fails_context_derivation() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let err = paint
        .create_context(
            ColorModel::Rgba8Premul,
            DeviceRect::new(0, 0, 1, 1),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Affine::scale(0.0),
            None,
        )
        .err()
        .unwrap();
    assert!(matches!(err, TilePaintError::NonInvertible(_)));
}

#[test]
fn samples_follow_requested_color_model() {
    let img = Arc::new(RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128])));
    let paint = TexturePaint::new(img, Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert_eq!(paint.transparency(), Transparency::Translucent);

    let bounds = DeviceRect::new(0, 0, 1, 1);
    let user = Rect::new(0.0, 0.0, 1.0, 1.0);
    let straight = paint
        .create_context(ColorModel::Rgba8, bounds, user, Affine::IDENTITY, None)
        .unwrap();
    assert_eq!(straight.sample(0, 0), [200, 100, 50, 128]);
    assert_eq!(straight.color_model(), ColorModel::Rgba8);

    let premul = paint
        .create_context(ColorModel::Rgba8Premul, bounds, user, Affine::IDENTITY, None)
        .unwrap();
    assert_eq!(premul.sample(0, 0), [100, 50, 25, 128]);
}

#[test]
fn bilinear_blends_with_periodic_neighbours() {
    let img = Arc::new(RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 { Rgba(BLACK) } else { Rgba(WHITE) }
    }));
    let paint = TexturePaint::new(img, Rect::new(0.0, 0.0, 2.0, 1.0)).unwrap();
    let hints = RenderingHints::new().with(Interpolation::Bilinear);
    let c = ctx(&paint, Affine::scale(2.0), Some(&hints));

    assert_eq!(c.sample(0, 0), [64, 64, 64, 255]);
    assert_eq!(c.sample(1, 0), [64, 64, 64, 255]);
    assert_eq!(c.sample(2, 0), [191, 191, 191, 255]);
    assert_eq!(c.sample(3, 0), [191, 191, 191, 255]);
    assert_eq!(c.sample(4, 0), c.sample(0, 0));
}

#[test]
fn rendering_quality_hint_selects_bilinear() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let hints = RenderingHints::new().with(crate::paint::hints::Rendering::Quality);
    let c = paint
        .make_context(
            ColorModel::Rgba8Premul,
            DeviceRect::new(0, 0, 2, 2),
            Affine::IDENTITY,
            hints.resolve_interpolation(),
        )
        .unwrap();
    assert_eq!(c.interpolation(), Interpolation::Bilinear);
    assert_eq!(c.inverse_transform(), Affine::IDENTITY);
}

#[test]
fn texel_position_is_reduced_into_one_tile() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let c = paint
        .make_context(
            ColorModel::Rgba8Premul,
            DeviceRect::new(0, 0, 2, 2),
            Affine::IDENTITY,
            Interpolation::NearestNeighbor,
        )
        .unwrap();
    assert_eq!(c.texel_position(0, 0), (0.5, 0.5));
    assert_eq!(c.texel_position(-3, 7), (1.5, 1.5));
}

#[test]
fn raster_matches_per_pixel_samples() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let c = ctx(&paint, Affine::translate((0.5, 0.0)), None);
    let region = DeviceRect::new(-1, -1, 3, 2);
    let raster = c.raster(region);
    assert_eq!(raster.data.len(), 3 * 2 * 4);
    assert_eq!(raster.color_model, ColorModel::Rgba8Premul);
    for y in -1..1 {
        for x in -1..2 {
            assert_eq!(raster.pixel(x, y), Some(c.sample(x, y)));
        }
    }
    assert_eq!(raster.pixel(2, 0), None);
}

#[test]
fn context_is_shareable_across_threads() {
    let paint = TexturePaint::new(board(), Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    let c = ctx(&paint, Affine::rotate(0.3), None);
    let region = DeviceRect::new(0, 0, 8, 8);
    let expected = c.raster(region);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| c.raster(region))).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
