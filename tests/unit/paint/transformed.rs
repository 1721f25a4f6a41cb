use super::*;
use crate::assets::synth::{checkerboard, noise_image};
use crate::foundation::core::Vec2;
use crate::foundation::error::TilePaintError;
use crate::paint::Raster;
use crate::paint::hints::{ColorRendering, Interpolation};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn raster_of(
    paint: &dyn Paint,
    device: Affine,
    bounds: DeviceRect,
    hints: Option<&RenderingHints>,
) -> Raster {
    paint
        .create_context(
            ColorModel::Rgba8Premul,
            bounds,
            bounds.to_rect(),
            device,
            hints,
        )
        .unwrap()
        .raster(bounds)
}

fn noise_paint(transform: Option<Affine>) -> TransformedTexturePaint {
    TransformedTexturePaint::new(
        noise_image(7, 5, 11).unwrap(),
        Rect::new(1.0, -2.0, 8.0, 3.0),
        transform,
    )
    .unwrap()
}

#[test]
fn checkerboard_scaled_by_two() {
    let board = checkerboard(2, 2, 1, WHITE, BLACK).unwrap();
    let paint = TransformedTexturePaint::new(
        board,
        Rect::new(0.0, 0.0, 2.0, 2.0),
        Some(Affine::scale(2.0)),
    )
    .unwrap();
    let bounds = DeviceRect::new(0, 0, 4, 4);
    let ctx = paint
        .create_context(
            ColorModel::Rgba8Premul,
            bounds,
            bounds.to_rect(),
            Affine::IDENTITY,
            None,
        )
        .unwrap();
    assert_eq!(ctx.sample(0, 0), WHITE);
    assert_eq!(ctx.sample(2, 0), BLACK);
    assert_eq!(ctx.sample(4, 0), WHITE);
    assert_eq!(ctx.sample(1, 1), WHITE);
    assert_eq!(ctx.sample(2, 2), WHITE);
    assert_eq!(ctx.bounds(), bounds);
}

#[test]
fn absent_transform_means_identity() {
    let paint = noise_paint(None);
    assert_eq!(paint.transform(), Affine::IDENTITY);
    assert_eq!(
        paint.effective_transform(Affine::scale(3.0)),
        Affine::scale(3.0)
    );
}

#[test]
fn identity_wrapper_samples_like_base_paint() {
    let paint = noise_paint(None);
    let bounds = DeviceRect::new(-6, -4, 20, 12);
    for device in [
        Affine::IDENTITY,
        Affine::scale(1.5),
        Affine::rotate(0.7) * Affine::translate((3.0, -1.0)),
        Affine::new([1.0, 0.1, 0.1, 1.0, 0.0, 0.0]),
    ] {
        assert_eq!(
            raster_of(&paint, device, bounds, None),
            raster_of(paint.texture(), device, bounds, None),
            "{device:?}"
        );
    }
}

#[test]
fn composition_is_associative() {
    let t1 = Affine::translate((3.0, 1.0)) * Affine::scale(0.5);
    let t2 = Affine::scale_non_uniform(2.0, 4.0) * Affine::translate((-1.0, 0.25));
    let d = Affine::scale(0.5) * Affine::translate((8.0, -2.0));
    let bounds = DeviceRect::new(-5, -5, 16, 16);

    let fused = noise_paint(Some(t1 * t2));
    let split = noise_paint(Some(t2));
    assert_eq!(
        raster_of(&fused, d, bounds, None),
        raster_of(&split, d * t1, bounds, None)
    );
}

#[test]
fn effective_transform_applies_pattern_transform_first() {
    let paint = noise_paint(Some(Affine::scale(2.0)));
    let device = Affine::translate(Vec2::new(10.0, 0.0));
    let p = paint.effective_transform(device) * crate::foundation::core::Point::new(1.0, 1.0);
    assert_eq!(p, crate::foundation::core::Point::new(12.0, 2.0));
}

#[test]
fn transform_is_copied_at_construction() {
    let mut t = Affine::scale(2.0);
    let paint = noise_paint(Some(t));
    let bounds = DeviceRect::new(0, 0, 12, 12);
    let before = raster_of(&paint, Affine::IDENTITY, bounds, None);

    t = t * Affine::rotate(1.0);
    assert_ne!(t, paint.transform());

    let after = raster_of(&paint, Affine::IDENTITY, bounds, None);
    assert_eq!(before, after);
    assert_eq!(paint.transform(), Affine::scale(2.0));
}

#[test]
fn tiling_is_periodic_in_pattern_space() {
    let anchor = Rect::new(0.0, 0.0, 4.0, 2.0);
    let paint = TransformedTexturePaint::new(noise_image(4, 2, 3).unwrap(), anchor, None).unwrap();
    let bounds = DeviceRect::new(0, 0, 4, 2);
    let base = raster_of(&paint, Affine::IDENTITY, bounds, None);
    for k in [-3.0, -1.0, 1.0, 5.0] {
        for shift in [Vec2::new(k * 4.0, 0.0), Vec2::new(0.0, k * 2.0)] {
            let shifted = raster_of(&paint, Affine::translate(shift), bounds, None);
            let ctx = paint
                .create_context(
                    ColorModel::Rgba8Premul,
                    bounds,
                    bounds.to_rect(),
                    Affine::translate(shift),
                    None,
                )
                .unwrap();
            assert_eq!(shifted.data, base.data, "{shift:?}");
            assert_eq!(
                ctx.sample(shift.x as i32, shift.y as i32),
                base.pixel(0, 0).unwrap()
            );
        }
    }
}

#[test]
fn absent_hints_match_default_color_rendering() {
    let paint = noise_paint(Some(Affine::rotate(0.4)));
    let bounds = DeviceRect::new(0, 0, 10, 10);
    let explicit = RenderingHints::new().with(ColorRendering::Default);
    assert_eq!(
        raster_of(&paint, Affine::scale(1.25), bounds, None),
        raster_of(&paint, Affine::scale(1.25), bounds, Some(&explicit))
    );
}

#[test]
fn provided_hints_reach_the_sampler() {
    let paint = noise_paint(Some(Affine::scale(3.0)));
    let bounds = DeviceRect::new(0, 0, 10, 10);
    let bilinear = RenderingHints::new().with(Interpolation::Bilinear);
    assert_ne!(
        raster_of(&paint, Affine::IDENTITY, bounds, None),
        raster_of(&paint, Affine::IDENTITY, bounds, Some(&bilinear))
    );
}

#[test]
fn repeated_derivations_are_reproducible() {
    let paint = noise_paint(Some(Affine::new([1.0, 0.1, 0.1, 1.0, 0.0, 0.0])));
    let bounds = DeviceRect::new(-3, -3, 9, 9);
    let a = raster_of(&paint, Affine::rotate(-0.2), bounds, None);
    let b = raster_of(&paint, Affine::rotate(-0.2), bounds, None);
    assert_eq!(a, b);
}

#[test]
fn accessors_forward_to_texture() {
    let img = noise_image(3, 3, 1).unwrap();
    let anchor = Rect::new(5.0, 5.0, 105.0, 105.0);
    let paint = TransformedTexturePaint::new(Arc::clone(&img), anchor, None).unwrap();
    assert_eq!(paint.anchor_rect(), anchor);
    assert!(Arc::ptr_eq(paint.image(), &img));
    assert_eq!(paint.transparency(), paint.texture().transparency());
    assert_eq!(paint.transparency(), Transparency::of_image(&img));
}

#[test]
fn degenerate_anchor_error_propagates() {
    let err = TransformedTexturePaint::new(
        noise_image(2, 2, 0).unwrap(),
        Rect::new(0.0, 0.0, -1.0, 2.0),
        Some(Affine::scale(2.0)),
    )
    .unwrap_err();
    assert!(matches!(err, TilePaintError::InvalidArgument(_)));
}

#[test]
fn singular_pattern_transform_fails_at_context_derivation() {
    let paint = noise_paint(Some(Affine::scale_non_uniform(0.0, 1.0)));
    let err = paint
        .create_context(
            ColorModel::Rgba8Premul,
            DeviceRect::new(0, 0, 1, 1),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Affine::IDENTITY,
            None,
        )
        .err()
        .unwrap();
    assert!(matches!(err, TilePaintError::NonInvertible(_)));
}
