use approx::assert_relative_eq;
use scanview_core::config::ViewportConfig;
use scanview_core::geometry::{CanvasPoint, CanvasRect, PixelRect};
use scanview_core::input::WheelDirection;
use scanview_core::viewport::{plan_crop, scroll_region, ContainerRect, ViewportState};

fn state(width: u32, height: u32) -> ViewportState {
    ViewportState::new(&ViewportConfig {
        canvas_width: width,
        canvas_height: height,
        ..ViewportConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Scroll region
// ---------------------------------------------------------------------------

#[test]
fn test_scroll_region_collapses_when_view_covers_image() {
    let image = CanvasRect::new(100.0, 100.0, 300.0, 300.0);
    let view = CanvasRect::new(0.0, 0.0, 800.0, 600.0);
    assert_eq!(scroll_region(image, view), image);
}

#[test]
fn test_scroll_region_collapses_per_axis() {
    let image = CanvasRect::new(100.0, 100.0, 300.0, 300.0);
    let view = CanvasRect::new(150.0, 0.0, 350.0, 600.0);
    let region = scroll_region(image, view);
    assert_eq!(region, CanvasRect::new(100.0, 100.0, 350.0, 300.0));
}

#[test]
fn test_scroll_region_is_union_when_image_larger() {
    let image = CanvasRect::new(-500.0, -400.0, 1500.0, 1200.0);
    let view = CanvasRect::new(0.0, 0.0, 800.0, 600.0);
    assert_eq!(scroll_region(image, view), image);
}

#[test]
fn test_view_confined_to_scroll_region() {
    let mut s = state(200, 100);
    s.scroll_by(-50.0, 20.0);
    s.set_scroll_region(CanvasRect::new(0.0, 0.0, 1000.0, 1000.0));
    assert_eq!(s.view(), CanvasRect::new(0.0, 20.0, 200.0, 120.0));

    s.scroll_by(900.0, 0.0);
    s.set_scroll_region(CanvasRect::new(0.0, 0.0, 1000.0, 1000.0));
    assert_eq!(s.view().x0, 800.0);
}

// ---------------------------------------------------------------------------
// Crop planning
// ---------------------------------------------------------------------------

#[test]
fn test_crop_at_native_scale() {
    let image = CanvasRect::new(0.0, 0.0, 400.0, 300.0);
    let view = CanvasRect::new(50.0, 20.0, 250.0, 170.0);
    let plan = plan_crop(image, view, (400, 300)).unwrap();
    assert_eq!(plan.source, PixelRect::new(50, 20, 200, 150));
    assert_eq!((plan.dest_width, plan.dest_height), (200, 150));
    assert_eq!(plan.position, CanvasPoint::new(50.0, 20.0));
}

#[test]
fn test_crop_from_reduced_level() {
    // Image drawn at 2x, cropped from a half-size level.
    let image = CanvasRect::new(0.0, 0.0, 800.0, 600.0);
    let view = CanvasRect::new(100.0, 100.0, 300.0, 200.0);
    let plan = plan_crop(image, view, (200, 150)).unwrap();
    assert_eq!(plan.source, PixelRect::new(25, 25, 50, 25));
    assert_eq!((plan.dest_width, plan.dest_height), (200, 100));
}

#[test]
fn test_crop_positions_at_image_corner_when_view_starts_outside() {
    let image = CanvasRect::new(30.0, 40.0, 130.0, 140.0);
    let view = CanvasRect::new(0.0, 0.0, 80.0, 80.0);
    let plan = plan_crop(image, view, (100, 100)).unwrap();
    assert_eq!(plan.position, CanvasPoint::new(30.0, 40.0));
    assert_eq!(plan.source, PixelRect::new(0, 0, 50, 40));
    assert_eq!((plan.dest_width, plan.dest_height), (50, 40));
}

#[test]
fn test_crop_is_none_without_overlap() {
    let image = CanvasRect::new(0.0, 0.0, 100.0, 100.0);
    let view = CanvasRect::new(200.0, 0.0, 400.0, 100.0);
    assert!(plan_crop(image, view, (100, 100)).is_none());
}

#[test]
fn test_crop_is_at_least_one_pixel() {
    // Zoomed in so far that the view covers a fraction of one level pixel.
    let image = CanvasRect::new(0.0, 0.0, 10_000.0, 10_000.0);
    let view = CanvasRect::new(5010.0, 5010.0, 5040.0, 5040.0);
    let plan = plan_crop(image, view, (100, 100)).unwrap();
    assert_eq!(plan.source.width, 1);
    assert_eq!(plan.source.height, 1);
    assert_eq!((plan.dest_width, plan.dest_height), (30, 30));
}

#[test]
fn test_crop_absorbs_accumulated_error() {
    let image = CanvasRect::new(1e-12, -1e-12, 400.0 - 1e-10, 300.0 + 1e-10);
    let view = CanvasRect::new(0.0, 0.0, 400.0, 300.0);
    let plan = plan_crop(image, view, (400, 300)).unwrap();
    assert_eq!(plan.source, PixelRect::new(0, 0, 400, 300));
    assert_eq!((plan.dest_width, plan.dest_height), (400, 300));
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

#[test]
fn test_zoom_out_stops_at_minimum_rendered_side() {
    let mut s = state(800, 600);
    let mut applied = 0;
    for _ in 0..20 {
        if s.try_zoom(WheelDirection::Down, 100).is_some() {
            applied += 1;
        }
    }
    assert_eq!(applied, 4);
    assert_eq!(s.zoom_ticks(), -4);
    assert!((100.0 * s.imscale()).round() >= 30.0);
}

#[test]
fn test_zoom_in_stops_when_pixel_exceeds_half_window() {
    let mut s = state(100, 80);
    while s.try_zoom(WheelDirection::Up, 1000).is_some() {}
    // Limit is 40: 1.3^14 = 39.37, 1.3^15 = 51.19.
    assert_eq!(s.zoom_ticks(), 14);
    assert!(s.imscale() <= 40.0);
}

#[test]
fn test_imscale_round_trip_is_exact() {
    let mut s = state(800, 600);
    for _ in 0..5 {
        s.try_zoom(WheelDirection::Up, 1000).unwrap();
    }
    for _ in 0..5 {
        s.try_zoom(WheelDirection::Down, 1000).unwrap();
    }
    assert_eq!(s.imscale(), 1.0);
}

#[test]
fn test_zoom_factor_per_tick() {
    let mut s = state(800, 600);
    assert_relative_eq!(s.try_zoom(WheelDirection::Up, 1000).unwrap(), 1.3);
    assert_relative_eq!(s.try_zoom(WheelDirection::Down, 1000).unwrap(), 1.0 / 1.3);
}

#[test]
fn test_container_scales_about_point() {
    let mut c = ContainerRect::new(400, 300);
    let p = CanvasPoint::new(100.0, 100.0);
    c.scale_about(p, 2.0);
    assert_eq!(c.rect(), CanvasRect::new(-100.0, -100.0, 700.0, 500.0));
    c.scale_about(p, 0.5);
    assert_eq!(c.rect(), CanvasRect::new(0.0, 0.0, 400.0, 300.0));
    assert!(c.contains_strict(CanvasPoint::new(1.0, 1.0)));
    assert!(!c.contains_strict(CanvasPoint::new(0.0, 10.0)));
}

// ---------------------------------------------------------------------------
// Panning
// ---------------------------------------------------------------------------

#[test]
fn test_scan_drag_moves_view_against_pointer() {
    let mut s = state(200, 100);
    s.set_scroll_region(CanvasRect::new(0.0, 0.0, 1000.0, 1000.0));
    s.scan_mark(50.0, 50.0);
    assert!(s.scan_dragto(30.0, 40.0));
    assert_eq!(s.view().origin(), CanvasPoint::new(20.0, 10.0));
    assert_eq!(s.to_canvas(0.0, 0.0), CanvasPoint::new(20.0, 10.0));
}

#[test]
fn test_drag_without_mark_is_ignored() {
    let mut s = state(200, 100);
    assert!(!s.scan_dragto(30.0, 40.0));
    assert_eq!(s.view().origin(), CanvasPoint::new(0.0, 0.0));
}

#[test]
fn test_scan_drag_is_confined_to_scroll_region() {
    let mut s = state(200, 100);
    s.set_scroll_region(CanvasRect::new(0.0, 0.0, 400.0, 300.0));
    s.scan_mark(100.0, 50.0);
    s.scan_dragto(-500.0, 50.0);
    assert_eq!(s.view().origin(), CanvasPoint::new(200.0, 0.0));
}

#[test]
fn test_key_scroll_moves_one_tenth_of_window() {
    let mut s = state(200, 100);
    s.set_scroll_region(CanvasRect::new(-100.0, -100.0, 1000.0, 1000.0));
    s.scroll_units(1, 0);
    s.scroll_units(0, -1);
    assert_relative_eq!(s.view().x0, 20.0);
    assert_relative_eq!(s.view().y0, -10.0);
}
