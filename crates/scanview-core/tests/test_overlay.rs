mod common;

use approx::assert_relative_eq;
use scanview_core::config::OverlayConfig;
use scanview_core::geometry::{CanvasPoint, CanvasRect, MicronPoint};
use scanview_core::overlay::{
    poly_oval, project, BinStatistics, BinningConfig, BinningScheme, ClassEntry, Color,
    FontScaler, OverlayGroup, OverlayProjector, OverlayScene, OverlayShape, OverlayVisibility,
};

use common::{defect, tile};

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[test]
fn test_project_defect_at_double_zoom() {
    let t = tile(1, 100.0, 100.0, 1000.0, 1000.0);
    let container = CanvasRect::new(0.0, 0.0, 2000.0, 2000.0);
    let p = project(MicronPoint::new(50.0, 50.0), &t, &container);
    assert_relative_eq!(p.x, 1000.0);
    assert_relative_eq!(p.y, 1000.0);
}

#[test]
fn test_project_follows_container_origin() {
    let t = tile(1, 200.0, 100.0, 400.0, 200.0);
    let container = CanvasRect::new(-40.0, 10.0, 360.0, 210.0);
    let p = project(MicronPoint::new(100.0, 25.0), &t, &container);
    assert_relative_eq!(p.x, 160.0);
    assert_relative_eq!(p.y, 60.0);
}

// ---------------------------------------------------------------------------
// Ellipse polygon
// ---------------------------------------------------------------------------

#[test]
fn test_poly_oval_unrotated() {
    let pts = poly_oval(CanvasPoint::new(10.0, 20.0), 4.0, 2.0, 0.0, 50);
    assert_eq!(pts.len(), 50);
    assert_relative_eq!(pts[0].x, 14.0);
    assert_relative_eq!(pts[0].y, 20.0);
    // Every vertex lies on the ellipse.
    for p in &pts {
        let u = (p.x - 10.0) / 4.0;
        let v = (p.y - 20.0) / 2.0;
        assert_relative_eq!(u * u + v * v, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_poly_oval_rotated_ninety_degrees() {
    let pts = poly_oval(CanvasPoint::new(0.0, 0.0), 4.0, 2.0, 90.0, 4);
    // theta = 0: (a, 0) rotated CCW on screen lands on (0, -a).
    assert_relative_eq!(pts[0].x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pts[0].y, -4.0, epsilon = 1e-9);
    // theta = pi/2: (0, b) lands on (b, 0).
    assert_relative_eq!(pts[1].x, 2.0, epsilon = 1e-9);
    assert_relative_eq!(pts[1].y, 0.0, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Font scaling
// ---------------------------------------------------------------------------

#[test]
fn test_font_alternating_ticks_do_not_drift() {
    let mut f = FontScaler::new(20.0);
    for _ in 0..200 {
        f.apply(1.0 / 1.3);
        assert_eq!(f.apply(1.3), 20);
    }
}

#[test]
fn test_font_restores_after_deep_zoom_out() {
    let mut f = FontScaler::new(20.0);
    for _ in 0..15 {
        assert!(f.apply(1.0 / 1.3) >= 1);
    }
    assert_eq!(f.displayed(), 1);
    for _ in 0..15 {
        f.apply(1.3);
    }
    assert_eq!(f.displayed(), 20);
}

#[test]
fn test_font_grows_with_ceil() {
    let mut f = FontScaler::new(20.0);
    assert_eq!(f.apply(1.3), 26);
    assert_eq!(f.apply(1.3), 34);
    assert_relative_eq!(f.accumulator(), 33.8, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

fn binning() -> BinningConfig {
    BinningConfig {
        thresholds: vec![10.0, 100.0],
        colors: vec![Color::rgb(0, 0, 255), Color::rgb(0, 255, 0)],
        infinity_color: Color::RED,
        classes: vec![
            ClassEntry {
                id: 3,
                name: "particle".into(),
                color: Some(Color::rgb(1, 2, 3)),
            },
            ClassEntry {
                id: 4,
                name: "scratch".into(),
                color: None,
            },
        ],
        scheme: BinningScheme::Size,
    }
}

#[test]
fn test_size_bins_are_search_sorted_left() {
    let b = binning();
    assert_eq!(b.size_bin(5.0), Some(0));
    assert_eq!(b.size_bin(10.0), Some(0));
    assert_eq!(b.size_bin(10.5), Some(1));
    assert_eq!(b.size_bin(100.0), Some(1));
    assert_eq!(b.size_bin(100.1), None);
    assert_eq!(b.size_color(100.1), Color::RED);
    assert_eq!(b.size_color(50.0), Color::rgb(0, 255, 0));
}

#[test]
fn test_no_thresholds_means_infinity() {
    let b = BinningConfig {
        thresholds: vec![],
        colors: vec![],
        ..binning()
    };
    assert_eq!(b.size_color(1.0), Color::RED);
}

#[test]
fn test_class_colour_falls_back_to_infinity() {
    let b = binning();
    assert_eq!(b.class_color(Some(3)), Color::rgb(1, 2, 3));
    assert_eq!(b.class_color(Some(4)), Color::RED);
    assert_eq!(b.class_color(Some(99)), Color::RED);
    assert_eq!(b.class_color(None), Color::RED);
}

#[test]
fn test_bin_statistics() {
    let b = binning();
    let mut defects = vec![
        defect(1, 1, 0.0, 0.0, 5.0),
        defect(2, 1, 0.0, 0.0, 50.0),
        defect(3, 1, 0.0, 0.0, 500.0),
        defect(4, 2, 0.0, 0.0, 600.0),
    ];
    defects[0].class_id = Some(3);
    defects[1].class_id = Some(4);
    let stats = BinStatistics::collect(&b, &defects);
    assert_eq!(stats.size_counts, vec![1, 1, 2]);
    assert_eq!(stats.class_counts, vec![1, 0, 3]);
    assert_eq!(stats.infinity_count(), 2);
    assert_eq!(stats.unclassified_count(), 3);
    assert_eq!(stats.total(), 4);
}

#[test]
fn test_default_binning_table() {
    let b = BinningConfig::default();
    assert_eq!(b.thresholds.len(), 5);
    assert_eq!(b.colors.len(), 5);
    assert_eq!(b.colors[0], "aqua".parse::<Color>().unwrap());
    assert_eq!(b.infinity_color, Color::RED);
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[test]
fn test_visibility_follows_scheme_and_toggles() {
    let mut v = OverlayVisibility::new(BinningScheme::Size);
    assert!(v.is_visible(OverlayGroup::SizeBinningMarks));
    assert!(!v.is_visible(OverlayGroup::ClassBinningMarks));
    assert!(v.is_visible(OverlayGroup::Labels));

    v.set_scheme(BinningScheme::Class);
    assert!(!v.is_visible(OverlayGroup::SizeBinningMarks));
    assert!(v.is_visible(OverlayGroup::ClassBinningMarks));

    v.set_marks_hidden(true);
    assert!(!v.is_visible(OverlayGroup::ClassBinningMarks));
    v.set_marks_hidden(false);
    assert!(v.is_visible(OverlayGroup::ClassBinningMarks));

    v.set_labels_hidden(true);
    assert!(!v.is_visible(OverlayGroup::Labels));
    assert!(v.is_visible(OverlayGroup::MeasurementFinal));
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

#[test]
fn test_projector_builds_dual_marks_and_label() {
    let t = tile(1, 100.0, 100.0, 1000.0, 1000.0);
    let container = CanvasRect::new(0.0, 0.0, 1000.0, 1000.0);
    let projector = OverlayProjector::new(
        &OverlayConfig::default(),
        scanview_core::catalog::default_label_fields(),
    );
    let mut scene = OverlayScene::new(BinningScheme::Size);
    let d = defect(1, 1, 50.0, 50.0, 12.5);
    projector.populate(&mut scene, [&d], &t, &container, &binning());

    assert_eq!(scene.items().len(), 3);
    assert_eq!(scene.visible_items().count(), 2);

    let size_mark = scene.items_in(OverlayGroup::SizeBinningMarks).next().unwrap();
    match &size_mark.shape {
        OverlayShape::Polygon { points, outline, .. } => {
            assert_eq!(points.len(), 50);
            assert_eq!(*outline, Color::rgb(0, 255, 0));
            // height (4 µm) spans x, width (2 µm) spans y, at 10 px/µm.
            assert_relative_eq!(points[0].x, 540.0);
            assert_relative_eq!(points[0].y, 500.0);
        }
        other => panic!("expected polygon, got {other:?}"),
    }

    let label = scene.items_in(OverlayGroup::Labels).next().unwrap();
    match &label.shape {
        OverlayShape::Text {
            anchor,
            text,
            font_size,
            ..
        } => {
            assert_eq!(text, "X = 50, Y = 50, Area = 12.5");
            assert_eq!(*font_size, 20);
            assert_relative_eq!(anchor.x, 500.0 - 1000.0 / 60.0);
            assert_relative_eq!(anchor.y, 500.0 - 1000.0 / 60.0);
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_scene_scale_moves_shapes_but_not_fonts() {
    let mut scene = OverlayScene::new(BinningScheme::Size);
    scene.push(
        OverlayGroup::Labels,
        OverlayShape::Text {
            anchor: CanvasPoint::new(10.0, 10.0),
            text: "a".into(),
            font_size: 12,
            color: Color::BLACK,
        },
    );
    scene.scale_about(CanvasPoint::new(0.0, 0.0), 2.0);
    scene.set_font_size(9);
    match &scene.items()[0].shape {
        OverlayShape::Text {
            anchor, font_size, ..
        } => {
            assert_eq!(*anchor, CanvasPoint::new(20.0, 20.0));
            assert_eq!(*font_size, 9);
        }
        other => panic!("expected text, got {other:?}"),
    }
}
