mod common;

use approx::assert_relative_eq;
use scanview_core::config::SourceConfig;
use scanview_core::io::raster::RasterSource;
use scanview_core::pyramid::{ImagePyramid, LevelSelection};

use common::{small_huge_config, write_png, write_ppm};

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[test]
fn test_normal_pyramid_levels_shrink_to_cutoff() {
    let (_dir, path) = write_png(400, 300);
    let config = SourceConfig {
        pyramid_cutoff: 64,
        ..SourceConfig::default()
    };
    let mut source = RasterSource::open(&path, &config).unwrap();
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| {}).unwrap();

    assert!(!pyramid.is_huge_proxy());
    assert_relative_eq!(pyramid.ratio(), 1.0);
    assert_eq!(pyramid.level(0).dimensions(), (400, 300));
    assert_eq!(pyramid.level(1).dimensions(), (307, 230));

    let levels = pyramid.levels();
    for pair in levels.windows(2) {
        assert!(pair[1].width() < pair[0].width());
        assert!(pair[1].height() < pair[0].height());
    }
    let last = levels.last().unwrap();
    assert!(last.width().min(last.height()) <= 64);
}

#[test]
fn test_small_image_has_single_level() {
    let (_dir, path) = write_png(100, 50);
    let config = SourceConfig::default();
    let mut source = RasterSource::open(&path, &config).unwrap();
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| {}).unwrap();
    assert_eq!(pyramid.len(), 1);
    assert_eq!(pyramid.select_level(0.1), LevelSelection::Level(0));
}

#[test]
fn test_huge_pyramid_starts_from_proxy() {
    let (_dir, path) = write_ppm(400, 300);
    let config = small_huge_config();
    let mut source = RasterSource::open(&path, &config).unwrap();
    let mut bands = 0;
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| bands += 1).unwrap();

    assert!(pyramid.is_huge_proxy());
    assert_eq!(pyramid.level(0).dimensions(), (64, 48));
    assert_relative_eq!(pyramid.ratio(), 400.0 / 64.0);
    assert_eq!(bands, 19);
}

#[test]
fn test_level_index_is_clamped() {
    let (_dir, path) = write_png(400, 300);
    let config = SourceConfig {
        pyramid_cutoff: 64,
        ..SourceConfig::default()
    };
    let mut source = RasterSource::open(&path, &config).unwrap();
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| {}).unwrap();
    let coarsest = pyramid.len() - 1;
    assert_eq!(pyramid.level(999).dimensions(), pyramid.level(coarsest).dimensions());
    assert_eq!(pyramid.select_level(1e-6), LevelSelection::Level(coarsest));
}

// ---------------------------------------------------------------------------
// Level selection
// ---------------------------------------------------------------------------

#[test]
fn test_selection_follows_zoom_ticks() {
    let (_dir, path) = write_png(2000, 1000);
    let config = SourceConfig::default();
    let mut source = RasterSource::open(&path, &config).unwrap();
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| {}).unwrap();
    assert!(pyramid.len() >= 3);

    assert_eq!(pyramid.select_level(1.0), LevelSelection::Level(0));
    assert_eq!(pyramid.select_level(1.3), LevelSelection::Level(0));
    assert_eq!(pyramid.select_level(1.0 / 1.3), LevelSelection::Level(1));
    assert_eq!(pyramid.select_level(1.3f64.powi(-2)), LevelSelection::Level(2));
}

#[test]
fn test_huge_source_bypasses_when_zoomed_past_proxy() {
    let (_dir, path) = write_ppm(400, 300);
    let config = small_huge_config();
    let mut source = RasterSource::open(&path, &config).unwrap();
    let pyramid = ImagePyramid::build(&mut source, &config, |_, _| {}).unwrap();

    // At native zoom the proxy is 6.25x too small.
    assert_eq!(pyramid.select_level(1.0), LevelSelection::HugeBypass);
    // Seven ticks out brings imscale * ratio just under 1.
    assert_eq!(pyramid.select_level(1.3f64.powi(-7)), LevelSelection::Level(0));
    assert_eq!(pyramid.select_level(1.3f64.powi(-6)), LevelSelection::HugeBypass);
}
