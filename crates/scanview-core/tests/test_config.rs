use scanview_core::catalog::{LabelField, ScanCatalog};
use scanview_core::config::{ResampleFilter, ViewerConfig};
use scanview_core::consts::{DEFAULT_HUGE_SIZE, DEFAULT_ZOOM_STEP};
use scanview_core::input::{Key, PointerButton, ViewerEvent, WheelDirection};
use scanview_core::overlay::{BinningScheme, Color};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// ResampleFilter Display
// ---------------------------------------------------------------------------

#[test]
fn test_resample_filter_display() {
    assert_eq!(format!("{}", ResampleFilter::Nearest), "Nearest");
    assert_eq!(format!("{}", ResampleFilter::CatmullRom), "Catmull-Rom");
    assert_eq!(format!("{}", ResampleFilter::default()), "Lanczos3");
}

// ---------------------------------------------------------------------------
// ViewerConfig TOML
// ---------------------------------------------------------------------------

#[test]
fn test_viewer_config_toml_roundtrip() {
    let mut config = ViewerConfig::default();
    config.source.filter = ResampleFilter::Triangle;
    config.viewport.canvas_width = 1024;
    config.overlay.image_view_only = true;

    let text = toml::to_string_pretty(&config).unwrap();
    let back: ViewerConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config: ViewerConfig = toml::from_str(
        r#"
        [viewport]
        canvas_width = 640

        [source]
        filter = "Nearest"
        "#,
    )
    .unwrap();
    assert_eq!(config.viewport.canvas_width, 640);
    assert_eq!(config.viewport.canvas_height, 600);
    assert_eq!(config.viewport.zoom_step, DEFAULT_ZOOM_STEP);
    assert_eq!(config.source.huge_size, DEFAULT_HUGE_SIZE);
    assert_eq!(config.source.filter, ResampleFilter::Nearest);
    assert_eq!(config.overlay.label_font_size, 20.0);
}

#[test]
fn test_empty_toml_is_default() {
    let config: ViewerConfig = toml::from_str("").unwrap();
    assert_eq!(config, ViewerConfig::default());
}

// ---------------------------------------------------------------------------
// Catalog TOML
// ---------------------------------------------------------------------------

const CATALOG: &str = r##"
mosaic_image = "mosaic.png"
image_dir = "tiles"
label_fields = ["DefectId", "Area"]

[binning]
thresholds = [10.0, 100.0]
colors = ["aqua", "#00ff00"]
infinity_color = "magenta3"
scheme = "Class"

[[binning.classes]]
id = 3
name = "particle"
color = "royalblue3"

[[binning.classes]]
id = 4
name = "scratch"

[[tiles]]
image_id = 1
file_name = "tile_1.png"
row = 0
column = 0
width_um = 100.0
height_um = 75.0
width_px = 400.0
height_px = 300.0

[[defects]]
id = 7
image_id = 1
x = 10.0
y = 20.0
width = 2.0
height = 3.0
area = 6.0
class_id = 3
"##;

#[test]
fn test_catalog_parses_with_colour_names() {
    let catalog: ScanCatalog = toml::from_str(CATALOG).unwrap();
    assert_eq!(catalog.tiles.len(), 1);
    assert_eq!(catalog.defects[0].class_id, Some(3));
    assert_eq!(catalog.defects[0].orientation, 0.0);
    assert_eq!(catalog.label_fields, vec![LabelField::DefectId, LabelField::Area]);

    let b = &catalog.binning;
    assert_eq!(b.scheme, BinningScheme::Class);
    assert_eq!(b.colors[0], Color::rgb(0, 255, 255));
    assert_eq!(b.colors[1], Color::rgb(0, 255, 0));
    assert_eq!(b.infinity_color, Color::rgb(205, 0, 205));
    assert_eq!(b.class_color(Some(3)), Color::rgb(58, 95, 205));
    assert_eq!(b.class_color(Some(4)), b.infinity_color);

    assert_eq!(catalog.tile(1).unwrap().width_px, 400.0);
    assert!(catalog.tile(2).is_err());
    assert_eq!(catalog.defects_on(1).count(), 1);
}

#[test]
fn test_catalog_defaults_when_sections_missing() {
    let catalog: ScanCatalog = toml::from_str("").unwrap();
    assert!(catalog.tiles.is_empty());
    assert_eq!(catalog.binning.thresholds.len(), 5);
    assert_eq!(
        catalog.label_fields,
        vec![LabelField::X, LabelField::Y, LabelField::Area]
    );
}

#[test]
fn test_unknown_colour_is_rejected() {
    let err = toml::from_str::<ScanCatalog>(
        r#"
        [binning]
        colors = ["not-a-colour"]
        "#,
    );
    assert!(err.is_err());
}

// ---------------------------------------------------------------------------
// Event scripts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Script {
    events: Vec<ViewerEvent>,
}

#[test]
fn test_event_script_parses() {
    let script: Script = toml::from_str(
        r#"
        [[events]]
        kind = "wheel"
        direction = "up"
        x = 10.0
        y = 20.0

        [[events]]
        kind = "pointer_press"
        button = "secondary"
        x = 1.0
        y = 2.0

        [[events]]
        kind = "key"
        key = "escape"

        [[events]]
        kind = "key"
        key = { char = "w" }
        "#,
    )
    .unwrap();

    assert_eq!(
        script.events,
        vec![
            ViewerEvent::Wheel {
                direction: WheelDirection::Up,
                x: 10.0,
                y: 20.0,
            },
            ViewerEvent::PointerPress {
                button: PointerButton::Secondary,
                x: 1.0,
                y: 2.0,
            },
            ViewerEvent::Key { key: Key::Escape },
            ViewerEvent::Key { key: Key::Char('w') },
        ]
    );
}
