use std::path::Path;

use console::Style;
use scanview_core::annotation::MeasureTool;
use scanview_core::mosaic::MosaicView;
use scanview_core::overlay::{BinStatistics, BinningConfig};
use scanview_core::pyramid::LevelSelection;
use scanview_core::tile_view::TileView;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_render_summary(view: &TileView, output: &Path) {
    let s = Styles::new();
    print_title(&s, "Tile View");

    let tile = view.tile();
    let (width, height) = view.source().native_size();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tile"),
        s.value.apply_to(format!("{} ({})", tile.image_id, tile.file_name))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{width}x{height}"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!(
            "{:.4} ({} ticks)",
            view.current_scale(),
            view.state().zoom_ticks()
        ))
    );
    let level = match view.state().level() {
        LevelSelection::Level(i) => format!("pyramid level {i}"),
        LevelSelection::HugeBypass => "native bands".to_string(),
    };
    println!("  {:<14}{}", s.label.apply_to("Source"), s.method.apply_to(level));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Binning"),
        s.method.apply_to(view.binning().scheme)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Defects"),
        s.value.apply_to(format!(
            "{} visible of {}",
            view.visible_defects().len(),
            view.defects().len()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Font size"),
        s.value.apply_to(view.font_size())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!();

    let measurements = view.annotations().annotations();
    if measurements.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Measurements"),
            s.disabled.apply_to("none")
        );
    } else {
        println!("  {}", s.header.apply_to("Measurements"));
        for (i, m) in measurements.iter().enumerate() {
            let text = match m.tool {
                MeasureTool::Line => format!("length {:.3} \u{00b5}m", m.value),
                MeasureTool::Circle => format!("area {:.3} \u{00b5}m\u{00b2}", m.value),
            };
            println!("    {}. {}", s.label.apply_to(i + 1), s.value.apply_to(text));
        }
    }
    println!();
}

pub fn print_mosaic_summary(image: &Path, view: &MosaicView, binning: &BinningConfig, output: &Path) {
    let s = Styles::new();
    print_title(&s, "Scan Mosaic");

    let layout = view.layout();
    println!("  {:<14}{}", s.label.apply_to("Image"), s.path.apply_to(image.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Grid"),
        s.value.apply_to(format!("{} rows x {} columns", layout.rows, layout.cols))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!();

    print_bin_statistics(&s, binning, view.statistics());
}

fn print_bin_statistics(s: &Styles, binning: &BinningConfig, stats: &BinStatistics) {
    println!("  {}", s.header.apply_to("Size bins (\u{00b5}m\u{00b2})"));
    for (i, threshold) in binning.thresholds.iter().enumerate() {
        let color = binning
            .colors
            .get(i)
            .copied()
            .unwrap_or(binning.infinity_color);
        println!(
            "    {:<14}{:>8}  {}",
            s.label.apply_to(format!("<= {threshold}")),
            s.value.apply_to(stats.size_counts[i]),
            s.method.apply_to(color)
        );
    }
    println!(
        "    {:<14}{:>8}  {}",
        s.label.apply_to("larger"),
        s.value.apply_to(stats.infinity_count()),
        s.method.apply_to(binning.infinity_color)
    );
    println!();

    println!("  {}", s.header.apply_to("Classes"));
    for (i, class) in binning.classes.iter().enumerate() {
        let color = match class.color {
            Some(c) => s.method.apply_to(c.to_string()),
            None => s.disabled.apply_to("no colour".to_string()),
        };
        println!(
            "    {:<14}{:>8}  {}",
            s.label.apply_to(&class.name),
            s.value.apply_to(stats.class_counts[i]),
            color
        );
    }
    println!(
        "    {:<14}{:>8}",
        s.label.apply_to("unclassified"),
        s.value.apply_to(stats.unclassified_count())
    );
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(stats.total())
    );
    println!();
}
