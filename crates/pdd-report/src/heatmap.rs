//! SVG heatmaps over the ordered variant grid.
//!
//! Four matrices are rendered: Kappa, Accuracy (centered at the mean
//! no-information rate, significant cells starred), Sensitivity and
//! Specificity (both centered at 0.5). Blank cells (the blanked Kappa
//! triangle, undefined metrics) stay white. Axis labels are colored by
//! the variant's IADL operationalization.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use plotters::prelude::{
    IntoDrawingArea, IntoFont, RGBColor, Rectangle, SVGBackend, ShapeStyle, Text, WHITE,
};
use tracing::info;

use pdd_concord::{ConcordanceTable, PairStatistics};
use pdd_model::{IadlSource, KappaDisplay};

use crate::ordering::OrderedVariant;

const CELL: i32 = 46;
const MARGIN_LEFT: i32 = 120;
const MARGIN_TOP: i32 = 48;
const MARGIN_BOTTOM: i32 = 96;
const MARGIN_RIGHT: i32 = 24;

const FAQ_LABEL: RGBColor = RGBColor(178, 34, 34);
const OTHER_LABEL: RGBColor = RGBColor(24, 61, 107);
const LOW_END: RGBColor = RGBColor(33, 102, 172);
const HIGH_END: RGBColor = RGBColor(178, 24, 43);

/// Cell value plus whether it carries the significance star.
type CellReader = fn(&PairStatistics) -> Option<(f64, bool)>;

struct HeatmapSpec {
    file_name: &'static str,
    title: &'static str,
    center: f64,
    half_range: f64,
    /// Blank cells above the diagonal (Kappa shown once).
    blank_upper: bool,
    reader: CellReader,
}

/// Write the four heatmaps into `dir`; returns the written paths.
pub fn write_heatmaps(
    table: &ConcordanceTable,
    ordered: &[OrderedVariant],
    dir: &Path,
    display: KappaDisplay,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create plot directory {}", dir.display()))?;
    let accuracy_center = table.mean_no_information_rate().unwrap_or(0.5);
    let charts = [
        HeatmapSpec {
            file_name: "kappa.svg",
            title: "Cohen's Kappa",
            center: 0.0,
            half_range: 1.0,
            blank_upper: display == KappaDisplay::Triangle,
            reader: |pair| pair.kappa.map(|interval| (interval.estimate, false)),
        },
        HeatmapSpec {
            file_name: "accuracy.svg",
            title: "Accuracy (centered at mean NIR)",
            center: accuracy_center,
            half_range: 0.5,
            blank_upper: false,
            reader: |pair| {
                pair.accuracy
                    .map(|interval| (interval.estimate, pair.significant))
            },
        },
        HeatmapSpec {
            file_name: "sensitivity.svg",
            title: "Sensitivity",
            center: 0.5,
            half_range: 0.5,
            blank_upper: false,
            reader: |pair| pair.sensitivity.map(|value| (value, false)),
        },
        HeatmapSpec {
            file_name: "specificity.svg",
            title: "Specificity",
            center: 0.5,
            half_range: 0.5,
            blank_upper: false,
            reader: |pair| pair.specificity.map(|value| (value, false)),
        },
    ];
    let mut written = Vec::with_capacity(charts.len());
    for spec in charts {
        let path = dir.join(spec.file_name);
        draw_heatmap(&path, table, ordered, &spec)?;
        written.push(path);
    }
    info!(plots = written.len(), dir = %dir.display(), "heatmaps written");
    Ok(written)
}

fn draw_heatmap(
    path: &Path,
    table: &ConcordanceTable,
    ordered: &[OrderedVariant],
    spec: &HeatmapSpec,
) -> Result<()> {
    let n = ordered.len() as i32;
    let width = (MARGIN_LEFT + n * CELL + MARGIN_RIGHT) as u32;
    let height = (MARGIN_TOP + n * CELL + MARGIN_BOTTOM) as u32;
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("non-UTF8 plot path {}", path.display()))?;
    let root = SVGBackend::new(path_str, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|error| anyhow!("{error}"))?;
    root.draw(&Text::new(
        spec.title.to_string(),
        (MARGIN_LEFT, 16),
        ("sans-serif", 18).into_font(),
    ))
    .map_err(|error| anyhow!("{error}"))?;
    for (row, predictor) in ordered.iter().enumerate() {
        for (column, reference) in ordered.iter().enumerate() {
            let x0 = MARGIN_LEFT + column as i32 * CELL;
            let y0 = MARGIN_TOP + row as i32 * CELL;
            let blanked = spec.blank_upper && row < column;
            let cell = if blanked {
                None
            } else {
                table
                    .pair(&predictor.name, &reference.name)
                    .and_then(spec.reader)
            };
            let fill = match cell {
                Some((value, _)) => diverging_color(value, spec.center, spec.half_range),
                // White marks a blank cell.
                None => RGBColor(255, 255, 255),
            };
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL, y0 + CELL)],
                ShapeStyle::from(&fill).filled(),
            ))
            .map_err(|error| anyhow!("{error}"))?;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + CELL, y0 + CELL)],
                ShapeStyle::from(&RGBColor(200, 200, 200)),
            ))
            .map_err(|error| anyhow!("{error}"))?;
            if let Some((value, starred)) = cell {
                let label = if starred {
                    format!("{value:.2}*")
                } else {
                    format!("{value:.2}")
                };
                root.draw(&Text::new(
                    label,
                    (x0 + 6, y0 + CELL / 2 - 6),
                    ("sans-serif", 12).into_font(),
                ))
                .map_err(|error| anyhow!("{error}"))?;
            }
        }
    }
    draw_axis_labels(&root, ordered)?;
    root.present().map_err(|error| anyhow!("{error}"))?;
    Ok(())
}

fn draw_axis_labels<DB>(
    root: &plotters::drawing::DrawingArea<DB, plotters::coord::Shift>,
    ordered: &[OrderedVariant],
) -> Result<()>
where
    DB: plotters::prelude::DrawingBackend,
{
    for (index, variant) in ordered.iter().enumerate() {
        let color = axis_label_color(variant.iadl_source);
        let style = ("sans-serif", 13).into_font().color(&color);
        // Row label, left of the grid.
        root.draw(&Text::new(
            variant.name.clone(),
            (8, MARGIN_TOP + index as i32 * CELL + CELL / 2 - 6),
            style.clone(),
        ))
        .map_err(|error| anyhow!("{error}"))?;
        // Column label, below the grid; staggered so long names stay legible.
        root.draw(&Text::new(
            variant.name.clone(),
            (
                MARGIN_LEFT + index as i32 * CELL + 4,
                MARGIN_TOP + ordered.len() as i32 * CELL + 10 + (index as i32 % 2) * 16,
            ),
            style,
        ))
        .map_err(|error| anyhow!("{error}"))?;
    }
    Ok(())
}

fn axis_label_color(source: IadlSource) -> RGBColor {
    match source {
        IadlSource::Faq => FAQ_LABEL,
        IadlSource::Other => OTHER_LABEL,
    }
}

/// Map `value` onto a blue-white-red diverging scale around `center`.
fn diverging_color(value: f64, center: f64, half_range: f64) -> RGBColor {
    let t = ((value - center) / half_range).clamp(-1.0, 1.0);
    let blend = |from: u8, to: u8, weight: f64| -> u8 {
        (f64::from(from) + (f64::from(to) - f64::from(from)) * weight).round() as u8
    };
    if t < 0.0 {
        let weight = -t;
        RGBColor(
            blend(255, LOW_END.0, weight),
            blend(255, LOW_END.1, weight),
            blend(255, LOW_END.2, weight),
        )
    } else {
        RGBColor(
            blend(255, HIGH_END.0, t),
            blend(255, HIGH_END.1, t),
            blend(255, HIGH_END.2, t),
        )
    }
}
