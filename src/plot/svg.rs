//! Plotters-powered SVG rendering of the baseline diagram.
//!
//! The SVG backend writes text as `<text>` elements, so no font rasterisation
//! is involved and the output is byte-for-byte reproducible.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::diagram::Diagram;

pub const PLOT_FILE: &str = "baseline_plot.svg";

/// Series colours, cycled per policy.
const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 0, 0),       // black
    RGBColor(70, 130, 180),  // steelblue
    RGBColor(255, 99, 71),   // tomato
    RGBColor(218, 165, 32),  // goldenrod
    RGBColor(46, 139, 87),   // seagreen
    RGBColor(128, 0, 128),   // purple
];
const REFERENCE_COLOR: RGBColor = RGBColor(220, 0, 0);

/// Render the diagram to an SVG file.
pub fn render_svg(diagram: &Diagram, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    draw(diagram, path, size)
        .map_err(|e| AppError::output(format!("Failed to render baseline plot '{}': {e}", path.display())))
}

fn draw(diagram: &Diagram, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1, y0, y1) = diagram.bounds();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let fmt_x = |v: &f64| diagram.date_at(*v).format("%Y-%m-%d").to_string();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Date")
        .y_desc("Perpendicular baseline (m)")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    // 1) Pair segments, one legend entry per policy.
    for (idx, name) in diagram.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        chart
            .draw_series(
                diagram
                    .segments
                    .iter()
                    .filter(|s| s.series == idx)
                    .map(|s| PathElement::new(vec![s.from, s.to], color.stroke_width(2))),
            )?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    // 2) Acquisitions; the reference is drawn larger and in red.
    chart.draw_series(diagram.points.iter().map(|p| {
        let (color, radius) = if p.is_reference {
            (REFERENCE_COLOR, 4)
        } else {
            (BLACK, 3)
        };
        Circle::new((p.x, p.y), radius, color.filled())
    }))?;

    // 3) Date labels, nudged off the markers.
    let dx = 0.005 * (x1 - x0);
    let dy = 0.01 * (y1 - y0);
    chart.draw_series(diagram.points.iter().map(|p| {
        let color = if p.is_reference { REFERENCE_COLOR } else { BLACK };
        Text::new(
            p.label.clone(),
            (p.x + dx, p.y + dy),
            ("sans-serif", 10).into_font().color(&color),
        )
    }))?;

    if !diagram.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
