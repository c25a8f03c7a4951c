//! Figure rendering
//!
//! [`Renderer`] is the seam between report construction and image output.
//! [`SvgRenderer`] draws with the plotters SVG backend, which needs no system
//! fonts.

use crate::figure::{Figure, Panel, PanelContent, Series, SeriesStyle};
use crate::palette::Rgb;
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;

const FONT: &str = "sans-serif";
const MARKER_SIZE: u32 = 4;
const SCATTER_ALPHA: f64 = 0.75;

/// Writes a figure to an image file
pub trait Renderer {
    /// Render and release the figure
    fn render(&self, figure: Figure, path: &Path) -> Result<()>;
}

/// SVG output through plotters
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

impl Renderer for SvgRenderer {
    fn render(&self, figure: Figure, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, figure.size).into_drawing_area();
        root.fill(&WHITE)?;

        if !figure.panels.is_empty() {
            let layout = (figure.panels.len(), 1);
            let areas = match &figure.title {
                Some(title) => root.titled(title, (FONT, 28))?.split_evenly(layout),
                None => root.split_evenly(layout),
            };
            for (area, panel) in areas.iter().zip(&figure.panels) {
                draw_panel(area, panel)
                    .with_context(|| format!("Failed to draw panel '{}'", panel.title))?;
            }
        }

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn to_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn draw_panel(area: &Area<'_>, panel: &Panel) -> Result<()> {
    match &panel.content {
        PanelContent::Placeholder(message) => draw_placeholder(area, message),
        PanelContent::Plot(series) => draw_plot(area, panel, series),
    }
}

fn draw_placeholder(area: &Area<'_>, message: &str) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let style = TextStyle::from(FontDesc::new(FontFamily::SansSerif, 20.0, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        message.to_string(),
        (width as i32 / 2, height as i32 / 2),
        style,
    ))?;
    Ok(())
}

fn draw_plot(area: &Area<'_>, panel: &Panel, series: &[Series]) -> Result<()> {
    let ((x0, x1), (y0, y1)) = panel.axis_ranges();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT, 20))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_desc.as_str())
        .y_desc(panel.y_desc.as_str())
        .draw()?;

    // NaN fails every comparison, so non-finite points drop out here too
    let visible = |&&(x, y): &&(f64, f64)| x >= x0 && x <= x1 && y >= y0 && y <= y1;

    for s in series {
        let color = to_color(s.color);
        let points: Vec<(f64, f64)> = s.points.iter().filter(visible).copied().collect();
        match s.style {
            SeriesStyle::Line => {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                    .label(s.label.clone())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
                )?;
            }
            SeriesStyle::Scatter => {
                let fill = color.mix(SCATTER_ALPHA).filled();
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(move |&p| Circle::new(p, MARKER_SIZE, fill)),
                    )?
                    .label(s.label.clone())
                    .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE, fill));
            }
        }
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}
