//! Renderer-independent chart model
//!
//! Each report artifact is described as a [`Figure`] built through its own
//! [`FigureBuilder`]. The builder owns all panel and series state for that one
//! artifact; nothing is shared between artifacts.

use crate::palette::Rgb;

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Connected polyline with point markers
    Line,
    /// Unconnected, semi-transparent markers
    Scatter,
}

/// One legend entry worth of points
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: Rgb,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Plot(Vec<Series>),
    /// Centered message, no axes
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub content: PanelContent,
}

impl Panel {
    pub fn plot(title: &str, x_desc: &str, y_desc: &str) -> Self {
        Self {
            title: title.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            content: PanelContent::Plot(Vec::new()),
        }
    }

    pub fn placeholder(message: &str) -> Self {
        Self {
            title: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            content: PanelContent::Placeholder(message.to_string()),
        }
    }

    /// Add a series; ignored on placeholder panels
    pub fn push_series(&mut self, series: Series) {
        if let PanelContent::Plot(all) = &mut self.content {
            all.push(series);
        }
    }

    /// Series of a plot panel, empty for placeholders
    pub fn series(&self) -> &[Series] {
        match &self.content {
            PanelContent::Plot(series) => series,
            PanelContent::Placeholder(_) => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, PanelContent::Placeholder(_))
    }

    /// Padded `(x, y)` axis ranges covering every finite point
    pub fn axis_ranges(&self) -> ((f64, f64), (f64, f64)) {
        let points = self
            .series()
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for &(x, y) in points {
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }

        match bounds {
            Some((x0, x1, y0, y1)) => (padded(x0, x1), padded(y0, y1)),
            None => ((0.0, 1.0), (0.0, 1.0)),
        }
    }
}

/// Pad a data extent by 5% of its span on each side
///
/// The result always has a finite, non-zero span. When the data itself spans
/// more than `f64::MAX`, a window of half that width is centered on it and
/// the outermost points fall outside the axes.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    // halves stay finite even when hi - lo does not
    let half = hi / 2.0 - lo / 2.0;
    let pad = if half > 0.0 { half * 0.1 } else { 0.5 };
    // keep ticks above float resolution for large magnitudes
    let pad = pad.max(lo.abs().max(hi.abs()) * 1e-9);

    let lo = (lo - pad).max(f64::MIN);
    let hi = (hi + pad).min(f64::MAX);
    if (hi - lo).is_finite() {
        return (lo, hi);
    }

    let center = lo / 2.0 + hi / 2.0;
    (center - f64::MAX / 4.0, center + f64::MAX / 4.0)
}

/// A fully described artifact ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    /// Pixel size `(width, height)`
    pub size: (u32, u32),
    /// Panels stacked top to bottom
    pub panels: Vec<Panel>,
}

/// Per-artifact builder
#[derive(Debug)]
pub struct FigureBuilder {
    figure: Figure,
}

impl FigureBuilder {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            figure: Figure {
                title: None,
                size,
                panels: Vec::new(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.figure.title = Some(title.to_string());
        self
    }

    pub fn panel(mut self, panel: Panel) -> Self {
        self.figure.panels.push(panel);
        self
    }

    pub fn build(self) -> Figure {
        self.figure
    }
}
