use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::confusion::ConfusionCategory;
use crate::error::EvalError;
use crate::evaluate::Evaluation;
use crate::surface::DecisionSurface;

/// Number of filled contour levels.
pub const CONTOUR_BANDS: usize = 8;
pub const CONTOUR_OPACITY: f64 = 0.7;
/// Scatter marker radius in pixels.
pub const MARKER_SIZE: i32 = 7;

const DARK_RED: RGBColor = RGBColor(139, 0, 0);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);

fn coolwarm() -> DerivedColorMap<RGBColor> {
    DerivedColorMap::new(&[
        RGBColor(59, 76, 192),
        RGBColor(221, 221, 221),
        RGBColor(180, 4, 38),
    ])
}

/// A horizontal strip of adjacent grid cells that fall in the same band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourRun {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub band: usize,
}

/// Band index of `v` among `bands` equal-width bands over `[lo, hi]`.
fn band_of(v: f64, lo: f64, hi: f64, bands: usize) -> usize {
    if hi <= lo {
        return 0;
    }
    let b = ((v - lo) / (hi - lo) * bands as f64).floor() as usize;
    b.min(bands - 1)
}

/// Number of bands actually used for a surface; a flat surface gets one.
pub fn band_count(surface: &DecisionSurface) -> usize {
    let (lo, hi) = surface.score_range();
    if hi > lo {
        CONTOUR_BANDS
    } else {
        1
    }
}

/// Split the surface into rectangles of constant band.
///
/// Each grid point owns the cell centred on it, clipped to the grid extent,
/// and neighbouring cells of one row with the same band are merged.
pub fn contour_runs(surface: &DecisionSurface) -> Vec<ContourRun> {
    let n = surface.resolution();
    if n == 0 {
        return Vec::new();
    }
    let (lo, hi) = surface.score_range();
    let bands = band_count(surface);
    let (dx, dy) = surface.cell_size();
    let (x_min, x_max) = (surface.xs[0], surface.xs[n - 1]);
    let (y_min, y_max) = (surface.ys[0], surface.ys[n - 1]);

    let mut runs = Vec::new();
    for (i, row) in surface.scores.rows().into_iter().enumerate() {
        let y0 = (surface.ys[i] - dy / 2.0).max(y_min);
        let y1 = (surface.ys[i] + dy / 2.0).min(y_max);
        let mut start = 0;
        while start < n {
            let band = band_of(row[start], lo, hi, bands);
            let mut end = start;
            while end + 1 < n && band_of(row[end + 1], lo, hi, bands) == band {
                end += 1;
            }
            runs.push(ContourRun {
                x0: (surface.xs[start] - dx / 2.0).max(x_min),
                x1: (surface.xs[end] + dx / 2.0).min(x_max),
                y0,
                y1,
                band,
            });
            start = end + 1;
        }
    }
    runs
}

fn marker_color(category: ConfusionCategory) -> RGBColor {
    match category {
        ConfusionCategory::TruePositive | ConfusionCategory::FalseNegative => DARK_RED,
        ConfusionCategory::TrueNegative | ConfusionCategory::FalsePositive => DARK_BLUE,
    }
}

fn is_circle(category: ConfusionCategory) -> bool {
    matches!(
        category,
        ConfusionCategory::TruePositive | ConfusionCategory::TrueNegative
    )
}

fn render_err<E: std::fmt::Display>(e: E) -> EvalError {
    EvalError::Render(e.to_string())
}

/// Plot range covering the grid and every sample.
fn axis_range(grid_axis: &[f64], values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = match (grid_axis.first(), grid_axis.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => (0.0, 1.0),
    };
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo, hi)
}

/// Draw the decision surface and the confusion scatter of an evaluation.
///
/// # Arguments
///
/// * `root` - Area to draw on; it is cleared to white first.
/// * `features` - The `N x 2` samples the evaluation was computed on.
/// * `evaluation` - Result of [`crate::evaluate::evaluate`].
pub fn plot_evaluation<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    features: ArrayView2<'_, f64>,
    evaluation: &Evaluation,
) -> Result<(), EvalError> {
    if features.ncols() != 2 {
        return Err(EvalError::ShapeMismatch {
            what: "feature columns",
            expected: 2,
            found: features.ncols(),
        });
    }
    if features.nrows() != evaluation.labels.len() {
        return Err(EvalError::ShapeMismatch {
            what: "plotted samples",
            expected: evaluation.labels.len(),
            found: features.nrows(),
        });
    }

    let surface = &evaluation.surface;
    let x_range = axis_range(
        surface.xs.as_slice().unwrap_or(&[]),
        features.column(0).iter().copied(),
    );
    let y_range = axis_range(
        surface.ys.as_slice().unwrap_or(&[]),
        features.column(1).iter().copied(),
    );
    for (axis, (lo, hi)) in [("x_1", x_range), ("x_2", y_range)] {
        if !(hi - lo).is_finite() {
            return Err(EvalError::Render(format!(
                "{} range [{}, {}] has no finite width",
                axis, lo, hi
            )));
        }
    }

    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption(evaluation.metrics.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x_1")
        .y_desc("x_2")
        .draw()
        .map_err(render_err)?;

    let cmap = coolwarm();
    let bands = band_count(surface);
    let band_colors: Vec<RGBColor> = (0..bands)
        .map(|b| cmap.get_color((b as f64 + 0.5) / bands as f64))
        .collect();

    chart
        .draw_series(contour_runs(surface).into_iter().map(|run| {
            Rectangle::new(
                [(run.x0, run.y0), (run.x1, run.y1)],
                band_colors[run.band].mix(CONTOUR_OPACITY).filled(),
            )
        }))
        .map_err(render_err)?;

    for category in ConfusionCategory::ALL {
        let color = marker_color(category);
        let points: Vec<(f64, f64)> = evaluation
            .partition
            .indices(category)
            .iter()
            .map(|&i| (features[[i, 0]], features[[i, 1]]))
            .collect();

        if is_circle(category) {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
                )
                .map_err(render_err)?
                .label(category.label())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        } else {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| TriangleMarker::new(p, MARKER_SIZE, color.filled())),
                )
                .map_err(render_err)?
                .label(category.label())
                .legend(move |(x, y)| TriangleMarker::new((x, y), 5, color.filled()));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
