//! SVG rendering of decision boundaries and weight comparisons

use crate::boundary::{evaluate_decision_surface, DecisionSurface, LabelEncoding};
use crate::core::{ClassLabels, Classifier, Dataset, FeatureRange, RangeMap, Result, SweepError};
use crate::report::WeightTable;
use crate::sweep::SweepOutcome;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Chart type every drawing helper works on
pub type FeatureChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Pixel size of one boundary panel
pub const PANEL_SIZE: (u32, u32) = (400, 400);

const REGION_ALPHA: f64 = 0.4;

// Matplotlib tab10
const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn plot_error<E: std::fmt::Display>(error: E) -> SweepError {
    SweepError::PlotError(error.to_string())
}

/// Shading for a surface code: red for code 0, blue for code 1
pub fn region_color(code: u8) -> RGBAColor {
    let base = match code {
        0 => RGBColor(214, 96, 77),
        1 => RGBColor(67, 147, 195),
        other => TAB10[other as usize % TAB10.len()],
    };
    base.mix(REGION_ALPHA)
}

/// Marker colour for a class index: tab:red, then tab:blue
pub fn class_color(class_index: usize) -> RGBColor {
    match class_index {
        0 => TAB10[3],
        1 => TAB10[0],
        other => TAB10[other % TAB10.len()],
    }
}

/// Bar colour for the j-th sweep candidate
pub fn candidate_color(index: usize) -> RGBColor {
    TAB10[index % TAB10.len()]
}

/// Shade the class regions of a surface. Equal codes along a grid row are
/// merged into one rectangle.
pub fn draw_decision_surface<DB: DrawingBackend>(
    chart: &mut FeatureChart<'_, DB>,
    surface: &DecisionSurface,
) -> Result<()> {
    let step = surface.step();
    let xs = surface.xs();
    let ys = surface.ys();
    let (rows, _) = surface.shape();

    let cells = (0..rows).flat_map(|row| {
        let y0 = ys[row];
        surface
            .row_runs(row)
            .into_iter()
            .map(move |(first, last, code)| {
                Rectangle::new(
                    [(xs[first], y0), (xs[last] + step, y0 + step)],
                    region_color(code).filled(),
                )
            })
    });
    chart.draw_series(cells).map_err(plot_error)?;
    Ok(())
}

/// Scatter the first two features of `points`, one legend entry per class
pub fn draw_class_points<DB: DrawingBackend, D: Dataset + ?Sized>(
    chart: &mut FeatureChart<'_, DB>,
    points: &D,
    classes: &ClassLabels,
) -> Result<()> {
    for class_index in 0..classes.len() {
        let color = class_color(class_index);
        let coords: Vec<(f64, f64)> = (0..points.len())
            .map(|i| points.sample(i))
            .filter(|s| s.label == class_index)
            .map(|s| (s.features[0], s.features[1]))
            .collect();

        chart
            .draw_series(
                coords
                    .into_iter()
                    .map(move |p| Circle::new(p, 3, color.filled())),
            )
            .map_err(plot_error)?
            .label(classes.name(class_index))
            .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
    }
    Ok(())
}

/// Where [`plot_decision_boundary`] draws
pub enum BoundaryTarget<'t, 'a, 'b> {
    /// An existing chart whose axes have not been labelled yet
    Chart(&'t mut FeatureChart<'a, SVGBackend<'b>>),
    /// A standalone single-panel SVG written to this path
    NewFigure(&'t Path),
}

/// Evaluate a classifier over the two feature ranges and shade its class
/// regions, labelling the axes with the feature names.
pub fn plot_decision_boundary<C: Classifier + ?Sized>(
    classifier: &C,
    ranges: &RangeMap,
    step: f64,
    encoding: LabelEncoding,
    target: BoundaryTarget<'_, '_, '_>,
) -> Result<DecisionSurface> {
    let surface = evaluate_decision_surface(classifier, ranges, step, encoding)?;

    match target {
        BoundaryTarget::Chart(chart) => {
            label_axes(chart, surface.x_feature(), surface.y_feature())?;
            draw_decision_surface(chart, &surface)?;
        }
        BoundaryTarget::NewFigure(path) => {
            let ((_, x_range), (_, y_range)) = ranges.axes()?;
            let root = SVGBackend::new(path, PANEL_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            let mut chart = panel_chart(&root, None, x_range, y_range)?;
            label_axes(&mut chart, surface.x_feature(), surface.y_feature())?;
            draw_decision_surface(&mut chart, &surface)?;
            root.present().map_err(plot_error)?;
            log::debug!("Decision boundary written to {}", path.display());
        }
    }

    Ok(surface)
}

/// Chart over one boundary panel's feature ranges
fn panel_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    caption: Option<&str>,
    x_range: FeatureRange,
    y_range: FeatureRange,
) -> Result<FeatureChart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    if let Some(caption) = caption {
        builder.caption(caption, ("sans-serif", 20));
    }
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.min..x_range.max, y_range.min..y_range.max)
        .map_err(plot_error)
}

/// Draw the axes with the feature names as descriptions, no grid lines
fn label_axes<DB: DrawingBackend>(
    chart: &mut FeatureChart<'_, DB>,
    x_name: &str,
    y_name: &str,
) -> Result<()> {
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_name)
        .y_desc(y_name)
        .draw()
        .map_err(plot_error)
}

/// Render one panel per candidate, side by side with shared axis ranges,
/// each showing the decision regions and the given points.
pub fn render_sweep_figure<D: Dataset + ?Sized>(
    path: &Path,
    outcome: &SweepOutcome,
    points: &D,
    classes: &ClassLabels,
    ranges: &RangeMap,
) -> Result<()> {
    if outcome.is_empty() {
        return Err(SweepError::InvalidParameter(
            "Nothing to plot: the sweep has no candidates".to_string(),
        ));
    }
    let ((x_name, x_range), (y_name, y_range)) = ranges.axes()?;

    let width = PANEL_SIZE.0 * outcome.len() as u32;
    let root = SVGBackend::new(path, (width, PANEL_SIZE.1)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let panels = root.split_evenly((1, outcome.len()));

    for (area, fit) in panels.iter().zip(outcome.fits()) {
        let mut chart = panel_chart(area, Some(&fit.label), x_range, y_range)?;
        label_axes(&mut chart, x_name, y_name)?;
        draw_decision_surface(&mut chart, &fit.surface)?;
        draw_class_points(&mut chart, points, classes)?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_error)?;
    }

    root.present().map_err(plot_error)?;
    log::info!("Decision boundaries written to {}", path.display());
    Ok(())
}

/// Render a horizontal grouped bar chart: one group per feature, one bar
/// per candidate column.
pub fn render_weight_chart(path: &Path, table: &WeightTable) -> Result<()> {
    let (n_features, n_candidates) = table.shape();
    if n_features == 0 || n_candidates == 0 {
        return Err(SweepError::InvalidParameter(
            "Nothing to plot: empty weight table".to_string(),
        ));
    }

    let (lo, hi) = table.value_bounds();
    let (lo, hi) = (lo.min(0.0), hi.max(0.0));
    let pad = ((hi - lo) * 0.1).max(1e-3);
    let bar_height = 0.8 / n_candidates as f64;
    let features = table.features();

    let height = 150 + 120 * n_features as u32;
    let root = SVGBackend::new(path, (800, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Weights per C", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(160)
        .build_cartesian_2d((lo - pad)..(hi + pad), -0.5..(n_features as f64 - 0.5))
        .map_err(plot_error)?;

    let feature_label = |y: &f64| {
        let nearest = y.round();
        if (y - nearest).abs() < 1e-9 && nearest >= 0.0 && (nearest as usize) < n_features {
            features[nearest as usize].clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(2 * n_features + 1)
        .y_label_formatter(&feature_label)
        .x_desc("coefficient")
        .draw()
        .map_err(plot_error)?;

    for (j, label) in table.columns().iter().enumerate() {
        let color = candidate_color(j);
        let column = table.column(j);
        chart
            .draw_series(column.iter().enumerate().map(|(i, &w)| {
                let y0 = i as f64 - 0.4 + j as f64 * bar_height;
                Rectangle::new([(0.0, y0), (w, y0 + bar_height)], color.filled())
            }))
            .map_err(plot_error)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .draw_series(LineSeries::new(
            [(0.0, -0.5), (0.0, n_features as f64 - 0.5)],
            &BLACK,
        ))
        .map_err(plot_error)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    log::info!("Weight comparison written to {}", path.display());
    Ok(())
}
