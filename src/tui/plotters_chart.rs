//! Plotters-powered gradation chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! Sieves sit at integer x positions in chart order (coarse on the left); the
//! axis labels map those positions back to sieve names.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series are computed by the caller.
pub struct GradationChart<'a> {
    /// `(sieve index, percent passing)` in chart order.
    pub points: &'a [(f64, f64)],
    /// Sieve label for each index.
    pub labels: &'a [&'static str],
    /// Indices of sieves that pass more than their coarser neighbour.
    pub flagged: &'a [(f64, f64)],
}

impl<'a> Widget for GradationChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a mesh in a tiny area; show a hint instead of failing.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.points.is_empty() {
            return;
        }

        let x0 = -0.3;
        let x1 = (self.points.len() - 1) as f64 + 0.3;
        let labels = self.labels;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 5)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..100.0)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("sieve size")
                .y_desc("% passing")
                .x_labels(labels.len())
                .y_labels(5)
                .x_label_formatter(&|v| sieve_label(labels, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&RGBColor(60, 60, 60))
                .draw()?;

            let line_color = RGBColor(59, 130, 246);
            let point_color = WHITE;
            let flag_color = RGBColor(255, 165, 0);

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;
            // Pixels rather than circles: the ratatui backend mis-scales circle radii.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), point_color)))?;
            chart.draw_series(self.flagged.iter().map(|&(x, y)| Pixel::new((x, y), flag_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for an axis position: the sieve name at integer positions, blank elsewhere.
fn sieve_label(labels: &[&str], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
}
