//! ASCII plotting of the gradation curve for terminal output.
//!
//! Fixed-size grid, deterministic output. Sieves are spaced evenly along x in
//! chart order (coarse on the left), percent passing runs 0..100 on y.
//!
//! Plot elements:
//! - sieve points: `o`
//! - connecting line: `-`

use crate::curve::GradationCurve;

const Y_MIN: f64 = 0.0;
const Y_MAX: f64 = 100.0;

pub const MIN_HEIGHT: usize = 5;
pub const MAX_WIDTH: usize = 400;
pub const MAX_HEIGHT: usize = 200;

/// Render the curve into a `width` x `height` character grid with a one-line header.
///
/// The grid size is clamped to `[points, MAX_WIDTH] x [MIN_HEIGHT, MAX_HEIGHT]`.
pub fn render_gradation_plot(curve: &GradationCurve, width: usize, height: usize) -> String {
    let n = curve.points.len();
    let width = width.clamp(n, MAX_WIDTH);
    let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = curve
        .iter()
        .enumerate()
        .map(|(i, p)| (map_x(i, n, width), map_y(p.percent_passing, height)))
        .collect();

    // Line first so points overlay it.
    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    let first = curve.points.first().map(|p| p.label).unwrap_or("-");
    let last = curve.points.last().map(|p| p.label).unwrap_or("-");
    out.push_str(&format!(
        "Plot: sieve=[{first} .. {last}] | passing=[{Y_MIN:.0}, {Y_MAX:.0}]%\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, height: usize) -> usize {
    let u = ((y - Y_MIN) / (Y_MAX - Y_MIN)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Never overwrites a non-blank cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::project_curve;
    use crate::domain::ParameterSet;

    #[test]
    fn plot_golden_snapshot_defaults() {
        let txt = render_gradation_plot(&project_curve(&ParameterSet::defaults()), 10, 5);
        let expected = concat!(
            "Plot: sieve=[19mm .. 0.075mm] | passing=[0, 100]%\n",
            "o\n",
            " oo\n",
            "   o\n",
            "    ooo\n",
            "       ooo\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_has_one_marker_per_sieve_when_wide() {
        let txt = render_gradation_plot(&project_curve(&ParameterSet::defaults()), 60, 20);
        let body: String = txt.lines().skip(1).collect();
        assert_eq!(body.matches('o').count(), 10);
        assert_eq!(txt.lines().count(), 21);
    }

    #[test]
    fn oversized_grid_is_clamped() {
        let txt = render_gradation_plot(&project_curve(&ParameterSet::defaults()), usize::MAX, usize::MAX);
        assert_eq!(txt.lines().count(), MAX_HEIGHT + 1);
        assert!(txt.lines().skip(1).all(|l| l.chars().count() <= MAX_WIDTH));
    }
}
