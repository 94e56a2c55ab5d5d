//! SVG radar chart.
//!
//! Scale runs 0–100 with a ring every 20 points. Axes start at twelve
//! o'clock and go clockwise in ranked order.

use std::f64::consts::PI;

use aptitude_core::view::RadarPoint;

use crate::html_escape;

const RING_STEP: u32 = 20;
const SCALE_MAX: f64 = 100.0;
const LABEL_GAP: f64 = 18.0;

/// Point at `value` (0–100) along axis `i` of `n` around `(cx, cy)`.
pub fn axis_point(i: usize, n: usize, value: f64, cx: f64, cy: f64, radius: f64) -> (f64, f64) {
    let angle = -PI / 2.0 + 2.0 * PI * i as f64 / n.max(1) as f64;
    let r = radius * (value.clamp(0.0, SCALE_MAX) / SCALE_MAX);
    (cx + r * angle.cos(), cy + r * angle.sin())
}

fn polygon(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a square radar chart `size` pixels wide.
pub fn radar_svg(points: &[RadarPoint], size: u32) -> String {
    let size_f = f64::from(size);
    let cx = size_f / 2.0;
    let cy = size_f / 2.0;
    let radius = size_f / 2.0 - 70.0;
    let n = points.len();

    let mut svg = format!(
        "<svg class=\"radar\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );

    if n == 0 {
        svg.push_str("</svg>\n");
        return svg;
    }

    for ring in (RING_STEP..=SCALE_MAX as u32).step_by(RING_STEP as usize) {
        let ring_points: Vec<(f64, f64)> = (0..n)
            .map(|i| axis_point(i, n, f64::from(ring), cx, cy, radius))
            .collect();
        svg.push_str(&format!(
            "  <polygon points=\"{}\" fill=\"none\" stroke=\"rgba(0,0,0,0.1)\"/>\n",
            polygon(&ring_points)
        ));
    }

    for i in 0..n {
        let (x, y) = axis_point(i, n, SCALE_MAX, cx, cy, radius);
        svg.push_str(&format!(
            "  <line x1=\"{cx:.1}\" y1=\"{cy:.1}\" x2=\"{x:.1}\" y2=\"{y:.1}\" stroke=\"rgba(0,0,0,0.1)\"/>\n"
        ));
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| axis_point(i, n, f64::from(p.percentage), cx, cy, radius))
        .collect();
    svg.push_str(&format!(
        "  <polygon class=\"data\" points=\"{}\" fill=\"rgba(255,105,180,0.2)\" stroke=\"rgba(255,105,180,1)\" stroke-width=\"2\"/>\n",
        polygon(&data)
    ));
    for ((x, y), p) in data.iter().zip(points) {
        svg.push_str(&format!(
            "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"rgba(255,105,180,1)\" stroke=\"#fff\"><title>{}: {}%</title></circle>\n",
            html_escape(&p.label),
            p.percentage
        ));
    }

    for (i, p) in points.iter().enumerate() {
        let (x, y) = axis_point(i, n, SCALE_MAX, cx, cy, radius + LABEL_GAP);
        let anchor = if (x - cx).abs() < 1.0 {
            "middle"
        } else if x > cx {
            "start"
        } else {
            "end"
        };
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\" fill=\"currentColor\">{} {}</text>\n",
            html_escape(&p.emoji),
            html_escape(&p.label)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptitude_core::Category;

    fn point(category: Category, percentage: u32) -> RadarPoint {
        RadarPoint {
            category,
            label: category.to_string(),
            emoji: "*".into(),
            percentage,
        }
    }

    #[test]
    fn first_axis_points_up() {
        let (x, y) = axis_point(0, 8, 100.0, 100.0, 100.0, 50.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn values_are_clamped_to_scale() {
        let inside = axis_point(2, 4, 150.0, 0.0, 0.0, 10.0);
        let edge = axis_point(2, 4, 100.0, 0.0, 0.0, 10.0);
        assert!((inside.0 - edge.0).abs() < 1e-9);
        assert!((inside.1 - edge.1).abs() < 1e-9);
    }

    #[test]
    fn chart_has_five_rings_and_labels() {
        let points: Vec<RadarPoint> = Category::ALL
            .iter()
            .map(|c| point(*c, 50))
            .collect();
        let svg = radar_svg(&points, 400);
        assert_eq!(svg.matches("fill=\"none\"").count(), 5);
        assert_eq!(svg.matches("<line").count(), 8);
        assert!(svg.contains("naturalist"));
        assert!(svg.contains("class=\"data\""));
    }

    #[test]
    fn empty_chart_is_valid_svg() {
        let svg = radar_svg(&[], 200);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
