// SVG chart rendering with plotters
use crate::domain::battery::TimeMode;
use crate::domain::chart::{ChartData, MarkerKind, SeriesData};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FALLBACK_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

// Headroom above and below the plotted battery range, in percentage points
const VALUE_PADDING: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn render(&self, chart: &ChartData) -> anyhow::Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE)?;

            let (t_min, t_max) = widen(chart.time_bounds().unwrap_or((0, 1)));
            let (v_min, v_max) = chart.value_bounds().unwrap_or((0.0, 100.0));

            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, ("sans-serif", 24))
                .margin(15)
                .x_label_area_size(45)
                .y_label_area_size(55)
                .build_cartesian_2d(t_min..t_max, (v_min - VALUE_PADDING)..(v_max + VALUE_PADDING))?;

            let time_mode = chart.time_mode;
            let x_formatter = move |t: &i64| format_time_tick(*t, time_mode);

            let mut mesh = ctx.configure_mesh();
            mesh.x_desc(chart.x_title.as_str())
                .y_desc(chart.y_title.as_str())
                .x_labels(8)
                .x_label_formatter(&x_formatter);
            if !chart.grid {
                mesh.disable_mesh();
            }
            mesh.draw()?;

            for (i, series) in chart.series.iter().enumerate() {
                let color = series_color(series, i);
                let points = series.points.iter().map(|p| (p.time, p.value));

                ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });

                match series.marker {
                    MarkerKind::Circle => {
                        ctx.draw_series(points.map(|p| Circle::new(p, 3, color.filled())))?;
                    }
                    MarkerKind::Cross => {
                        ctx.draw_series(points.map(|p| Cross::new(p, 4, color.stroke_width(1))))?;
                    }
                    MarkerKind::None => {}
                }
            }

            if chart.legend && !chart.series.is_empty() {
                ctx.configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .draw()?;
            }

            if let Some(annotation) = &chart.annotation {
                let style = TextStyle::from(("sans-serif", 16).into_font())
                    .pos(Pos::new(HPos::Center, VPos::Top));
                root.draw(&Text::new(
                    annotation.clone(),
                    ((self.width / 2) as i32, 50),
                    style,
                ))?;
            }

            root.present()?;
        }

        Ok(svg)
    }
}

/// plotters needs a non-empty range on each axis
fn widen((lo, hi): (i64, i64)) -> (i64, i64) {
    if lo == hi { (lo - 1, hi + 1) } else { (lo, hi) }
}

fn format_time_tick(t: i64, time_mode: TimeMode) -> String {
    match time_mode {
        TimeMode::Absolute => chrono::DateTime::<chrono::Utc>::from_timestamp_millis(t)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_default(),
        TimeMode::SyntheticIndex => t.to_string(),
    }
}

fn series_color(series: &SeriesData, index: usize) -> RGBColor {
    series
        .color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(FALLBACK_COLORS[index % FALLBACK_COLORS.len()])
}

/// Parse `#rrggbb`
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartPoint;

    fn chart(time_mode: TimeMode, annotation: Option<String>) -> ChartData {
        ChartData::new(
            "Battery Drain Comparison".to_string(),
            "Time".to_string(),
            "Battery (%)".to_string(),
            time_mode,
            vec![
                SeriesData::new(
                    "scheduler".to_string(),
                    "Scheduler Mode".to_string(),
                    Some("#1f77b4".to_string()),
                    vec![ChartPoint::new(0, 100.0), ChartPoint::new(60_000, 95.0)],
                )
                .with_marker(MarkerKind::Cross),
                SeriesData::new(
                    "non_scheduler".to_string(),
                    "Non-Scheduler Mode".to_string(),
                    None,
                    vec![ChartPoint::new(0, 100.0), ChartPoint::new(60_000, 90.0)],
                )
                .with_marker(MarkerKind::Circle),
            ],
        )
        .with_annotation(annotation)
    }

    #[test]
    fn test_render_contains_labels_and_annotation() {
        let svg = SvgRenderer::new(800, 500)
            .render(&chart(TimeMode::Absolute, Some("Battery Saved: 50.00%".to_string())))
            .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Battery Drain Comparison"));
        assert!(svg.contains("Scheduler Mode"));
        assert!(svg.contains("Non-Scheduler Mode"));
        assert!(svg.contains("Battery Saved: 50.00%"));
    }

    #[test]
    fn test_render_without_annotation() {
        let svg = SvgRenderer::new(800, 500)
            .render(&chart(TimeMode::SyntheticIndex, None))
            .unwrap();
        assert!(!svg.contains("Battery Saved"));
    }

    #[test]
    fn test_render_single_point_series() {
        let mut data = chart(TimeMode::SyntheticIndex, None);
        for series in &mut data.series {
            series.points.truncate(1);
        }
        assert!(SvgRenderer::new(400, 300).render(&data).is_ok());
    }

    #[test]
    fn test_format_time_tick() {
        assert_eq!(format_time_tick(3_723_000, TimeMode::Absolute), "01:02:03");
        assert_eq!(format_time_tick(42, TimeMode::SyntheticIndex), "42");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff7f0e"), Some(RGBColor(255, 127, 14)));
        assert_eq!(parse_hex_color("ff7f0e"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_widen() {
        assert_eq!(widen((5, 5)), (4, 6));
        assert_eq!(widen((0, 10)), (0, 10));
    }
}
