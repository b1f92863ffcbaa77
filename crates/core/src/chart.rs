//! Dual-axis resource chart: CPU percent and memory over elapsed time
//!
//! Rendering is a pure function from samples (plus the current hover point)
//! to a list of [`DrawCommand`]s. Every call starts with [`DrawCommand::Clear`]
//! and redraws the whole surface; backends (see [`crate::svg`]) only blit.
//!
//! Layout of the default 800x300 surface:
//!
//! ```text
//!   legend ──> ■ CPU Usage  ■ Memory Usage
//!  100% ┤                                   ├ 55.0 MiB
//!       │   CPU (left scale, fixed 0-100)   │
//!    0% ┼───┬───────┬───────┬───────┬───────┤ 0.0 MiB
//!       0s                                 Ns
//! ```

use crate::data::Sample;

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 300.0;

/// Maximum pointer distance, in surface pixels, for a hover hit
pub const HOVER_THRESHOLD_PX: f64 = 20.0;

pub const CPU_COLOR: &str = "#E11D48";
pub const MEMORY_COLOR: &str = "#2563EB";
pub const AXIS_COLOR: &str = "#cccccc";
pub const GRID_COLOR: &str = "#eeeeee";
pub const LABEL_COLOR: &str = "#666666";
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Headroom above the observed memory peak
const MEMORY_HEADROOM: f64 = 1.1;
const TIME_TICKS: usize = 5;
/// Y labels at 0%, 20%, ... 100% of each scale
const Y_LABEL_STEPS: usize = 5;
const POINT_RADIUS: f64 = 3.0;
const HOVER_RADIUS: f64 = 5.0;
const LINE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Fixed-size drawing surface in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSurface {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for ChartSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    pub fn plot_left(&self) -> f64 {
        self.padding.left
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.padding.right
    }

    pub fn plot_top(&self) -> f64 {
        self.padding.top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.height - self.padding.bottom
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Convert a pointer x measured on a scaled element back to surface pixels
    pub fn surface_x(&self, element_x: f64, element_width: f64) -> f64 {
        if element_width > 0.0 {
            element_x * self.width / element_width
        } else {
            element_x
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear { width: f64, height: f64 },
    Line {
        from: Point,
        to: Point,
        color: &'static str,
        width: f64,
        dashed: bool,
    },
    Polyline {
        points: Vec<Point>,
        color: &'static str,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: &'static str,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: &'static str,
    },
    Text {
        position: Point,
        text: String,
        color: &'static str,
        anchor: TextAnchor,
        font_size: f64,
    },
}

/// One sample on the elapsed-time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// Seconds since the first sample
    pub elapsed: f64,
    pub cpu: f64,
    pub mem: f64,
}

/// Samples projected onto the elapsed-time axis, plus axis extents
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    points: Vec<ChartPoint>,
    max_elapsed: f64,
    max_mem: f64,
}

impl ChartData {
    /// Elapsed time is measured from the first sample; order is trusted, not sorted
    pub fn from_samples(samples: &[Sample]) -> Self {
        let start = samples.first().map(|s| s.time).unwrap_or(0.0);

        let points: Vec<ChartPoint> = samples
            .iter()
            .map(|s| ChartPoint {
                elapsed: s.time - start,
                cpu: s.cpu_percent(),
                mem: s.mem_usage_mib,
            })
            .collect();

        let max_elapsed = finite_max(points.iter().map(|p| p.elapsed));
        let max_mem = finite_max(points.iter().map(|p| p.mem));

        Self {
            points,
            max_elapsed,
            max_mem,
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn elapsed(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.elapsed).collect()
    }

    pub fn cpu_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cpu).collect()
    }

    pub fn mem_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mem).collect()
    }

    /// Upper bound of the time axis, in seconds
    pub fn max_elapsed(&self) -> f64 {
        self.max_elapsed
    }

    /// Upper bound of the memory axis: observed peak plus headroom
    pub fn memory_range(&self) -> f64 {
        if self.max_mem > 0.0 {
            self.max_mem * MEMORY_HEADROOM
        } else {
            1.0
        }
    }

    /// No samples, or every sample at the same instant
    pub fn is_degenerate(&self) -> bool {
        self.points.is_empty() || self.max_elapsed <= 0.0
    }
}

/// Largest finite value, 0 when there is none
fn finite_max(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

/// Data-to-pixel mapping; only exists for non-degenerate data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScale {
    surface: ChartSurface,
    max_elapsed: f64,
    memory_range: f64,
}

impl ChartScale {
    pub fn new(surface: ChartSurface, data: &ChartData) -> Option<Self> {
        if data.is_degenerate() {
            return None;
        }
        Some(Self {
            surface,
            max_elapsed: data.max_elapsed(),
            memory_range: data.memory_range(),
        })
    }

    pub fn x(&self, elapsed: f64) -> f64 {
        self.surface.plot_left() + (elapsed / self.max_elapsed) * self.surface.plot_width()
    }

    /// Inverse of [`ChartScale::x`]
    pub fn elapsed_at(&self, x: f64) -> f64 {
        (x - self.surface.plot_left()) / self.surface.plot_width() * self.max_elapsed
    }

    pub fn y_cpu(&self, cpu: f64) -> f64 {
        self.surface.plot_bottom() - (cpu / 100.0) * self.surface.plot_height()
    }

    pub fn y_mem(&self, mem: f64) -> f64 {
        self.surface.plot_bottom() - (mem / self.memory_range) * self.surface.plot_height()
    }
}

/// Sample under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverPoint {
    pub index: usize,
    pub elapsed: f64,
    pub cpu: f64,
    pub mem: f64,
    /// Elapsed time under the pointer itself
    pub pointer_elapsed: f64,
}

/// Nearest sample to a pointer x position (surface pixels), if within
/// [`HOVER_THRESHOLD_PX`]. Linear scan; sample counts stay in the hundreds.
pub fn hover_at(surface: &ChartSurface, samples: &[Sample], pointer_x: f64) -> Option<HoverPoint> {
    if !pointer_x.is_finite() {
        return None;
    }
    let data = ChartData::from_samples(samples);
    let scale = ChartScale::new(*surface, &data)?;
    let pointer_elapsed = scale.elapsed_at(pointer_x);

    let mut closest: Option<(usize, f64)> = None;
    for (index, point) in data.points().iter().enumerate() {
        let x = scale.x(point.elapsed);
        if !x.is_finite() {
            continue;
        }
        let distance = (pointer_x - x).abs();
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((index, distance));
        }
    }

    let (index, distance) = closest?;
    if distance >= HOVER_THRESHOLD_PX {
        return None;
    }

    let point = data.points()[index];
    Some(HoverPoint {
        index,
        elapsed: point.elapsed,
        cpu: point.cpu,
        mem: point.mem,
        pointer_elapsed,
    })
}

/// Draw the chart for `samples`. Empty input yields only a clear.
pub fn render(surface: &ChartSurface, samples: &[Sample], hover: Option<&HoverPoint>) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        width: surface.width,
        height: surface.height,
    }];

    let data = ChartData::from_samples(samples);
    if data.is_empty() {
        return commands;
    }

    draw_axes(surface, &mut commands);

    if let Some(scale) = ChartScale::new(*surface, &data) {
        draw_time_grid(surface, &scale, data.max_elapsed(), &mut commands);
        draw_value_labels(surface, &scale, data.memory_range(), &mut commands);

        let cpu_points: Vec<Point> = data
            .points()
            .iter()
            .map(|p| Point::new(scale.x(p.elapsed), scale.y_cpu(p.cpu)))
            .filter(Point::is_finite)
            .collect();
        let mem_points: Vec<Point> = data
            .points()
            .iter()
            .map(|p| Point::new(scale.x(p.elapsed), scale.y_mem(p.mem)))
            .filter(Point::is_finite)
            .collect();

        draw_series(cpu_points, CPU_COLOR, &mut commands);
        draw_series(mem_points, MEMORY_COLOR, &mut commands);

        if let Some(hover) = hover.filter(|h| h.index < data.points().len()) {
            draw_hover_marker(surface, &scale, hover, &mut commands);
        }
    }

    draw_legend(surface, &mut commands);
    commands
}

fn draw_axes(surface: &ChartSurface, commands: &mut Vec<DrawCommand>) {
    let origin = Point::new(surface.plot_left(), surface.plot_bottom());

    commands.push(DrawCommand::Line {
        from: origin,
        to: Point::new(surface.plot_right(), surface.plot_bottom()),
        color: AXIS_COLOR,
        width: 1.0,
        dashed: false,
    });
    commands.push(DrawCommand::Line {
        from: Point::new(surface.plot_left(), surface.plot_top()),
        to: origin,
        color: AXIS_COLOR,
        width: 1.0,
        dashed: false,
    });
}

fn draw_time_grid(
    surface: &ChartSurface,
    scale: &ChartScale,
    max_elapsed: f64,
    commands: &mut Vec<DrawCommand>,
) {
    for i in 0..TIME_TICKS {
        let t = max_elapsed * (i as f64 / (TIME_TICKS - 1) as f64);
        let x = scale.x(t);

        commands.push(DrawCommand::Line {
            from: Point::new(x, surface.plot_bottom()),
            to: Point::new(x, surface.plot_top()),
            color: GRID_COLOR,
            width: 1.0,
            dashed: false,
        });
        commands.push(DrawCommand::Text {
            position: Point::new(x, surface.plot_bottom() + 15.0),
            text: format_seconds(t, max_elapsed),
            color: LABEL_COLOR,
            anchor: TextAnchor::Middle,
            font_size: 10.0,
        });
    }
}

fn draw_value_labels(
    surface: &ChartSurface,
    scale: &ChartScale,
    memory_range: f64,
    commands: &mut Vec<DrawCommand>,
) {
    for i in 0..=Y_LABEL_STEPS {
        let fraction = i as f64 / Y_LABEL_STEPS as f64;

        let cpu = 100.0 * fraction;
        commands.push(DrawCommand::Text {
            position: Point::new(surface.plot_left() - 10.0, scale.y_cpu(cpu) + 3.0),
            text: format!("{:.0}%", cpu),
            color: CPU_COLOR,
            anchor: TextAnchor::End,
            font_size: 10.0,
        });

        let mem = memory_range * fraction;
        commands.push(DrawCommand::Text {
            position: Point::new(surface.plot_right() + 10.0, scale.y_mem(mem) + 3.0),
            text: format!("{:.1} MiB", mem),
            color: MEMORY_COLOR,
            anchor: TextAnchor::Start,
            font_size: 10.0,
        });
    }
}

fn draw_series(points: Vec<Point>, color: &'static str, commands: &mut Vec<DrawCommand>) {
    if points.is_empty() {
        return;
    }

    let markers: Vec<DrawCommand> = points
        .iter()
        .map(|&center| DrawCommand::Circle {
            center,
            radius: POINT_RADIUS,
            color,
        })
        .collect();

    commands.push(DrawCommand::Polyline {
        points,
        color,
        width: LINE_WIDTH,
    });
    commands.extend(markers);
}

fn draw_hover_marker(
    surface: &ChartSurface,
    scale: &ChartScale,
    hover: &HoverPoint,
    commands: &mut Vec<DrawCommand>,
) {
    let x = scale.x(hover.elapsed);
    if !x.is_finite() {
        return;
    }

    commands.push(DrawCommand::Line {
        from: Point::new(x, surface.plot_top()),
        to: Point::new(x, surface.plot_bottom()),
        color: LABEL_COLOR,
        width: 1.0,
        dashed: true,
    });

    for (center, color) in [
        (Point::new(x, scale.y_cpu(hover.cpu)), CPU_COLOR),
        (Point::new(x, scale.y_mem(hover.mem)), MEMORY_COLOR),
    ] {
        if center.is_finite() {
            commands.push(DrawCommand::Circle {
                center,
                radius: HOVER_RADIUS,
                color,
            });
        }
    }
}

fn draw_legend(surface: &ChartSurface, commands: &mut Vec<DrawCommand>) {
    let top = surface.plot_top();
    let left = surface.plot_left();

    for (offset, label, color) in [(0.0, "CPU Usage", CPU_COLOR), (100.0, "Memory Usage", MEMORY_COLOR)] {
        commands.push(DrawCommand::Rect {
            origin: Point::new(left + offset, top - 15.0),
            width: 12.0,
            height: 12.0,
            color,
        });
        commands.push(DrawCommand::Text {
            position: Point::new(left + offset + 18.0, top - 5.0),
            text: label.to_string(),
            color,
            anchor: TextAnchor::Start,
            font_size: 12.0,
        });
    }
}

/// Tick label; short runs get one decimal so ticks stay distinct
fn format_seconds(t: f64, max_elapsed: f64) -> String {
    if max_elapsed >= 10.0 {
        format!("{:.0}s", t)
    } else {
        format!("{:.1}s", t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(100.0, "10.0%", 50.0),
            Sample::new(101.0, "20.0%", 55.0),
            Sample::new(102.0, "15.0%", 52.0),
        ]
    }

    fn polylines(commands: &[DrawCommand]) -> Vec<&DrawCommand> {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .collect()
    }

    #[test]
    fn test_empty_samples_only_clear() {
        let surface = ChartSurface::default();
        let commands = render(&surface, &[], None);

        assert_eq!(
            commands,
            vec![DrawCommand::Clear {
                width: 800.0,
                height: 300.0
            }]
        );
        assert!(hover_at(&surface, &[], 100.0).is_none());
    }

    #[test]
    fn test_single_sample_skips_series() {
        let surface = ChartSurface::default();
        let one = vec![Sample::new(100.0, "50%", 10.0)];

        let commands = render(&surface, &one, None);

        assert!(polylines(&commands).is_empty());
        assert!(commands.iter().all(|c| !matches!(c, DrawCommand::Circle { .. })));
        assert!(hover_at(&surface, &one, surface.plot_left()).is_none());
    }

    #[test]
    fn test_same_timestamp_is_degenerate() {
        let same = vec![Sample::new(5.0, "1%", 1.0), Sample::new(5.0, "2%", 2.0)];
        assert!(ChartData::from_samples(&same).is_degenerate());
        assert!(polylines(&render(&ChartSurface::default(), &same, None)).is_empty());
    }

    #[test]
    fn test_elapsed_and_ranges() {
        let data = ChartData::from_samples(&samples());

        assert_eq!(data.elapsed(), vec![0.0, 1.0, 2.0]);
        assert_eq!(data.cpu_values(), vec![10.0, 20.0, 15.0]);
        assert_eq!(data.max_elapsed(), 2.0);
        assert!((data.memory_range() - 60.5).abs() < 1e-9);
    }

    #[test]
    fn test_scale_maps_plot_corners() {
        let surface = ChartSurface::default();
        let data = ChartData::from_samples(&samples());
        let scale = ChartScale::new(surface, &data).unwrap();

        assert_eq!(scale.x(0.0), 50.0);
        assert_eq!(scale.x(2.0), 780.0);
        assert_eq!(scale.y_cpu(0.0), 270.0);
        assert_eq!(scale.y_cpu(100.0), 20.0);
        assert!((scale.elapsed_at(scale.x(1.3)) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_render_draws_two_series() {
        let commands = render(&ChartSurface::default(), &samples(), None);
        let lines = polylines(&commands);

        assert_eq!(commands[0], DrawCommand::Clear { width: 800.0, height: 300.0 });
        assert_eq!(lines.len(), 2);
        match lines[0] {
            DrawCommand::Polyline { points, color, .. } => {
                assert_eq!(*color, CPU_COLOR);
                assert_eq!(points.len(), 3);
                assert_eq!(points[0], Point::new(50.0, 245.0));
            }
            _ => unreachable!(),
        }

        let labels: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&"0%"));
        assert!(labels.contains(&"100%"));
        assert!(labels.contains(&"60.5 MiB"));
        assert!(labels.contains(&"2.0s"));
        assert!(labels.contains(&"Memory Usage"));
    }

    #[test]
    fn test_hover_exactly_over_sample() {
        let surface = ChartSurface::default();
        let hover = hover_at(&surface, &samples(), 415.0).unwrap();

        assert_eq!(hover.index, 1);
        assert_eq!(hover.cpu, 20.0);
        assert_eq!(hover.mem, 55.0);
        assert_eq!(hover.elapsed, 1.0);
    }

    #[test]
    fn test_hover_threshold() {
        let surface = ChartSurface::default();

        assert_eq!(hover_at(&surface, &samples(), 434.0).map(|h| h.index), Some(1));
        assert!(hover_at(&surface, &samples(), 436.0).is_none());
        assert!(hover_at(&surface, &samples(), -500.0).is_none());
    }

    #[test]
    fn test_hover_ignores_non_finite_pointer() {
        let surface = ChartSurface::default();

        assert!(hover_at(&surface, &samples(), f64::NAN).is_none());
        assert!(hover_at(&surface, &samples(), f64::INFINITY).is_none());
    }

    #[test]
    fn test_hover_marker_rendered() {
        let surface = ChartSurface::default();
        let hover = hover_at(&surface, &samples(), 780.0).unwrap();
        let commands = render(&surface, &samples(), Some(&hover));

        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { dashed: true, .. })));
    }

    #[test]
    fn test_non_finite_values_skipped() {
        let samples = vec![
            Sample::new(0.0, "10%", 5.0),
            Sample::new(1.0, "garbage", f64::NAN),
            Sample::new(2.0, "30%", f64::INFINITY),
            Sample::new(3.0, "40%", 8.0),
        ];

        let data = ChartData::from_samples(&samples);
        assert!((data.memory_range() - 8.8).abs() < 1e-9);

        let commands = render(&ChartSurface::default(), &samples, None);
        for line in polylines(&commands) {
            if let DrawCommand::Polyline { points, .. } = line {
                assert_eq!(points.len(), 3);
                assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            }
        }
    }

    #[test]
    fn test_zero_memory_does_not_divide_by_zero() {
        let samples = vec![Sample::new(0.0, "1%", 0.0), Sample::new(1.0, "2%", 0.0)];
        let commands = render(&ChartSurface::default(), &samples, None);

        assert_eq!(polylines(&commands).len(), 2);
    }

    #[test]
    fn test_surface_x_scaling() {
        let surface = ChartSurface::default();
        assert_eq!(surface.surface_x(200.0, 400.0), 400.0);
        assert_eq!(surface.surface_x(200.0, 0.0), 200.0);
    }
}
