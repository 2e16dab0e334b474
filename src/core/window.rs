pub const RANGE_TO_ALTITUDE_RATIO: f64 = 2.0; // x:y data window ratio

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// Visible data extents in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWindow {
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisWindow {
    pub fn x_range(&self) -> std::ops::Range<f64> {
        0.0..self.x_max
    }

    pub fn y_range(&self) -> std::ops::Range<f64> {
        self.y_min..self.y_max
    }
}

/// Pads both spans, then widens whichever is too short to keep the ratio.
pub fn fixed_ratio_spans(raw_max_x: f64, raw_max_y: f64) -> (f64, f64) {
    let x_pad = raw_max_x.max(1.0) * X_PADDING_RATIO;
    let y_pad = raw_max_y.max(1.0) * Y_PADDING_RATIO;

    let mut x_span = (raw_max_x + x_pad).max(1.0);
    let mut y_span = (raw_max_y + y_pad).max(1.0);

    if x_span / y_span < RANGE_TO_ALTITUDE_RATIO {
        x_span = y_span * RANGE_TO_ALTITUDE_RATIO;
    } else {
        y_span = x_span / RANGE_TO_ALTITUDE_RATIO;
    }

    (x_span, y_span)
}

/// Window covering every point, including the below-ground impact sample.
pub fn window_for_points<'a, I>(points: I) -> AxisWindow
where
    I: IntoIterator<Item = &'a (f64, f64)>,
{
    let (max_x, max_y, min_y) = points.into_iter().fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(max_x, max_y, min_y), &(x, y)| (max_x.max(x), max_y.max(y), min_y.min(y)),
    );
    let (x_span, y_span) = fixed_ratio_spans(max_x, max_y);
    AxisWindow {
        x_max: x_span,
        y_min: min_y * (1.0 + Y_PADDING_RATIO),
        y_max: y_span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_data_widens_x() {
        let (x, y) = fixed_ratio_spans(10.0, 100.0);
        assert!((y - 110.0).abs() < 1e-9);
        assert!((x - 220.0).abs() < 1e-9);
    }

    #[test]
    fn flat_data_raises_y() {
        let (x, y) = fixed_ratio_spans(100.0, 5.0);
        assert!((x - 106.0).abs() < 1e-9);
        assert!((y - 53.0).abs() < 1e-9);
    }

    #[test]
    fn window_keeps_impact_sample_visible() {
        let points = [(0.0, 0.0), (40.0, 20.0), (80.0, -0.5)];
        let window = window_for_points(&points);
        assert!(window.y_min < -0.5);
        assert!(window.x_max > 80.0);
        assert!(window.y_max > 20.0);
        assert!(window.x_range().contains(&80.0));
    }

    #[test]
    fn empty_input_gives_unit_window() {
        let empty: [(f64, f64); 0] = [];
        let window = window_for_points(&empty);
        assert_eq!(window.y_min, 0.0);
        assert!(window.x_max >= 1.0 && window.y_max >= 1.0);
    }
}
