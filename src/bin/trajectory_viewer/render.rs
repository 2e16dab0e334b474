use macroquad::prelude::*;

use drag_ballistics::core::window::AxisWindow;

use crate::constants::{X_GRID_LINES, Y_GRID_LINES};

/// Screen rectangle the data window is mapped onto.
#[derive(Clone, Copy)]
pub(crate) struct Viewport {
    pub(crate) left: f32,
    pub(crate) right: f32,
    pub(crate) top: f32,
    pub(crate) bottom: f32,
    pub(crate) window: AxisWindow,
}

impl Viewport {
    pub(crate) fn to_screen(&self, (x, y): (f64, f64)) -> Vec2 {
        let plot_w = (self.right - self.left).max(1.0);
        let plot_h = (self.bottom - self.top).max(1.0);
        let x_span = self.window.x_max.max(1.0) as f32;
        let y_span = (self.window.y_max - self.window.y_min).max(1.0) as f32;
        let sx = self.left + (x as f32 / x_span) * plot_w;
        let sy = self.bottom - ((y - self.window.y_min) as f32 / y_span) * plot_h;
        vec2(sx, sy)
    }
}

fn format_axis_value(value: f64, axis_max: f64) -> String {
    if axis_max >= 1000.0 {
        format!("{value:.0}")
    } else if axis_max >= 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn draw_ui_text(text: &str, x: f32, y: f32, font_size: u16, color: Color) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font_size,
            color,
            ..Default::default()
        },
    );
}

pub(crate) fn draw_grid(view: &Viewport, color: Color) {
    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let x = view.left + t * (view.right - view.left);
        draw_line(x, view.top, x, view.bottom, 1.0, color);
    }
    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = view.bottom - t * (view.bottom - view.top);
        draw_line(view.left, y, view.right, y, 1.0, color);
    }

    let ground_left = view.to_screen((0.0, 0.0));
    let ground_right = view.to_screen((view.window.x_max, 0.0));
    draw_line(
        ground_left.x,
        ground_left.y,
        ground_right.x,
        ground_right.y,
        2.0,
        DARKGRAY,
    );
    draw_line(view.left, view.top, view.left, view.bottom, 2.0, DARKGRAY);
}

pub(crate) fn draw_axis_tick_labels(view: &Viewport) {
    let label_color = Color::from_rgba(105, 113, 124, 255);
    let tick_font_size: u16 = 16;
    let window = view.window;

    for i in 0..=X_GRID_LINES {
        let t = i as f64 / X_GRID_LINES as f64;
        let value = t * window.x_max;
        let label = format_axis_value(value, window.x_max);
        let size = measure_text(&label, None, tick_font_size, 1.0);
        let x = view.left + t as f32 * (view.right - view.left);
        draw_ui_text(
            &label,
            x - (size.width * 0.5),
            view.bottom + 22.0,
            tick_font_size,
            label_color,
        );
    }

    for i in 0..=Y_GRID_LINES {
        let t = i as f64 / Y_GRID_LINES as f64;
        let value = window.y_min + t * (window.y_max - window.y_min);
        let label = format_axis_value(value, window.y_max);
        let size = measure_text(&label, None, tick_font_size, 1.0);
        let y = view.bottom - t as f32 * (view.bottom - view.top);
        draw_ui_text(
            &label,
            (view.left - 8.0) - size.width,
            y + (size.height * 0.35),
            tick_font_size,
            label_color,
        );
    }

    draw_ui_text("Range (m)", view.right - 110.0, view.bottom + 48.0, 18, label_color);
    draw_ui_text("Altitude (m)", view.left + 10.0, view.top - 8.0, 18, label_color);
}

pub(crate) fn draw_path(view: &Viewport, points: &[(f64, f64)], thickness: f32, color: Color) {
    for pair in points.windows(2) {
        let a = view.to_screen(pair[0]);
        let b = view.to_screen(pair[1]);
        draw_line(a.x, a.y, b.x, b.y, thickness, color);
    }
}

pub(crate) fn draw_projectile(view: &Viewport, position: (f64, f64)) {
    let p = view.to_screen(position);
    draw_circle(p.x, p.y, 7.0, RED);
    draw_circle_lines(p.x, p.y, 7.0, 2.0, MAROON);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_window_corners_to_viewport_corners() {
        let view = Viewport {
            left: 100.0,
            right: 500.0,
            top: 50.0,
            bottom: 250.0,
            window: AxisWindow {
                x_max: 40.0,
                y_min: -10.0,
                y_max: 10.0,
            },
        };

        assert_eq!(view.to_screen((0.0, -10.0)), vec2(100.0, 250.0));
        assert_eq!(view.to_screen((40.0, 10.0)), vec2(500.0, 50.0));
        assert_eq!(view.to_screen((20.0, 0.0)), vec2(300.0, 150.0));
    }
}
