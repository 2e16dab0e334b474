use macroquad::prelude::*;

use drag_ballistics::core::window::window_for_points;

use crate::ViewerArgs;
use crate::constants::{
    ANGLE_KEY_RATE_DEG, BOTTOM_MARGIN, CD_KEY_RATE, CONTROLS_Y, INITIAL_WINDOW_HEIGHT,
    INITIAL_WINDOW_WIDTH, LEFT_MARGIN, MSAA_SAMPLES, RIGHT_MARGIN, SPEED_KEY_RATE_MPS, TITLE_Y,
    TOP_MARGIN,
};
use crate::render::{
    Viewport, draw_axis_tick_labels, draw_grid, draw_path, draw_projectile, draw_ui_text,
};
use crate::state::ViewerState;

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "Drag Ballistics Viewer".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

fn key_axis(negative: KeyCode, positive: KeyCode) -> f64 {
    let mut axis = 0.0;
    if is_key_down(negative) {
        axis -= 1.0;
    }
    if is_key_down(positive) {
        axis += 1.0;
    }
    axis
}

fn handle_input(state: &mut ViewerState, frame_dt: f64) {
    if is_key_pressed(KeyCode::R) {
        state.reset();
        return;
    }
    if is_key_pressed(KeyCode::M) {
        state.toggle_method();
    }
    if is_key_pressed(KeyCode::V) {
        state.show_vacuum = !state.show_vacuum;
    }
    if is_key_pressed(KeyCode::Space) {
        if state.playing {
            state.playing = false;
        } else {
            state.playing = true;
            state.playhead = 0.0;
        }
    }

    state.adjust(
        key_axis(KeyCode::Down, KeyCode::Up) * ANGLE_KEY_RATE_DEG * frame_dt,
        key_axis(KeyCode::Left, KeyCode::Right) * SPEED_KEY_RATE_MPS * frame_dt,
        key_axis(KeyCode::Q, KeyCode::E) * CD_KEY_RATE * frame_dt,
    );
}

fn draw_hud(state: &ViewerState, left: f32, screen_h: f32) {
    let header_color = Color::from_rgba(30, 30, 35, 255);
    draw_ui_text(
        "Drag Ballistics - Trajectory Viewer",
        left,
        TITLE_Y,
        30,
        header_color,
    );
    draw_ui_text(
        "Controls: Up/Down angle | Left/Right speed | Q/E drag coefficient | M method | V vacuum path | Space replay/pause | R reset",
        left + 12.0,
        CONTROLS_Y,
        20,
        DARKGRAY,
    );

    let mut lines = vec![format!(
        "v0 = {:.1} m/s   angle = {:.1} deg   Cd = {:.2}   m = {} kg   A = {} m^2   method = {:?}",
        state.launch.speed_mps,
        state.launch.angle_deg,
        state.physics.drag_coefficient,
        state.physics.mass_kg,
        state.physics.area_m2,
        state.method,
    )];
    match (&state.trajectory, &state.last_error) {
        (Some(trajectory), _) => {
            let apex = trajectory.apex().map_or(0.0, |(_, y)| y);
            lines.push(format!(
                "range = {:.2} m   apex = {:.2} m   flight time = {:.2} s   samples = {}",
                trajectory.range_m(),
                apex,
                trajectory.flight_time_s(),
                trajectory.len()
            ));
        }
        (None, Some(err)) => lines.push(format!("Error: {err}")),
        (None, None) => {}
    }

    for (i, line) in lines.iter().enumerate() {
        draw_ui_text(
            line,
            left,
            screen_h - 44.0 + i as f32 * 24.0,
            20,
            header_color,
        );
    }
}

pub(crate) async fn run(args: ViewerArgs) {
    let mut state = ViewerState::new(args);
    tracing::info!(
        speed_mps = args.speed,
        angle_deg = args.angle,
        "viewer started"
    );

    loop {
        let frame_dt = f64::from(get_frame_time());
        let screen_w = screen_width();
        let screen_h = screen_height();

        handle_input(&mut state, frame_dt);
        state.advance(frame_dt);

        let view = Viewport {
            left: LEFT_MARGIN,
            right: screen_w - RIGHT_MARGIN,
            top: TOP_MARGIN,
            bottom: screen_h - BOTTOM_MARGIN,
            window: window_for_points(&state.visible_points()),
        };

        clear_background(Color::from_rgba(250, 251, 253, 255));
        draw_grid(&view, Color::from_rgba(227, 231, 236, 255));
        draw_axis_tick_labels(&view);

        if state.show_vacuum {
            draw_path(
                &view,
                &state.vacuum,
                2.0,
                Color::from_rgba(76, 141, 245, 140),
            );
        }
        if let Some(trajectory) = &state.trajectory {
            draw_path(
                &view,
                trajectory.points(),
                3.0,
                Color::from_rgba(54, 123, 245, 255),
            );
        }
        if let Some(position) = state.projectile_position() {
            draw_projectile(&view, position);
        }

        draw_hud(&state, LEFT_MARGIN, screen_h);

        next_frame().await;
    }
}
