pub const INITIAL_WINDOW_WIDTH: i32 = 1600;
pub const INITIAL_WINDOW_HEIGHT: i32 = 900;
pub const MSAA_SAMPLES: i32 = 4;

pub const LEFT_MARGIN: f32 = 110.0;
pub const RIGHT_MARGIN: f32 = 30.0;
pub const TOP_MARGIN: f32 = 130.0;
pub const BOTTOM_MARGIN: f32 = 110.0;

pub const TITLE_Y: f32 = 44.0;
pub const CONTROLS_Y: f32 = 84.0;
pub const X_GRID_LINES: usize = 10;
pub const Y_GRID_LINES: usize = 8;
pub const VACUUM_SAMPLES: usize = 240;

pub const ANGLE_KEY_RATE_DEG: f64 = 30.0;
pub const SPEED_KEY_RATE_MPS: f64 = 20.0;
pub const CD_KEY_RATE: f64 = 0.25;
pub const MIN_ANGLE_DEG: f64 = 1.0;
pub const MAX_ANGLE_DEG: f64 = 89.0;
pub const MAX_SPEED_MPS: f64 = 300.0;
pub const MAX_DRAG_COEFFICIENT: f64 = 2.0;
