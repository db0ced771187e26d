//! Terminal presentation layer.
//!
//! - `view`: pure projection of timer state into display values
//! - `animation`: cancellable ringing pulse
//! - `ringtones`: ringtone screen cursor
//! - `render`: ratatui drawing

mod animation;
mod render;
mod ringtones;
mod styles;
mod view;

pub use animation::{PulseAnimation, FRAME_INTERVAL, PULSE_PERIOD};
pub use render::draw;
pub use ringtones::RingtoneScreen;
pub use view::TimerView;
