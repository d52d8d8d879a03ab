mod assets;
mod camera;
mod car;
mod car_config;
mod car_state;
mod frame_stats;
mod hud;
mod input_state;
mod lap_timer;
mod observer;
mod pose;
mod projectile;
mod session;
mod track;

pub use assets::*;
pub use camera::*;
pub use car::*;
pub use car_config::*;
pub use car_state::*;
pub use frame_stats::*;
pub use hud::*;
pub use input_state::*;
pub use lap_timer::*;
pub use observer::*;
pub use pose::*;
pub use projectile::*;
pub use session::*;
pub use track::*;
