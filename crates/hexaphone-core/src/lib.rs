pub mod audio;
pub mod board;
pub mod broadcast;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod music;
pub mod render;
pub mod signal;
pub mod timbre;

pub use audio::*;
pub use board::*;
pub use broadcast::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use hit::*;
pub use input::*;
pub use layout::*;
pub use music::*;
pub use render::*;
pub use signal::*;
pub use timbre::*;
