pub mod camera;
pub mod controller;
pub mod input;

pub use input::{InputState, Keys};
