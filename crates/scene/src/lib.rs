pub mod components;
pub mod config;
pub mod entity;
pub mod globe_scene;
pub mod hover;
pub mod picking;
pub mod prefabs;
pub mod world;

pub use config::*;
pub use globe_scene::*;
pub use world::*;
