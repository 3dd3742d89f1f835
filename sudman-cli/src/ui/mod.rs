pub mod theme;

mod render;

pub use render::draw;
