pub mod forecast;
pub mod render;
pub mod serve;

pub use forecast::forecast;
pub use render::render;
pub use serve::serve;
