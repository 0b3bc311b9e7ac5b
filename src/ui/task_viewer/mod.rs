pub mod app;
pub mod editor;
pub mod model;
pub mod style;
pub mod view;

pub use app::run;
