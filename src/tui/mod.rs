//! Interactive terminal dashboard

pub mod app;
pub mod charts;
pub mod theme;
pub mod widgets;

pub use app::run;
pub use widgets::tabs::Section;
