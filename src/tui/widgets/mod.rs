//! TUI widgets

pub mod chart;
pub mod dashboard;
pub mod help;
pub mod labels;
pub mod orders;
pub mod spinner;
pub mod tabs;
