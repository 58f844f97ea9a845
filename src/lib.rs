//! orderdash: order analytics and shipping labels for a small shop backend

pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
