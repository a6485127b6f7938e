//! Windowed statistics over streaming observations

mod rolling;

pub use rolling::RollingWindow;
