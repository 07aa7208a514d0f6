// Domain layer - Measurement and chart models
pub mod battery;
pub mod chart;
pub mod error;
