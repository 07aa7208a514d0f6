// Presentation layer - HTTP handlers for the chart page
pub mod app_state;
pub mod handlers;
