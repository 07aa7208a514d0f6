// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_source;
pub mod http_response;
pub mod http_surface;
pub mod svg_renderer;
