// Application layer - Use cases and the seams they depend on
pub mod analyzer_service;
pub mod chart_surface;
pub mod sample_source;
