pub mod health_handlers;
pub mod track_handlers;
pub mod visit_handlers;
