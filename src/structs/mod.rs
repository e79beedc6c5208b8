pub mod summary;
pub mod track_request;
