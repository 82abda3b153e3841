pub mod file_names;
pub mod mime_types;
pub mod valid_id;
