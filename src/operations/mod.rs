pub mod export;
pub mod form;
pub mod import;
pub mod summary;
