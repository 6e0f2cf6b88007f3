pub mod api_response;
pub mod import_dto;
pub mod query_dto;

pub use api_response::ApiResponse;
