// shop-backend/src/types/mod.rs

pub mod pagination;
pub mod query;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationMeta};
pub use query::SortOrder;
pub use response::ApiResponse;
