pub mod query_data_set;
pub mod validate_query;

pub use query_data_set::QueryDataSetError;
