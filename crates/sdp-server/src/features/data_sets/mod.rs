pub mod executor;
pub mod queries;
pub mod routes;

pub use executor::{
    DataSetQueryExecutor, DataSetQueryResponse, ExecutorError, PagingViewModel, SharedExecutor,
    UnconfiguredExecutor,
};
pub use queries::QueryDataSetError;

pub use routes::data_sets_routes;
