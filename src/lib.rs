pub mod apps;
pub mod cli;
pub mod client;
pub mod model;
pub mod reporting;
pub mod upload;
pub mod users;
pub mod util;

pub use client::{AppStoreConnectClient, Config};
pub use upload::{
    UploadError, UploadOperation, UploadOperationError, UploadOperationHeader, UploadOperations,
};
pub use util::{pretty_state, resource_id, resource_name};
