//! Request handling: upload → resize → classify + caption → optional
//! external identification → JSON.

pub mod context;
pub mod handler;
pub mod resize;
pub mod response;
pub mod upload;

pub use context::AppContext;
pub use handler::{identify, model_info, test_local};
pub use response::{BaseResponse, CnnInfo, ErrorResponse, IdentifyResponse, ModelInfoResponse, TestLocalResponse};
pub use upload::{Upload, UploadError};
