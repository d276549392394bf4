//! Multipart batch wire format (多部分批处理编解码).
//!
//! [`request`] encodes N sub-requests into one `multipart/mixed` body; [`parser`] splits
//! the provider's `multipart/mixed` answer back into N embedded HTTP responses.

pub mod parser;
pub mod request;

pub use parser::{boundary_from_content_type, is_multipart, parse_batch_body, BatchPart};
pub use request::MultipartBatchRequest;
