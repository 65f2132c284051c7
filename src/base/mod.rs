//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): symbolic network error codes matching `net_error_list.h`
//! - [`AttemptError`](error::AttemptError): a failed candidate
//! - [`ConnectError`](error::ConnectError): terminal race failures
//! - [`errno_name`](errno::errno_name): symbolic OS error names

pub mod context;
pub mod errno;
pub mod error;
pub mod neterror;
