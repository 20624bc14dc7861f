//! Task service client: REST adapter plus a locally filtered task board.
//!
//! [`HttpTaskApi`] talks to the server; [`TaskBoard`] holds the last fetched
//! [`TaskSnapshot`] and re-projects it through [`ViewState`] whenever the
//! user changes filters or sort order.

pub mod api;
pub mod board;
pub mod error;
pub mod http;

pub use api::TaskApi;
pub use board::{TaskBoard, TaskSnapshot, ViewState};
pub use error::ClientError;
pub use http::{HttpTaskApi, LoginSession};
