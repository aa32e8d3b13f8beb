//! Local file request dispatcher
//!
//! A small line-delimited JSON protocol over stdin/stdout: `upload`, `list`,
//! `read` and `configure` against a workspace directory. One response line per
//! request line, errors as responses, EOF ends the loop.

mod server;
mod store;
mod types;

pub use server::{handle_request, run_stdio};
pub use store::FileStore;
pub use types::{FileEntry, Request, Response, ResponseStatus};
