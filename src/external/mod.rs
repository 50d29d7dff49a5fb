// External collaborator seams. Both are narrow call/response interfaces so
// the CRUD core never couples to a vendor engine or an interop framework.

pub mod interop;
pub mod raw_query;

pub use interop::{ForwardedResponse, HttpInteropForwarder, InteropForwarder};
pub use raw_query::{RawQueryEngine, SqlQueryEngine, IRIS_QUERY};
