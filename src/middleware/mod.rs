pub mod caller;
pub mod request_id;

pub use caller::{CallerId, USER_ID_HEADER};
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId};
