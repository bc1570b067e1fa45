//! Cache Module
//!
//! Instrumented key-value cache: scalar storage under generated keys, call
//! counting, call history and replay.

mod instrument;
mod replay;
mod scalar;
mod service;


// Re-export public types
pub use instrument::{inputs_key, outputs_key, Hook, Instrumented};
pub use replay::{print_replay, replay, CallReplay, OperationHandle, ReplayEntry};
pub use scalar::{decode_float, decode_int, decode_text, render_args, Conversion, Scalar, Value};
pub use service::{Cache, STORE_OPERATION};
