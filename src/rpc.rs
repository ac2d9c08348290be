//! RPC module.
//!
//! Request building, response decoding, context settings and the transport
//! seam.

pub use battery_rpc::*;
