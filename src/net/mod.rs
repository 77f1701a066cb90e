//! Network layer.
//!
//! Plain TCP listeners come straight from Tokio; this module only adds
//! optional TLS termination for the listener.

pub mod tls;
