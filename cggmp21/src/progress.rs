//! Progress instrumentation
//!
//! Re-exports [`cggmp21_keygen`]'s lightweight [`Tracer`] trait so every
//! round (keygen, auxiliary, presign, signing) reports stage transitions
//! through the same interface, and adds [`TracingTracer`] which bridges
//! those calls into `tracing` spans/events for production use.

pub use cggmp21_keygen::progress::{NoTracer, Tracer, TracingTracer};
