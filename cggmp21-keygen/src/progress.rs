//! Lightweight progress instrumentation
//!
//! A [`Tracer`] records stage transitions within a single protocol run
//! without committing callers to a logging backend (benchmarks implement it
//! directly to collect timings; production callers can bridge it to
//! `tracing` spans instead — see `cggmp21::progress`).

/// Records coarse-grained progress through a single protocol execution
pub trait Tracer {
    /// Called once, right before round 1 starts
    fn protocol_begins(&mut self) {}
    /// Called at the start of every round
    fn round_begins(&mut self) {}
    /// Called right before the party starts waiting for peer messages
    fn receive_msgs(&mut self) {}
    /// Called once all expected peer messages for the round arrived
    fn msgs_received(&mut self) {}
    /// Called right before an outgoing message is sent
    fn send_msg(&mut self) {}
    /// Called once the outgoing message was flushed to the transport
    fn msg_sent(&mut self) {}
    /// Names an arbitrary computation stage within a round (safe-prime
    /// generation, proof computation, share validation, ...)
    fn stage(&mut self, _name: &'static str) {}
    /// Called once the protocol has produced its final output
    fn protocol_ends(&mut self) {}
}

/// A [`Tracer`] that records nothing, used when no tracer is supplied
pub struct NoTracer;
impl Tracer for NoTracer {}

impl Tracer for dyn Tracer + '_ {}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn protocol_begins(&mut self) {
        (**self).protocol_begins()
    }
    fn round_begins(&mut self) {
        (**self).round_begins()
    }
    fn receive_msgs(&mut self) {
        (**self).receive_msgs()
    }
    fn msgs_received(&mut self) {
        (**self).msgs_received()
    }
    fn send_msg(&mut self) {
        (**self).send_msg()
    }
    fn msg_sent(&mut self) {
        (**self).msg_sent()
    }
    fn stage(&mut self, name: &'static str) {
        (**self).stage(name)
    }
    fn protocol_ends(&mut self) {
        (**self).protocol_ends()
    }
}

impl Tracer for Option<&mut dyn Tracer> {
    fn protocol_begins(&mut self) {
        if let Some(t) = self {
            t.protocol_begins()
        }
    }
    fn round_begins(&mut self) {
        if let Some(t) = self {
            t.round_begins()
        }
    }
    fn receive_msgs(&mut self) {
        if let Some(t) = self {
            t.receive_msgs()
        }
    }
    fn msgs_received(&mut self) {
        if let Some(t) = self {
            t.msgs_received()
        }
    }
    fn send_msg(&mut self) {
        if let Some(t) = self {
            t.send_msg()
        }
    }
    fn msg_sent(&mut self) {
        if let Some(t) = self {
            t.msg_sent()
        }
    }
    fn stage(&mut self, name: &'static str) {
        if let Some(t) = self {
            t.stage(name)
        }
    }
    fn protocol_ends(&mut self) {
        if let Some(t) = self {
            t.protocol_ends()
        }
    }
}

/// Bridges [`Tracer`] calls into `tracing` events, used by default in
/// production call sites that don't supply their own tracer.
#[derive(Default)]
pub struct TracingTracer {
    round: u16,
}

impl Tracer for TracingTracer {
    fn protocol_begins(&mut self) {
        tracing::debug!("protocol started");
    }
    fn round_begins(&mut self) {
        self.round += 1;
        tracing::debug!(round = self.round, "round started");
    }
    fn stage(&mut self, name: &'static str) {
        tracing::trace!(round = self.round, stage = name, "stage");
    }
    fn protocol_ends(&mut self) {
        tracing::debug!("protocol finished");
    }
}
