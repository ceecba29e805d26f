//! Pipeline Latch Interface.
//!
//! Common behaviour of inter-stage registers, used by the controller's reset path.

/// Represents a pipeline latch (inter-stage buffer).
///
/// Latches hold one cycle's worth of stage output. They support flushing and
/// status checks.
pub trait PipelineLatch {
    /// Replaces the latched contents with a bubble.
    ///
    /// Called when the reset line is asserted; a flushed latch produces no
    /// downstream effect.
    fn flush(&mut self);

    /// Checks if the latch holds a bubble.
    ///
    /// # Returns
    ///
    /// `true` if no real work is latched, `false` otherwise.
    fn is_empty(&self) -> bool;
}
