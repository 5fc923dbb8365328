use crate::Event;

/// A projection builds a read model from a stream of events.
///
/// Read models are disposable: they can be dropped and rebuilt by replaying
/// the events (or the records the events produced) from the start.
///
/// `apply` must ignore events the projection does not care about.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the projection, updating the read model.
    fn apply(&mut self, event: &Self::Ev);
}
