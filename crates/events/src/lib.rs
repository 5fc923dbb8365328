//! Domain events and the helpers that run commands into them.

mod event;
mod handler;
mod projection;

pub use event::Event;
pub use handler::execute;
pub use projection::Projection;
