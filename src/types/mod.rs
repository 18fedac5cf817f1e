pub mod events;
pub mod message;

pub use events::*;
pub use message::*;
