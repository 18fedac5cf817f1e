pub mod frame;
pub mod main;
pub mod splitter;
pub mod stream;

pub use frame::*;
pub use main::*;
pub use splitter::*;
pub use stream::*;
