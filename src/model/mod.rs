//! Pure data structures: menu, orders and the events that move them along.

pub mod event;
pub mod menu;
pub mod order;

pub use event::*;
pub use menu::*;
pub use order::*;
