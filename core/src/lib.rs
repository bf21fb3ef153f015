#![no_std]

extern crate alloc;

pub use error::*;
pub use flood::*;
pub use host::*;
pub use revflood::*;
pub use rules::*;
pub use session::*;
pub use tile::*;
pub use trigger::*;
pub use types::*;

pub mod memory;

mod error;
mod flood;
mod host;
mod revflood;
mod rules;
mod session;
mod tile;
mod trigger;
mod types;
