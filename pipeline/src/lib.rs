#![cfg_attr(not(test), no_std)]

mod config;
pub use config::*;
mod duty;
pub use duty::*;
mod error;
pub use error::*;
mod frame;
pub use frame::*;
mod link;
pub use link::*;
mod state;
pub use state::*;
mod transform;
pub use transform::*;
