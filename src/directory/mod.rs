//! Directory rules shared by the user and employee collections.
//!
//! Everything here is side-effect free; the repository and handlers apply it.

mod authorization;
mod mirror;
mod roles;

pub use authorization::*;
pub use mirror::*;
pub use roles::*;
