pub mod sentinel;
pub mod stage;
pub mod state;

pub use stage::*;
pub use state::*;
