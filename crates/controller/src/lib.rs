pub mod restart;
pub mod state_machine;

pub use restart::requires_restart;
pub use state_machine::{IndexerStateMachine, TransitionError};
