// Resource-allocation model
// Allocation/max/available matrices, derived need, validation

pub mod resource_state;
pub mod types;
pub mod validation;

pub use resource_state::*;
pub use types::*;
pub use validation::*;
