pub mod dormand_prince;
pub mod euler;
pub mod traits;

pub use dormand_prince::DormandPrince;
pub use euler::ForwardEuler;
pub use traits::{Integrator, Rhs};
