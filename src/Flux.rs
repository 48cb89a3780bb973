/// flux of a super-cluster: production, combination, dissociation, emission and the zeroth order path
pub mod super_flux;
/// Jacobian rows of a super-cluster in slot-mapped, dense and zeroth order storage
pub mod partial_derivatives;
mod flux_tests;
