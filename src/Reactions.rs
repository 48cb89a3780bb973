/// production and dissociation descriptors with per grid point rates
pub mod reaction;
/// aggregated reaction lists, coefficient tensors and the builder-scoped key maps
pub mod effective_lists;
/// closed-form first and second order sums over integer ranges
pub mod moment_sums;
/// explicit, pending and overlap coefficient increments
pub mod coefficients;
mod coefficients_tests;
