/// error type shared by the builder, the coefficient synthesizer, evaluation and loading
pub mod network_error;
/// frozen network: arena, reaction tables, evaluation and diagnostics entry points
pub mod network;
/// construction phase: arena filling, aggregated lists, coefficient recording
pub mod builder;
/// serde description of a network, replayed through the builder
pub mod description;
