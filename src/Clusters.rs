/// reactant capability set: species, bounds, individual clusters and the arena element type
pub mod cluster;
/// super-cluster geometry, membership, aggregated lists and diagnostics
pub mod super_cluster;
mod super_cluster_tests;
mod cluster_tests;
