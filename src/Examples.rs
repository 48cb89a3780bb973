/// demo He-V network with overlap-derived coefficients
pub mod network_examples;
