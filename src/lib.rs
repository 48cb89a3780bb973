#[allow(non_snake_case)]
pub mod Clusters;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Flux;
#[allow(non_snake_case)]
pub mod ReactionNetwork;
#[allow(non_snake_case)]
pub mod Reactions;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
