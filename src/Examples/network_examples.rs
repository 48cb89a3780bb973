//! Demo He-V network used by the binary and by the evaluation tests.
//!
//! Arena layout: `He_1`, `V_1`, `I_1`, then three dense groups
//! - G1: He 2..4, V 2..4
//! - G2: He 4..6, V 2..4
//! - G3: He 2..4, V 3..5
//!
//! Reactions (all coefficients from the overlap formulas):
//! - P0: G1 + He_1 -> G2
//! - P1: G1 + V_1 -> G3
//! - P2: G2 + I_1 -> G1
//! - D0: G2 -> G1 + He_1
//! - D1: G3 -> G1 + V_1

use crate::Clusters::cluster::{Reactant, SingleCluster, Species};
use crate::Clusters::super_cluster::SuperCluster;
use crate::ReactionNetwork::builder::NetworkBuilder;
use crate::ReactionNetwork::network::ReactionNetwork;
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::reaction::{DissociationReaction, ProductionReaction};
use crate::settings::{MomentConfig, NetworkSettings};
use log::info;

pub const HE1: usize = 0;
pub const V1: usize = 1;
pub const I1: usize = 2;
pub const G1: usize = 3;
pub const G2: usize = 4;
pub const G3: usize = 5;

/// rate of reaction `n` at grid point `xi`
fn demo_rates(n: usize, grid_points: usize) -> Vec<f64> {
    (0..grid_points)
        .map(|xi| 1.0 + 0.25 * n as f64 + 0.5 * xi as f64)
        .collect()
}

pub fn he_v_network(moments: MomentConfig, grid_points: usize) -> Result<ReactionNetwork, NetworkError> {
    let mut builder = NetworkBuilder::new(NetworkSettings::new(moments, grid_points))?;
    builder.add_cluster(SingleCluster::helium(1));
    builder.add_cluster(SingleCluster::vacancy(1));
    builder.add_cluster(SingleCluster::interstitial(1));
    builder.add_super_cluster(SuperCluster::rectangle([2, 0, 0, 2], [4, 0, 0, 4])?)?;
    builder.add_super_cluster(SuperCluster::rectangle([4, 0, 0, 2], [6, 0, 0, 4])?)?;
    builder.add_super_cluster(SuperCluster::rectangle([2, 0, 0, 3], [4, 0, 0, 5])?)?;

    let p0 = builder.add_production_reaction(ProductionReaction::new(G1, HE1, demo_rates(0, grid_points)))?;
    let p1 = builder.add_production_reaction(ProductionReaction::new(G1, V1, demo_rates(1, grid_points)))?;
    let p2 = builder.add_production_reaction(ProductionReaction::new(G2, I1, demo_rates(2, grid_points)))?;
    let d0 = builder.add_dissociation_reaction(DissociationReaction::new(
        G2,
        G1,
        HE1,
        demo_rates(3, grid_points),
    ))?;
    let d1 = builder.add_dissociation_reaction(DissociationReaction::new(
        G3,
        G1,
        V1,
        demo_rates(4, grid_points),
    ))?;

    builder.result_from_overlap(G2, p0)?;
    builder.participate_in_overlap(G1, p0, G2)?;
    builder.result_from_overlap(G3, p1)?;
    builder.participate_in_overlap(G1, p1, G3)?;
    builder.result_from_overlap(G1, p2)?;
    builder.participate_in_overlap(G2, p2, G1)?;

    builder.participate_in_dissociation_overlap(G1, d0)?;
    builder.emit_from_overlap(G2, d0)?;
    builder.participate_in_dissociation_overlap(G1, d1)?;
    builder.emit_from_overlap(G3, d1)?;

    builder.finish()
}

/// smooth positive state, distinct in every unknown
pub fn demo_state(dof: usize) -> Vec<f64> {
    (0..dof).map(|k| 0.2 + 0.13 * k as f64 + 0.01 * (k * k) as f64).collect()
}

pub fn network_examples(task: usize) {
    match task {
        0 => {
            // fluxes of the super-clusters across the grid, He and V moments tracked
            let moments = match MomentConfig::new(vec![Species::He, Species::V]) {
                Ok(m) => m,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let network = match he_v_network(moments, 3) {
                Ok(n) => n,
                Err(e) => {
                    println!("failed to build the demo network: {}", e);
                    return;
                }
            };
            network.print_summary_table();
            let concs = demo_state(network.dof());
            for xi in 0..network.grid_points() {
                for sc in network.super_clusters() {
                    match network.super_cluster_flux(sc.id(), &concs, xi) {
                        Ok(flux) => println!(
                            "xi = {}, {}: flux {:.6e}, moment flux {:?}",
                            xi,
                            sc.name(),
                            flux.flux,
                            flux.moment_flux
                        ),
                        Err(e) => println!("{}", e),
                    }
                }
            }
            let mut out = std::io::stdout();
            if let Err(e) = network.output_coefficients_to(&mut out) {
                println!("{}", e);
            }
        }
        1 => {
            // zeroth order fast path against the general path
            let mut network = match he_v_network(MomentConfig::zeroth_only(), 2) {
                Ok(n) => n,
                Err(e) => {
                    println!("failed to build the demo network: {}", e);
                    return;
                }
            };
            let concs = demo_state(network.dof());
            let general = network.compute_super_cluster_fluxes(&concs, 1);
            if let Err(e) = network.use_zeroth_moment_specializations() {
                println!("{}", e);
                return;
            }
            let fast = network.compute_super_cluster_fluxes(&concs, 1);
            info!("general path: {:?}", general);
            info!("zeroth order path: {:?}", fast);
            network.print_summary_table();
        }
        _ => println!("no such example: {}", task),
    }
}
