#[cfg(test)]
mod tests {
    use crate::Clusters::cluster::{Reactant, SingleCluster, Species};
    use crate::Clusters::super_cluster::SuperCluster;
    use crate::Examples::network_examples::{G1, G2, G3, HE1, demo_state, he_v_network};
    use crate::Flux::partial_derivatives::PartialsIdxMap;
    use crate::Flux::super_flux::SuperClusterFlux;
    use crate::ReactionNetwork::builder::NetworkBuilder;
    use crate::ReactionNetwork::network::ReactionNetwork;
    use crate::ReactionNetwork::network_error::NetworkError;
    use crate::Reactions::reaction::ProductionReaction;
    use crate::settings::{MomentConfig, NetworkSettings};
    use approx::assert_relative_eq;

    fn he_v() -> MomentConfig {
        MomentConfig::new(vec![Species::He, Species::V]).unwrap()
    }

    /// central differences of the super-cluster rows, `fd[row][column]`
    fn fd_jacobian(network: &ReactionNetwork, concs: &[f64], xi: usize) -> Vec<Vec<f64>> {
        let n = network.dof();
        let h = 1e-6;
        let mut fd = vec![vec![0.0; n]; n];
        for c in 0..n {
            let mut plus = concs.to_vec();
            let mut minus = concs.to_vec();
            plus[c] += h;
            minus[c] -= h;
            let fp = network.compute_super_cluster_fluxes(&plus, xi).unwrap();
            let fm = network.compute_super_cluster_fluxes(&minus, xi).unwrap();
            for r in 0..n {
                fd[r][c] = (fp[r] - fm[r]) / (2.0 * h);
            }
        }
        fd
    }

    #[test]
    fn test_jacobian_matches_finite_differences() {
        let configs = vec![
            he_v(),
            MomentConfig::new(vec![Species::V, Species::He]).unwrap(),
            MomentConfig::new(vec![Species::V]).unwrap(),
            MomentConfig::all_axes(),
        ];
        for config in configs {
            let network = he_v_network(config, 2).unwrap();
            let concs = demo_state(network.dof());
            for xi in 0..2 {
                let jac = network.compute_dense_jacobian(&concs, xi).unwrap();
                let fd = fd_jacobian(&network, &concs, xi);
                for r in 0..network.dof() {
                    for c in 0..network.dof() {
                        assert_relative_eq!(
                            jac[(r, c)],
                            fd[r][c],
                            epsilon = 1e-6,
                            max_relative = 1e-6
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_mapped_partials_match_dense() {
        let network = he_v_network(he_v(), 2).unwrap();
        let concs = demo_state(network.dof());
        let ps = network.settings().moments.ps_dim();
        let ctx = network.context();
        for id in [G1, G2, G3] {
            let maps = network.partials_idx_maps(id).unwrap();
            assert_eq!(maps.len(), ps);
            let mut partials = vec![vec![0.0; maps[0].len()]; ps];
            network
                .compute_partial_derivatives(id, &concs, 1, &maps, &mut partials)
                .unwrap();
            let mut dense = vec![vec![0.0; network.dof()]; ps];
            network
                .super_cluster(id)
                .unwrap()
                .compute_partial_derivatives_dense(&ctx, &concs, 1, &mut dense)
                .unwrap();
            for i in 0..ps {
                for global in 0..network.dof() {
                    match maps[0].get(&global) {
                        Some(slot) => assert_relative_eq!(partials[i][*slot], dense[i][global]),
                        None => assert_eq!(dense[i][global], 0.0),
                    }
                }
            }
        }
    }

    #[test]
    fn test_unmapped_partial_index() {
        let network = he_v_network(he_v(), 1).unwrap();
        let concs = demo_state(network.dof());
        let maps = vec![PartialsIdxMap::new(); 3];
        let mut partials = vec![vec![0.0; 4]; 3];
        let result = network.compute_partial_derivatives(G2, &concs, 0, &maps, &mut partials);
        assert!(matches!(
            result,
            Err(NetworkError::UnmappedPartialIndex { .. })
        ));
    }

    #[test]
    fn test_zeroth_order_path_matches_general_path() {
        let network = he_v_network(MomentConfig::zeroth_only(), 3).unwrap();
        let concs = demo_state(network.dof());
        let mut fast = network.clone();
        fast.use_zeroth_moment_specializations().unwrap();
        assert!(fast.uses_zeroth_order());
        for xi in 0..3 {
            let general_flux = network.compute_super_cluster_fluxes(&concs, xi).unwrap();
            let fast_flux = fast.compute_super_cluster_fluxes(&concs, xi).unwrap();
            for r in 0..network.dof() {
                assert_relative_eq!(general_flux[r], fast_flux[r], epsilon = 1e-12);
            }
            let general_jac = network.compute_dense_jacobian(&concs, xi).unwrap();
            let fast_jac = fast.compute_dense_jacobian(&concs, xi).unwrap();
            for r in 0..network.dof() {
                for c in 0..network.dof() {
                    assert_relative_eq!(general_jac[(r, c)], fast_jac[(r, c)], epsilon = 1e-12);
                }
            }
        }
        for id in [G1, G2, G3] {
            let maps = network.partials_idx_maps(id).unwrap();
            let mut general = vec![vec![0.0; maps[0].len()]];
            let mut zeroth = vec![vec![0.0; maps[0].len()]];
            network
                .compute_partial_derivatives(id, &concs, 2, &maps, &mut general)
                .unwrap();
            fast.compute_partial_derivatives(id, &concs, 2, &maps, &mut zeroth)
                .unwrap();
            for (a, b) in general[0].iter().zip(zeroth[0].iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    #[should_panic(expected = "zeroth order lists")]
    fn test_zeroth_order_jacobian_needs_shadows() {
        let network = he_v_network(MomentConfig::zeroth_only(), 1).unwrap();
        let concs = demo_state(network.dof());
        let mut row = vec![0.0; network.dof()];
        network
            .super_cluster(G1)
            .unwrap()
            .compute_partial_derivatives0(&network.context(), &concs, 0, &mut row);
    }

    #[test]
    fn test_zeroth_order_needs_untracked_moments() {
        let mut network = he_v_network(he_v(), 1).unwrap();
        assert!(matches!(
            network.use_zeroth_moment_specializations(),
            Err(NetworkError::MomentsTracked(3))
        ));
        assert!(!network.uses_zeroth_order());
    }

    #[test]
    fn test_production_and_combination_balance() {
        // G1 + He_1 -> G2 only: what G1 loses, G2 gains, weighted by group size
        for config in [MomentConfig::zeroth_only(), he_v()] {
            let mut builder = NetworkBuilder::new(NetworkSettings::new(config, 1)).unwrap();
            let he1 = builder.add_cluster(SingleCluster::helium(1));
            let g1 = builder
                .add_super_cluster(SuperCluster::rectangle([2, 0, 0, 2], [4, 0, 0, 4]).unwrap())
                .unwrap();
            let g2 = builder
                .add_super_cluster(SuperCluster::rectangle([4, 0, 0, 2], [6, 0, 0, 4]).unwrap())
                .unwrap();
            let r = builder
                .add_production_reaction(ProductionReaction::new(g1, he1, vec![3.0]))
                .unwrap();
            builder.result_from_overlap(g2, r).unwrap();
            builder.participate_in_overlap(g1, r, g2).unwrap();
            let network = builder.finish().unwrap();

            let concs = demo_state(network.dof());
            let gained = network.super_cluster_flux(g2, &concs, 0).unwrap().flux;
            let lost = network.super_cluster_flux(g1, &concs, 0).unwrap().flux;
            assert!(gained > 0.0);
            assert!(lost < 0.0);
            let n1 = network.super_cluster(g1).unwrap().n_tot() as f64;
            let n2 = network.super_cluster(g2).unwrap().n_tot() as f64;
            assert_relative_eq!(n2 * gained, -n1 * lost, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_dissociation_and_emission_signs() {
        let network = he_v_network(MomentConfig::zeroth_only(), 1).unwrap();
        let concs = demo_state(network.dof());
        let ctx = network.context();
        let mut received = SuperClusterFlux::default();
        network
            .super_cluster(G1)
            .unwrap()
            .dissociation_flux(&ctx, &concs, 0, &mut received);
        assert!(received.flux > 0.0);
        let mut emitted = SuperClusterFlux::default();
        let g2 = network.super_cluster(G2).unwrap();
        g2.emission_flux(&ctx, &concs, 0, &mut emitted);
        assert!(emitted.flux < 0.0);
        // one He_1 emitted per folded member pair, rate 1.75 at xi = 0
        let coeff0 = g2.lists().emission[0].coefs.coeff0();
        assert_relative_eq!(coeff0, 6.0);
        assert_relative_eq!(
            emitted.flux,
            -1.75 * coeff0 * concs[G2] / g2.n_tot() as f64,
            max_relative = 1e-12
        );
        assert_eq!(network.clusters()[HE1].name(), "He_1");
    }

    #[test]
    fn test_concurrent_evaluation_across_grid_points() {
        let network = he_v_network(he_v(), 4).unwrap();
        let concs = demo_state(network.dof());
        let serial: Vec<_> = (0..4)
            .map(|xi| network.compute_super_cluster_fluxes(&concs, xi).unwrap())
            .collect();
        let parallel: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|xi| {
                    let network = &network;
                    let concs = &concs;
                    s.spawn(move || network.compute_super_cluster_fluxes(concs, xi).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_state_checks() {
        let network = he_v_network(he_v(), 2).unwrap();
        let short = vec![0.0; network.dof() - 1];
        assert!(matches!(
            network.compute_super_cluster_fluxes(&short, 0),
            Err(NetworkError::StateLength { .. })
        ));
        let concs = demo_state(network.dof());
        assert!(matches!(
            network.super_cluster_flux(G1, &concs, 2),
            Err(NetworkError::GridIndex { xi: 2, grid_points: 2 })
        ));
        assert!(matches!(
            network.super_cluster_flux(HE1, &concs, 0),
            Err(NetworkError::NotASuperCluster(0))
        ));
    }
}
