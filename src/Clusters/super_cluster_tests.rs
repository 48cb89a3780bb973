#[cfg(test)]
mod tests {
    use crate::Clusters::cluster::{ClusterEnum, Reactant, SingleCluster};
    use crate::Clusters::super_cluster::SuperCluster;
    use crate::ReactionNetwork::network_error::NetworkError;
    use approx::assert_relative_eq;

    fn he_line() -> SuperCluster {
        // He 2..4 at V = 1
        let mut sc = SuperCluster::new([3.0, 0.0, 0.0, 1.0], 3, [3, 1, 1, 1], [2, 0, 0, 1], [4, 0, 0, 1]);
        sc.set_hev_vector(vec![[2, 0, 0, 1], [3, 0, 0, 1], [4, 0, 0, 1]])
            .unwrap();
        sc
    }

    #[test]
    fn test_constructor_fields() {
        let sc = SuperCluster::new([3.0, 0.0, 0.0, 5.0], 3, [3, 1, 1, 1], [2, 0, 0, 5], [4, 0, 0, 5]);
        assert_eq!(sc.size(), 8);
        assert_eq!(sc.name(), "He_3D_0T_0V_5");
        assert_eq!(sc.formation_energy(), 0.0);
        assert_eq!(sc.diffusion_factor(), 0.0);
        assert!(sc.migration_energy().is_infinite());
        assert!(sc.is_grouped());
        assert_eq!(sc.bounds(0).first(), 2);
        assert_eq!(sc.bounds(0).last(), 4);
        assert!(sc.bounds(0).contains(4));
        assert!(!sc.bounds(0).contains(5));
        assert!(sc.validate().is_ok());
    }

    #[test]
    fn test_dispersion_of_three_members() {
        let sc = he_line();
        // 2 * ((4 + 9 + 16) - 27) / (3 * 2)
        assert_relative_eq!(sc.dispersion(0), 2.0 / 3.0, epsilon = 1e-9);
        assert_eq!(sc.dispersion(1), 1.0);
        assert_eq!(sc.dispersion(3), 1.0);
        assert!(sc.reaction_radius() > 0.0);
    }

    #[test]
    fn test_full_flag() {
        let dense = SuperCluster::new([1.5, 1.0, 0.0, 0.0], 6, [2, 3, 1, 1], [1, 0, 0, 0], [2, 2, 0, 0]);
        assert!(dense.is_full());
        let holed = SuperCluster::new([1.5, 1.0, 0.0, 0.0], 5, [2, 3, 1, 1], [1, 0, 0, 0], [2, 2, 0, 0]);
        assert!(!holed.is_full());
    }

    #[test]
    fn test_distance_and_factor() {
        let sc = he_line();
        assert_relative_eq!(sc.distance(4, 0), 1.0);
        assert_relative_eq!(sc.distance(2, 0), -1.0);
        assert_relative_eq!(sc.distance(3, 0), 0.0);
        // singleton axis
        assert_eq!(sc.distance(1, 3), 0.0);
        assert_relative_eq!(sc.factor(4, 0), 1.5, epsilon = 1e-12);
        let single = SingleCluster::helium(2);
        assert_eq!(single.distance(2, 0), 0.0);
        assert_eq!(single.factor(2, 0), 0.0);
    }

    #[test]
    fn test_membership_count_mismatch() {
        let mut sc = SuperCluster::new([3.0, 0.0, 0.0, 1.0], 3, [3, 1, 1, 1], [2, 0, 0, 1], [4, 0, 0, 1]);
        let err = sc.set_hev_vector(vec![[2, 0, 0, 1]]).unwrap_err();
        assert!(matches!(err, NetworkError::MembershipCount { expected: 3, got: 1, .. }));
    }

    #[test]
    fn test_mean_off_the_members_rejected() {
        // declared mean 4 for members He 2..4 gives a negative dispersion
        let mut sc = SuperCluster::new([4.0, 0.0, 0.0, 1.0], 3, [3, 1, 1, 1], [2, 0, 0, 1], [4, 0, 0, 1]);
        assert!(sc.validate().is_ok());
        let err = sc
            .set_hev_vector(vec![[2, 0, 0, 1], [3, 0, 0, 1], [4, 0, 0, 1]])
            .unwrap_err();
        assert!(matches!(err, NetworkError::NonPositiveDispersion { axis: 0, value, .. } if value < 0.0));
        assert_eq!(sc.dispersion(0), 1.0);
        assert!(sc.hev_list().is_empty());
    }

    #[test]
    fn test_flat_membership_rejected() {
        // one member in a box three wide has no spread along He
        let mut sc = SuperCluster::new([3.0, 0.0, 0.0, 1.0], 1, [3, 1, 1, 1], [2, 0, 0, 1], [4, 0, 0, 1]);
        let err = sc.set_hev_vector(vec![[3, 0, 0, 1]]).unwrap_err();
        assert!(matches!(err, NetworkError::NonPositiveDispersion { axis: 0, value, .. } if value == 0.0));
    }

    #[test]
    fn test_member_outside_bounds_rejected() {
        let mut sc = SuperCluster::new([3.0, 0.0, 0.0, 1.0], 3, [3, 1, 1, 1], [2, 0, 0, 1], [4, 0, 0, 1]);
        let err = sc
            .set_hev_vector(vec![[2, 0, 0, 1], [3, 0, 0, 1], [5, 0, 0, 1]])
            .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::MemberOutOfBounds { member: [5, 0, 0, 1], axis: 0, .. }
        ));
        let err = sc
            .set_hev_vector(vec![[2, 0, 0, 1], [3, 0, 0, 1], [4, 0, 0, 2]])
            .unwrap_err();
        assert!(matches!(err, NetworkError::MemberOutOfBounds { axis: 3, .. }));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let sc = SuperCluster::new([3.0, 0.0, 0.0, 1.0], 3, [3, 1, 1, 1], [4, 0, 0, 1], [2, 0, 0, 1]);
        assert!(matches!(sc.validate(), Err(NetworkError::InvertedBounds { axis: 0, .. })));
        assert!(SuperCluster::rectangle([4, 0, 0, 1], [2, 0, 0, 1]).is_err());
    }

    #[test]
    fn test_rectangle_matches_manual_group() {
        let sc = SuperCluster::rectangle([2, 0, 0, 1], [4, 0, 0, 1]).unwrap();
        assert_eq!(sc.n_tot(), 3);
        assert!(sc.is_full());
        assert_relative_eq!(sc.num_atom(0), 3.0);
        assert_relative_eq!(sc.dispersion(0), he_line().dispersion(0), epsilon = 1e-12);
    }

    #[test]
    fn test_reconstructed_concentrations() {
        let mut sc = he_line();
        sc.set_id(0);
        sc.set_moment_id(0, Some(1));
        // total 2.0, He moment 0.5
        let concs = [2.0, 0.5];
        // members sit at distances -1, 0, 1 -> 1.5, 2.0, 2.5
        assert_relative_eq!(sc.total_concentration(&concs), 6.0, epsilon = 1e-12);
        assert_relative_eq!(
            sc.total_atom_concentration(&concs, 0),
            1.5 * 2.0 + 2.0 * 3.0 + 2.5 * 4.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(sc.total_vacancy_concentration(&concs), 6.0, epsilon = 1e-12);
        assert_relative_eq!(sc.integrated_v_concentration(&concs, 1), 6.0, epsilon = 1e-12);
        assert_eq!(sc.integrated_v_concentration(&concs, 2), 0.0);
        assert_relative_eq!(sc.concentration_at(&concs, [1.0, 0.0, 0.0, 0.0]), 2.5);
    }

    #[test]
    #[should_panic]
    fn test_atom_concentration_rejects_vacancy_axis() {
        let sc = he_line();
        sc.total_atom_concentration(&[0.0], 3);
    }

    #[test]
    #[should_panic]
    fn test_vectors_unavailable_under_zeroth_order() {
        let mut sc = he_line();
        sc.use_zeroth_moment_specializations(false);
        sc.prod_vector();
    }

    #[test]
    fn test_output_coefficients_empty_lists() {
        let sc = he_line();
        let clusters = vec![ClusterEnum::from(sc.clone())];
        let mut out = Vec::new();
        sc.output_coefficients_to(&mut out, &clusters).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name: He_3D_0T_0V_1\nreacting: 0\ncombining: 0\ndissociating: 0\nemitting: 0\n"
        );
    }
}
