#[cfg(test)]
mod tests {
    use crate::Clusters::cluster::{ClusterEnum, Reactant, SingleCluster, Species};
    use crate::Clusters::super_cluster::SuperCluster;
    use crate::ReactionNetwork::network_error::NetworkError;
    use crate::Reactions::coefficients::overlap_region;
    use crate::Reactions::reaction::PendingProductionReactionInfo;
    use crate::settings::MomentConfig;
    use approx::assert_relative_eq;

    fn he_v() -> MomentConfig {
        MomentConfig::new(vec![Species::He, Species::V]).unwrap()
    }

    fn group(lo: [i32; 4], hi: [i32; 4]) -> SuperCluster {
        SuperCluster::rectangle(lo, hi).unwrap()
    }

    fn members(sc: &SuperCluster) -> Vec<[i32; 4]> {
        sc.hev_list().to_vec()
    }

    fn shifted(m: [i32; 4], s: [i32; 4]) -> [i32; 4] {
        [m[0] + s[0], m[1] + s[1], m[2] + s[2], m[3] + s[3]]
    }

    fn inside(sc: &SuperCluster, m: &[i32; 4]) -> bool {
        (0..4).all(|ax| sc.bounds(ax).contains(m[ax]))
    }

    fn assert_same(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_explicit_production_outer_product() {
        let config = he_v();
        let product = group([4, 0, 0, 2], [6, 0, 0, 4]);
        let reactant = ClusterEnum::from(group([2, 0, 0, 2], [4, 0, 0, 4]));
        let single = ClusterEnum::from(SingleCluster::helium(2));
        let c = product.result_from(&reactant, &single, &[6, 0, 0, 4], &[4, 0, 0, 4], &config);
        assert_eq!(c.ps_dim(), 3);
        assert_relative_eq!(c[(0, 0, 0)], 1.0);
        // distance of the grouped reactant at He 4 is +1
        assert_relative_eq!(c[(1, 0, 0)], 1.0);
        assert_relative_eq!(c[(0, 1, 0)], 0.0);
        assert_relative_eq!(c[(0, 0, 1)], product.factor(6, 0));
    }

    #[test]
    fn test_result_from_overlap_matches_member_sum() {
        let config = he_v();
        let product = group([4, 0, 0, 2], [5, 0, 0, 4]);
        let reactant = group([2, 0, 0, 2], [4, 0, 0, 4]);
        let he2 = SingleCluster::helium(2);
        let s = [2, 0, 0, 0];
        let infos: Vec<_> = members(&reactant)
            .into_iter()
            .filter(|g| inside(&product, &shifted(*g, s)))
            .map(|g| PendingProductionReactionInfo::new(shifted(g, s), g))
            .collect();
        let reactant = ClusterEnum::from(reactant);
        let he2 = ClusterEnum::from(he2);
        // grouped reactant first, then second
        for (first, second) in [(&reactant, &he2), (&he2, &reactant)] {
            let explicit = product.result_from_pending(first, second, &infos, &config);
            let overlap = product.result_from_overlap(first, second, &config).unwrap();
            assert_relative_eq!(overlap[(0, 0, 0)], 6.0);
            assert_same(overlap.as_slice(), explicit.as_slice());
        }
    }

    #[test]
    fn test_result_from_overlap_with_interstitial() {
        let config = he_v();
        let product = group([2, 0, 0, 1], [3, 0, 0, 2]);
        let reactant = group([2, 0, 0, 2], [3, 0, 0, 3]);
        let i1 = SingleCluster::interstitial(1);
        let s = [0, 0, 0, -1];
        let infos: Vec<_> = members(&reactant)
            .into_iter()
            .filter(|g| inside(&product, &shifted(*g, s)))
            .map(|g| PendingProductionReactionInfo::new(shifted(g, s), g))
            .collect();
        assert_eq!(infos.len(), 4);
        let reactant = ClusterEnum::from(reactant);
        let i1 = ClusterEnum::from(i1);
        let explicit = product.result_from_pending(&reactant, &i1, &infos, &config);
        let overlap = product.result_from_overlap(&reactant, &i1, &config).unwrap();
        assert_same(overlap.as_slice(), explicit.as_slice());
    }

    #[test]
    fn test_participate_in_overlap_matches_member_sum() {
        let config = he_v();
        let this = group([2, 0, 0, 2], [4, 0, 0, 4]);
        let product = group([4, 0, 0, 2], [5, 0, 0, 4]);
        let s = [2, 0, 0, 0];
        let infos: Vec<_> = members(&this)
            .into_iter()
            .filter(|g| inside(&product, &shifted(*g, s)))
            .map(|g| PendingProductionReactionInfo::new(shifted(g, s), g))
            .collect();
        let explicit = this.participate_in_pending(&infos, &config);
        let overlap = this
            .participate_in_overlap(
                &ClusterEnum::from(product),
                &ClusterEnum::from(SingleCluster::helium(2)),
                &config,
            )
            .unwrap();
        assert_relative_eq!(overlap[(0, 0, 0)], 6.0);
        assert_same(overlap.as_slice(), explicit.as_slice());
        // the combining partner never carries an expansion index
        for i in 0..3 {
            for j in 1..3 {
                for k in 0..3 {
                    assert_eq!(overlap[(i, j, k)], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_dissociation_overlap_matches_member_sum() {
        let config = he_v();
        let this = group([2, 0, 0, 2], [4, 0, 0, 4]);
        let parent = group([4, 0, 0, 2], [6, 0, 0, 4]);
        let s = [2, 0, 0, 0];
        let infos: Vec<_> = members(&this)
            .into_iter()
            .filter(|g| inside(&parent, &shifted(*g, s)))
            .map(|g| PendingProductionReactionInfo::new(shifted(g, s), g))
            .collect();
        let parent = ClusterEnum::from(parent);
        let explicit = this.participate_in_dissociation_pending(&parent, &infos, &config);
        let overlap = this
            .participate_in_dissociation_overlap(
                &parent,
                &ClusterEnum::from(SingleCluster::helium(2)),
                &config,
            )
            .unwrap();
        assert_relative_eq!(overlap[(0, 0)], 9.0);
        assert_same(overlap.as_slice(), explicit.as_slice());
    }

    #[test]
    fn test_emission_overlap_matches_member_sum() {
        let config = he_v();
        let this = group([4, 0, 0, 2], [6, 0, 0, 4]);
        let product = group([2, 0, 0, 2], [3, 0, 0, 4]);
        let s = [2, 0, 0, 0];
        let infos: Vec<_> = members(&product)
            .into_iter()
            .map(|g| shifted(g, s))
            .filter(|p| inside(&this, p))
            .map(|p| PendingProductionReactionInfo::new(p, [0; 4]))
            .collect();
        let explicit = this.emit_from_pending(&infos, &config);
        let product = ClusterEnum::from(product);
        let he2 = ClusterEnum::from(SingleCluster::helium(2));
        let overlap = this.emit_from_overlap(&he2, &product, &config).unwrap();
        assert_relative_eq!(overlap[(0, 0)], 6.0);
        assert_same(overlap.as_slice(), explicit.as_slice());
    }

    #[test]
    fn test_zeroth_only_configuration() {
        let config = MomentConfig::zeroth_only();
        let this = group([4, 0, 0, 2], [6, 0, 0, 4]);
        let c = this.emit_from(&[5, 0, 0, 3], &config);
        assert_eq!(c.as_slice(), &[1.0]);
    }

    #[test]
    fn test_empty_overlap_rejected() {
        let config = he_v();
        let product = group([10, 0, 0, 2], [12, 0, 0, 4]);
        let reactant = ClusterEnum::from(group([2, 0, 0, 2], [4, 0, 0, 4]));
        let he2 = ClusterEnum::from(SingleCluster::helium(2));
        let err = product
            .result_from_overlap(&reactant, &he2, &config)
            .unwrap_err();
        assert!(matches!(err, NetworkError::EmptyOverlap { axis: 0, width } if width < 1));
        let single = SingleCluster::helium(2);
        assert!(overlap_region(&product, &reactant, &single).is_err());
    }

    #[test]
    fn test_grouped_partner_count() {
        let config = he_v();
        let product = group([4, 0, 0, 2], [6, 0, 0, 4]);
        let he2 = ClusterEnum::from(SingleCluster::helium(2));
        let v2 = ClusterEnum::from(SingleCluster::vacancy(2));
        assert!(matches!(
            product.result_from_overlap(&he2, &v2, &config),
            Err(NetworkError::GroupedPartners(0))
        ));
        let g = ClusterEnum::from(group([2, 0, 0, 2], [4, 0, 0, 4]));
        assert!(matches!(
            product.emit_from_overlap(&g, &g, &config),
            Err(NetworkError::GroupedPartners(2))
        ));
    }
}
