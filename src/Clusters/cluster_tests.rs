#[cfg(test)]
mod tests {
    use crate::Clusters::cluster::{
        ClusterEnum, IntegerRange, Reactant, ReactantType, SingleCluster, Species,
    };
    use crate::Clusters::super_cluster::SuperCluster;
    use approx::assert_relative_eq;

    #[test]
    fn test_names_and_types() {
        assert_eq!(SingleCluster::helium(2).name(), "He_2");
        assert_eq!(SingleCluster::vacancy(1).name(), "V_1");
        assert_eq!(SingleCluster::interstitial(3).name(), "I_3");
        let mixed = SingleCluster::mixed(3, 0, 0, 2);
        assert_eq!(mixed.name(), "He_3V_2");
        assert_eq!(mixed.reactant_type(), ReactantType::Mixed);
        assert_eq!(mixed.size(), 5);
        assert_eq!(mixed.composition(), [3, 0, 0, 2, 0]);
    }

    #[test]
    fn test_species_axes() {
        let axes: Vec<usize> = [Species::He, Species::D, Species::T, Species::V]
            .iter()
            .map(|s| s.comp_idx())
            .collect();
        assert_eq!(axes, vec![0, 1, 2, 3]);
        assert_eq!(Species::I.comp_idx(), 4);
    }

    #[test]
    fn test_integer_range() {
        let r = IntegerRange::inclusive(2, 4);
        assert_eq!((r.first(), r.last(), r.len()), (2, 4, 3));
        assert!(r.contains(4));
        assert!(!r.contains(5));
        assert!(IntegerRange::inclusive(3, 2).is_empty());
        assert_eq!(IntegerRange::single(7).len(), 1);
    }

    #[test]
    fn test_individual_cluster_capabilities() {
        let i2 = SingleCluster::interstitial(2).with_kinetics(1e-3, 0.013, 5.0, 0.2);
        assert!(!i2.is_grouped());
        assert_eq!(i2.interstitial_size(), 2);
        assert_eq!(i2.bounds(3), IntegerRange::single(0));
        assert_eq!(i2.moment_id(0), None);
        assert_eq!(i2.distance(5, 0), 0.0);
        assert_relative_eq!(i2.diffusion_factor(), 1e-3);
        assert_relative_eq!(i2.migration_energy(), 0.013);
        assert_relative_eq!(i2.reaction_radius(), 0.2);
        let mut c = ClusterEnum::from(i2);
        c.set_id(4);
        let concs = [0.0, 0.0, 0.0, 0.0, 2.5];
        assert_relative_eq!(c.concentration(&concs), 2.5);
        assert_eq!(c.moment(&concs, 0), 0.0);
        assert!(c.as_super().is_none());
    }

    #[test]
    fn test_super_cluster_through_the_arena_type() {
        let mut sc = SuperCluster::rectangle([2, 0, 0, 1], [4, 0, 0, 1]).unwrap();
        sc.set_moment_id(0, Some(2));
        let mut c = ClusterEnum::from(sc);
        c.set_id(1);
        assert!(c.is_grouped());
        assert_eq!(c.reactant_type(), ReactantType::Super);
        let concs = [0.0, 1.5, -0.5];
        assert_relative_eq!(c.concentration(&concs), 1.5);
        assert_relative_eq!(c.moment(&concs, 0), -0.5);
        assert_eq!(c.moment(&concs, 3), 0.0);
        assert_eq!(c.as_super_mut().unwrap().n_tot(), 3);
    }
}
