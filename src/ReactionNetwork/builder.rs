//! # Network Builder
//!
//! ## Purpose
//! Single-threaded construction phase of a reaction network. Clusters and reactions are pushed into
//! the arena, every elementary reaction is recorded into the aggregated lists of the super-clusters it
//! touches, and the coefficient tensors are filled. `finish` assigns the moment unknowns, derives the
//! connectivity and hands back an immutable `ReactionNetwork`; the key -> position maps used for
//! deduplication die with the builder.
//!
//! ## Recording a reaction
//! | role of the super-cluster | list         | coefficient calls                                   |
//! |---------------------------|--------------|-----------------------------------------------------|
//! | product of A + B          | reacting     | `result_from`, `_pending`, `_overlap`, `_coefs`      |
//! | operand of A + B          | combining    | `participate_in`, `_pending`, `_overlap`, `_coefs`   |
//! | product of A -> B + C     | dissociating | `participate_in_dissociation`, `_pending`, ...      |
//! | A of A -> B + C           | emission     | `emit_from`, `_pending`, `_overlap`, `_coefs`        |
//!
//! ## Example
//! ```rust
//! use DefectKin::ReactionNetwork::builder::NetworkBuilder;
//! use DefectKin::Clusters::cluster::{SingleCluster, Species};
//! use DefectKin::Clusters::super_cluster::SuperCluster;
//! use DefectKin::Reactions::reaction::ProductionReaction;
//! use DefectKin::settings::{MomentConfig, NetworkSettings};
//!
//! let moments = MomentConfig::new(vec![Species::He]).unwrap();
//! let mut builder = NetworkBuilder::new(NetworkSettings::new(moments, 1)).unwrap();
//! let he1 = builder.add_cluster(SingleCluster::helium(1));
//! let group = builder
//!     .add_super_cluster(SuperCluster::rectangle([2, 0, 0, 1], [4, 0, 0, 1]).unwrap())
//!     .unwrap();
//! let r = builder
//!     .add_production_reaction(ProductionReaction::new(he1, group, vec![1.0]))
//!     .unwrap();
//! builder.participate_in(group, r, &[3, 0, 0, 1]).unwrap();
//! let network = builder.finish().unwrap();
//! assert_eq!(network.dof(), 3);
//! ```

use crate::Clusters::cluster::{ClusterEnum, N_AXES, Reactant, SingleCluster};
use crate::Clusters::super_cluster::SuperCluster;
use crate::ReactionNetwork::network::ReactionNetwork;
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::effective_lists::{
    CombiningCluster, DissociationCoefficients, DissociationPair, EffectiveListIndex,
    ProductionCoefficients, ProductionPair,
};
use crate::Reactions::reaction::{
    DissociationReaction, PendingProductionReactionInfo, ProductionReaction,
};
use crate::settings::NetworkSettings;
use log::{debug, info};
use std::collections::HashMap;

pub struct NetworkBuilder {
    settings: NetworkSettings,
    clusters: Vec<ClusterEnum>,
    production: Vec<ProductionReaction>,
    dissociation: Vec<DissociationReaction>,
    index: HashMap<usize, EffectiveListIndex>,
}

impl NetworkBuilder {
    pub fn new(settings: NetworkSettings) -> Result<Self, NetworkError> {
        settings.validate()?;
        Ok(Self {
            settings,
            clusters: Vec::new(),
            production: Vec::new(),
            dissociation: Vec::new(),
            index: HashMap::new(),
        })
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    pub fn cluster(&self, id: usize) -> Result<&ClusterEnum, NetworkError> {
        self.clusters.get(id).ok_or(NetworkError::UnknownCluster(id))
    }

    fn super_ref(&self, id: usize) -> Result<&SuperCluster, NetworkError> {
        self.cluster(id)?
            .as_super()
            .ok_or(NetworkError::NotASuperCluster(id))
    }

    fn production_ref(&self, id: usize) -> Result<&ProductionReaction, NetworkError> {
        self.production
            .get(id)
            .ok_or(NetworkError::UnknownProductionReaction(id))
    }

    fn dissociation_ref(&self, id: usize) -> Result<&DissociationReaction, NetworkError> {
        self.dissociation
            .get(id)
            .ok_or(NetworkError::UnknownDissociationReaction(id))
    }

    ////////////////////////////ARENA/////////////////////////////////////

    pub fn add_cluster(&mut self, mut cluster: SingleCluster) -> usize {
        let id = self.clusters.len();
        cluster.set_id(id);
        self.clusters.push(ClusterEnum::Single(cluster));
        id
    }

    /// The membership list must already be ingested with `set_hev_vector`.
    pub fn add_super_cluster(&mut self, mut cluster: SuperCluster) -> Result<usize, NetworkError> {
        cluster.validate()?;
        if cluster.hev_list().len() != cluster.n_tot() {
            return Err(NetworkError::MembershipCount {
                name: cluster.name().to_string(),
                expected: cluster.n_tot(),
                got: cluster.hev_list().len(),
            });
        }
        let id = self.clusters.len();
        cluster.set_id(id);
        self.clusters.push(ClusterEnum::Super(cluster));
        self.index.insert(id, EffectiveListIndex::new());
        Ok(id)
    }

    fn check_rates(&self, rates: &[f64]) -> Result<(), NetworkError> {
        if rates.len() != self.settings.grid_points {
            return Err(NetworkError::RateLength {
                expected: self.settings.grid_points,
                got: rates.len(),
            });
        }
        Ok(())
    }

    pub fn add_production_reaction(
        &mut self,
        mut reaction: ProductionReaction,
    ) -> Result<usize, NetworkError> {
        self.cluster(reaction.first)?;
        self.cluster(reaction.second)?;
        self.check_rates(&reaction.k_constant)?;
        let id = self.production.len();
        reaction.id = id;
        self.production.push(reaction);
        Ok(id)
    }

    pub fn add_dissociation_reaction(
        &mut self,
        mut reaction: DissociationReaction,
    ) -> Result<usize, NetworkError> {
        self.cluster(reaction.dissociating)?;
        self.cluster(reaction.first)?;
        self.cluster(reaction.second)?;
        self.check_rates(&reaction.k_constant)?;
        let id = self.dissociation.len();
        reaction.id = id;
        self.dissociation.push(reaction);
        Ok(id)
    }

    ////////////////////////////EFFECTIVE LISTS/////////////////////////////////////

    pub fn add_to_eff_reacting_list(
        &mut self,
        super_id: usize,
        reaction: usize,
    ) -> Result<&mut ProductionPair, NetworkError> {
        let ps = self.settings.moments.ps_dim();
        let reaction = self
            .production
            .get(reaction)
            .ok_or(NetworkError::UnknownProductionReaction(reaction))?;
        let (cluster, index) = super_parts(&mut self.clusters, &mut self.index, super_id)?;
        Ok(index.reacting_entry(&mut cluster.lists, reaction, ps))
    }

    pub fn add_to_eff_combining_list(
        &mut self,
        super_id: usize,
        reaction: usize,
    ) -> Result<&mut CombiningCluster, NetworkError> {
        let ps = self.settings.moments.ps_dim();
        let reaction = self
            .production
            .get(reaction)
            .ok_or(NetworkError::UnknownProductionReaction(reaction))?;
        let (cluster, index) = super_parts(&mut self.clusters, &mut self.index, super_id)?;
        index.combining_entry(&mut cluster.lists, reaction, super_id, ps)
    }

    pub fn add_to_eff_dissociating_list(
        &mut self,
        super_id: usize,
        reaction: usize,
    ) -> Result<&mut DissociationPair, NetworkError> {
        let ps = self.settings.moments.ps_dim();
        let reaction = self
            .dissociation
            .get(reaction)
            .ok_or(NetworkError::UnknownDissociationReaction(reaction))?;
        let (cluster, index) = super_parts(&mut self.clusters, &mut self.index, super_id)?;
        index.dissociating_entry(&mut cluster.lists, reaction, super_id, ps)
    }

    pub fn add_to_eff_emission_list(
        &mut self,
        super_id: usize,
        reaction: usize,
    ) -> Result<&mut DissociationPair, NetworkError> {
        let ps = self.settings.moments.ps_dim();
        let reaction = self
            .dissociation
            .get(reaction)
            .ok_or(NetworkError::UnknownDissociationReaction(reaction))?;
        let (cluster, index) = super_parts(&mut self.clusters, &mut self.index, super_id)?;
        index.emission_entry(&mut cluster.lists, reaction, super_id, ps)
    }

    ////////////////////////////PRODUCT OF A + B/////////////////////////////////////

    fn add_reacting(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: ProductionCoefficients,
    ) -> Result<(), NetworkError> {
        self.add_to_eff_reacting_list(super_id, reaction)?.coefs += &coefs;
        Ok(())
    }

    /// `a`: member of this group, `b`: member of the grouped reactant
    pub fn result_from(
        &mut self,
        super_id: usize,
        reaction: usize,
        a: &[i32; N_AXES],
        b: &[i32; N_AXES],
    ) -> Result<(), NetworkError> {
        let r = self.production_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.result_from(
            &self.clusters[r.first],
            &self.clusters[r.second],
            a,
            b,
            &self.settings.moments,
        );
        self.add_reacting(super_id, reaction, coefs)
    }

    pub fn result_from_pending(
        &mut self,
        super_id: usize,
        reaction: usize,
        infos: &[PendingProductionReactionInfo],
    ) -> Result<(), NetworkError> {
        let r = self.production_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.result_from_pending(
            &self.clusters[r.first],
            &self.clusters[r.second],
            infos,
            &self.settings.moments,
        );
        self.add_reacting(super_id, reaction, coefs)
    }

    pub fn result_from_overlap(&mut self, super_id: usize, reaction: usize) -> Result<(), NetworkError> {
        let r = self.production_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.result_from_overlap(
            &self.clusters[r.first],
            &self.clusters[r.second],
            &self.settings.moments,
        )?;
        self.add_reacting(super_id, reaction, coefs)
    }

    /// flat `psDim³` coefficients in `(i, j, k)` order
    pub fn result_from_coefs(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: &[f64],
    ) -> Result<(), NetworkError> {
        let coefs = ProductionCoefficients::from_flat(self.settings.moments.ps_dim(), coefs)?;
        self.add_reacting(super_id, reaction, coefs)
    }

    ////////////////////////////OPERAND OF A + B/////////////////////////////////////

    fn add_combining(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: ProductionCoefficients,
    ) -> Result<(), NetworkError> {
        self.add_to_eff_combining_list(super_id, reaction)?.coefs += &coefs;
        Ok(())
    }

    /// `a`: member of this group
    pub fn participate_in(
        &mut self,
        super_id: usize,
        reaction: usize,
        a: &[i32; N_AXES],
    ) -> Result<(), NetworkError> {
        let coefs = self
            .super_ref(super_id)?
            .participate_in(a, &self.settings.moments);
        self.add_combining(super_id, reaction, coefs)
    }

    pub fn participate_in_pending(
        &mut self,
        super_id: usize,
        reaction: usize,
        infos: &[PendingProductionReactionInfo],
    ) -> Result<(), NetworkError> {
        let coefs = self
            .super_ref(super_id)?
            .participate_in_pending(infos, &self.settings.moments);
        self.add_combining(super_id, reaction, coefs)
    }

    pub fn participate_in_overlap(
        &mut self,
        super_id: usize,
        reaction: usize,
        product: usize,
    ) -> Result<(), NetworkError> {
        let other = self.production_ref(reaction)?.other_operand(super_id)?;
        let coefs = self.super_ref(super_id)?.participate_in_overlap(
            self.cluster(product)?,
            &self.clusters[other],
            &self.settings.moments,
        )?;
        self.add_combining(super_id, reaction, coefs)
    }

    pub fn participate_in_coefs(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: &[f64],
    ) -> Result<(), NetworkError> {
        let coefs = ProductionCoefficients::from_flat(self.settings.moments.ps_dim(), coefs)?;
        self.add_combining(super_id, reaction, coefs)
    }

    ////////////////////////////PRODUCT OF A -> B + C/////////////////////////////////////

    fn add_dissociating(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: DissociationCoefficients,
    ) -> Result<(), NetworkError> {
        self.add_to_eff_dissociating_list(super_id, reaction)?.coefs += &coefs;
        Ok(())
    }

    /// `a`: member of the dissociating cluster, `b`: member of this group
    pub fn participate_in_dissociation(
        &mut self,
        super_id: usize,
        reaction: usize,
        a: &[i32; N_AXES],
        b: &[i32; N_AXES],
    ) -> Result<(), NetworkError> {
        let r = self.dissociation_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.participate_in_dissociation(
            &self.clusters[r.dissociating],
            a,
            b,
            &self.settings.moments,
        );
        self.add_dissociating(super_id, reaction, coefs)
    }

    pub fn participate_in_dissociation_pending(
        &mut self,
        super_id: usize,
        reaction: usize,
        infos: &[PendingProductionReactionInfo],
    ) -> Result<(), NetworkError> {
        let r = self.dissociation_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.participate_in_dissociation_pending(
            &self.clusters[r.dissociating],
            infos,
            &self.settings.moments,
        );
        self.add_dissociating(super_id, reaction, coefs)
    }

    pub fn participate_in_dissociation_overlap(
        &mut self,
        super_id: usize,
        reaction: usize,
    ) -> Result<(), NetworkError> {
        let r = self.dissociation_ref(reaction)?;
        let emitted = r.emitted_partner(super_id)?;
        let coefs = self.super_ref(super_id)?.participate_in_dissociation_overlap(
            &self.clusters[r.dissociating],
            &self.clusters[emitted],
            &self.settings.moments,
        )?;
        self.add_dissociating(super_id, reaction, coefs)
    }

    pub fn participate_in_dissociation_coefs(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: &[f64],
    ) -> Result<(), NetworkError> {
        let coefs = DissociationCoefficients::from_flat(self.settings.moments.ps_dim(), coefs)?;
        self.add_dissociating(super_id, reaction, coefs)
    }

    ////////////////////////////A OF A -> B + C/////////////////////////////////////

    fn add_emission(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: DissociationCoefficients,
    ) -> Result<(), NetworkError> {
        self.add_to_eff_emission_list(super_id, reaction)?.coefs += &coefs;
        Ok(())
    }

    /// `a`: member of this group
    pub fn emit_from(
        &mut self,
        super_id: usize,
        reaction: usize,
        a: &[i32; N_AXES],
    ) -> Result<(), NetworkError> {
        let coefs = self.super_ref(super_id)?.emit_from(a, &self.settings.moments);
        self.add_emission(super_id, reaction, coefs)
    }

    pub fn emit_from_pending(
        &mut self,
        super_id: usize,
        reaction: usize,
        infos: &[PendingProductionReactionInfo],
    ) -> Result<(), NetworkError> {
        let coefs = self
            .super_ref(super_id)?
            .emit_from_pending(infos, &self.settings.moments);
        self.add_emission(super_id, reaction, coefs)
    }

    pub fn emit_from_overlap(&mut self, super_id: usize, reaction: usize) -> Result<(), NetworkError> {
        let r = self.dissociation_ref(reaction)?;
        let coefs = self.super_ref(super_id)?.emit_from_overlap(
            &self.clusters[r.first],
            &self.clusters[r.second],
            &self.settings.moments,
        )?;
        self.add_emission(super_id, reaction, coefs)
    }

    pub fn emit_from_coefs(
        &mut self,
        super_id: usize,
        reaction: usize,
        coefs: &[f64],
    ) -> Result<(), NetworkError> {
        let coefs = DissociationCoefficients::from_flat(self.settings.moments.ps_dim(), coefs)?;
        self.add_emission(super_id, reaction, coefs)
    }

    ////////////////////////////FREEZE/////////////////////////////////////

    /// Assigns one unknown per tracked moment of every super-cluster, after all cluster unknowns,
    /// derives the connectivity and drops the key maps.
    pub fn finish(self) -> Result<ReactionNetwork, NetworkError> {
        let NetworkBuilder {
            settings,
            mut clusters,
            production,
            dissociation,
            index: _,
        } = self;
        let config = &settings.moments;
        let mut dof = clusters.len();
        let mut super_ids = Vec::new();
        for cluster in clusters.iter_mut() {
            if let ClusterEnum::Super(sc) = cluster {
                super_ids.push(sc.id());
                for i in 1..config.ps_dim() {
                    sc.set_moment_id(config.axis(i), Some(dof));
                    dof += 1;
                }
                debug!(
                    "{}: {} reacting, {} combining, {} dissociating, {} emission entries",
                    sc.name(),
                    sc.lists().reacting.len(),
                    sc.lists().combining.len(),
                    sc.lists().dissociating.len(),
                    sc.lists().emission.len()
                );
            }
        }
        info!(
            "network built: {} clusters ({} grouped), {} unknowns, {} production and {} dissociation reactions",
            clusters.len(),
            super_ids.len(),
            dof,
            production.len(),
            dissociation.len()
        );
        let mut network =
            ReactionNetwork::from_parts(settings, clusters, production, dissociation, super_ids, dof);
        network.reset_connectivities();
        Ok(network)
    }
}

/// mutable super-cluster and its key maps, borrowed from disjoint builder fields
fn super_parts<'a>(
    clusters: &'a mut [ClusterEnum],
    index: &'a mut HashMap<usize, EffectiveListIndex>,
    id: usize,
) -> Result<(&'a mut SuperCluster, &'a mut EffectiveListIndex), NetworkError> {
    let cluster = clusters
        .get_mut(id)
        .ok_or(NetworkError::UnknownCluster(id))?
        .as_super_mut()
        .ok_or(NetworkError::NotASuperCluster(id))?;
    let index = index.entry(id).or_default();
    Ok((cluster, index))
}
