//! # Reaction Network
//!
//! ## Purpose
//! Frozen arena of clusters and reactions produced by `NetworkBuilder::finish`. Every evaluation
//! method takes `&self`, so one network can be shared by threads working on different grid points
//! as long as each thread writes into its own output storage.
//!
//! ## Unknown layout
//! Unknown `id` is the concentration of cluster `id`. The first moments of super-clusters follow all
//! cluster concentrations, one per tracked axis, super-clusters in arena order.
//!
//! ## Main Structures
//! - `ReactionNetwork`: arena, reaction tables, settings, unknown count
//!
//! ## Main Methods
//! - `super_cluster_flux`: flux of one super-cluster at one grid point
//! - `compute_super_cluster_fluxes`: super-cluster rows of the right-hand side as a `DVector`
//! - `compute_partial_derivatives`: Jacobian rows of one super-cluster into slot-mapped storage
//! - `compute_dense_jacobian`: super-cluster rows of the Jacobian as a `DMatrix`
//! - `output_coefficients_to`, `coefficients_json`, `summary_table`: diagnostics

use crate::Clusters::cluster::{ClusterEnum, Reactant};
use crate::Clusters::super_cluster::SuperCluster;
use crate::Flux::partial_derivatives::PartialsIdxMap;
use crate::Flux::super_flux::{FluxContext, SuperClusterFlux};
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::reaction::{DissociationReaction, ProductionReaction};
use crate::settings::NetworkSettings;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use serde_json::json;
use std::collections::BTreeSet;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    settings: NetworkSettings,
    clusters: Vec<ClusterEnum>,
    production: Vec<ProductionReaction>,
    dissociation: Vec<DissociationReaction>,
    super_ids: Vec<usize>,
    dof: usize,
    zeroth: bool,
}

impl ReactionNetwork {
    pub(crate) fn from_parts(
        settings: NetworkSettings,
        clusters: Vec<ClusterEnum>,
        production: Vec<ProductionReaction>,
        dissociation: Vec<DissociationReaction>,
        super_ids: Vec<usize>,
        dof: usize,
    ) -> Self {
        Self {
            settings,
            clusters,
            production,
            dissociation,
            super_ids,
            dof,
            zeroth: false,
        }
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }
    pub fn clusters(&self) -> &[ClusterEnum] {
        &self.clusters
    }
    pub fn production_reactions(&self) -> &[ProductionReaction] {
        &self.production
    }
    pub fn dissociation_reactions(&self) -> &[DissociationReaction] {
        &self.dissociation
    }
    pub fn super_ids(&self) -> &[usize] {
        &self.super_ids
    }
    /// number of unknowns per grid point
    pub fn dof(&self) -> usize {
        self.dof
    }
    pub fn grid_points(&self) -> usize {
        self.settings.grid_points
    }
    pub fn uses_zeroth_order(&self) -> bool {
        self.zeroth
    }

    pub fn cluster(&self, id: usize) -> Result<&ClusterEnum, NetworkError> {
        self.clusters.get(id).ok_or(NetworkError::UnknownCluster(id))
    }

    pub fn super_cluster(&self, id: usize) -> Result<&SuperCluster, NetworkError> {
        self.cluster(id)?
            .as_super()
            .ok_or(NetworkError::NotASuperCluster(id))
    }

    pub fn super_clusters(&self) -> impl Iterator<Item = &SuperCluster> {
        self.super_ids
            .iter()
            .filter_map(|id| self.clusters[*id].as_super())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ClusterEnum> {
        self.clusters.iter().find(|c| c.name() == name)
    }

    pub fn context(&self) -> FluxContext<'_> {
        FluxContext {
            clusters: &self.clusters,
            production: &self.production,
            dissociation: &self.dissociation,
            config: &self.settings.moments,
        }
    }

    ////////////////////////////STRUCTURE/////////////////////////////////////

    /// Recomputes the reaction and dissociation connectivity of every cluster from the aggregated lists.
    pub fn reset_connectivities(&mut self) {
        let config = &self.settings.moments;
        let sets: Vec<(usize, (BTreeSet<usize>, BTreeSet<usize>))> = self
            .super_clusters()
            .map(|sc| (sc.id(), sc.connectivity_from(&self.clusters, config)))
            .collect();
        for cluster in self.clusters.iter_mut() {
            if let ClusterEnum::Single(single) = cluster {
                single.reset_connectivities();
            }
        }
        let mut total = 0;
        for (id, pair) in sets {
            total += pair.0.len() + pair.1.len();
            if let Some(sc) = self.clusters[id].as_super_mut() {
                sc.set_connectivities(pair);
            }
        }
        info!(
            "connectivity reset for {} super-clusters, {} connections",
            self.super_ids.len(),
            total
        );
    }

    /// Switches every super-cluster to the zeroth order lists. Only valid when no moment is tracked.
    pub fn use_zeroth_moment_specializations(&mut self) -> Result<(), NetworkError> {
        let ps = self.settings.moments.ps_dim();
        if ps != 1 {
            return Err(NetworkError::MomentsTracked(ps));
        }
        if self.zeroth {
            warn!("zeroth order lists already in use");
            return Ok(());
        }
        let release = self.settings.release_full_lists;
        for id in self.super_ids.iter() {
            if let Some(sc) = self.clusters[*id].as_super_mut() {
                sc.use_zeroth_moment_specializations(release);
            }
        }
        self.zeroth = true;
        Ok(())
    }

    fn check_state(&self, concs: &[f64], xi: usize) -> Result<(), NetworkError> {
        if concs.len() != self.dof {
            return Err(NetworkError::StateLength {
                expected: self.dof,
                got: concs.len(),
            });
        }
        if xi >= self.settings.grid_points {
            return Err(NetworkError::GridIndex {
                xi,
                grid_points: self.settings.grid_points,
            });
        }
        Ok(())
    }

    ////////////////////////////FLUX/////////////////////////////////////

    pub fn super_cluster_flux(
        &self,
        id: usize,
        concs: &[f64],
        xi: usize,
    ) -> Result<SuperClusterFlux, NetworkError> {
        self.check_state(concs, xi)?;
        Ok(self.super_cluster(id)?.total_flux(&self.context(), concs, xi))
    }

    /// Rows of the super-cluster unknowns (concentration and moments); other rows are left at zero.
    pub fn compute_super_cluster_fluxes(
        &self,
        concs: &[f64],
        xi: usize,
    ) -> Result<DVector<f64>, NetworkError> {
        self.check_state(concs, xi)?;
        let ctx = self.context();
        let config = &self.settings.moments;
        let mut rhs = DVector::zeros(self.dof);
        for sc in self.super_clusters() {
            let flux = sc.total_flux(&ctx, concs, xi);
            rhs[sc.id()] += flux.flux;
            for i in 1..config.ps_dim() {
                let axis = config.axis(i);
                if let Some(row) = sc.moment_id(axis) {
                    rhs[row] += flux.moment_flux[axis];
                }
            }
        }
        Ok(rhs)
    }

    ////////////////////////////JACOBIAN/////////////////////////////////////

    /// One map per column type, slots in ascending order of the connected unknowns.
    pub fn partials_idx_maps(&self, id: usize) -> Result<Vec<PartialsIdxMap>, NetworkError> {
        let sc = self.super_cluster(id)?;
        let connected: BTreeSet<usize> = sc
            .reaction_connectivity()
            .union(sc.dissociation_connectivity())
            .copied()
            .collect();
        let map: PartialsIdxMap = connected
            .into_iter()
            .enumerate()
            .map(|(slot, global)| (global, slot))
            .collect();
        Ok(vec![map; self.settings.moments.ps_dim()])
    }

    /// Adds the partial derivatives of super-cluster `id` into `partials[i][maps[j][global]]`.
    pub fn compute_partial_derivatives(
        &self,
        id: usize,
        concs: &[f64],
        xi: usize,
        maps: &[PartialsIdxMap],
        partials: &mut [Vec<f64>],
    ) -> Result<(), NetworkError> {
        self.check_state(concs, xi)?;
        let sc = self.super_cluster(id)?;
        if !self.zeroth {
            return sc.compute_partial_derivatives(&self.context(), concs, xi, maps, partials);
        }
        let mut row = vec![0.0; self.dof];
        sc.compute_partial_derivatives0(&self.context(), concs, xi, &mut row);
        for (global, value) in row.iter().enumerate().filter(|(_, v)| **v != 0.0) {
            let slot = maps[0]
                .get(&global)
                .ok_or(NetworkError::UnmappedPartialIndex { column: 0, index: global })?;
            partials[0][*slot] += *value;
        }
        Ok(())
    }

    /// Super-cluster rows of the Jacobian at grid point `xi`.
    pub fn compute_dense_jacobian(
        &self,
        concs: &[f64],
        xi: usize,
    ) -> Result<DMatrix<f64>, NetworkError> {
        self.check_state(concs, xi)?;
        let ctx = self.context();
        let config = &self.settings.moments;
        let ps = config.ps_dim();
        let mut jac = DMatrix::zeros(self.dof, self.dof);
        for sc in self.super_clusters() {
            let mut rows = vec![vec![0.0; self.dof]; ps];
            if self.zeroth {
                sc.compute_partial_derivatives0(&ctx, concs, xi, &mut rows[0]);
            } else {
                sc.compute_partial_derivatives_dense(&ctx, concs, xi, &mut rows)?;
            }
            for (i, row) in rows.iter().enumerate() {
                let target = if i == 0 {
                    Some(sc.id())
                } else {
                    sc.moment_id(config.axis(i))
                };
                if let Some(r) = target {
                    for (c, value) in row.iter().enumerate() {
                        jac[(r, c)] += *value;
                    }
                }
            }
        }
        Ok(jac)
    }

    ////////////////////////////DIAGNOSTICS/////////////////////////////////////

    pub fn output_coefficients_to<W: Write>(&self, os: &mut W) -> Result<(), NetworkError> {
        for sc in self.super_clusters() {
            sc.output_coefficients_to(os, &self.clusters)?;
        }
        Ok(())
    }

    /// Aggregated lists of every super-cluster as pretty-printed JSON.
    pub fn coefficients_json(&self) -> Result<String, NetworkError> {
        let groups: Vec<serde_json::Value> = self
            .super_clusters()
            .map(|sc| {
                json!({
                    "name": sc.name(),
                    "id": sc.id(),
                    "n_tot": sc.n_tot(),
                    "lists": sc.lists(),
                    "zeroth_order": sc.zeroth_order_lists(),
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&groups)?)
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        let header = [
            "name", "id", "nTot", "full", "reacting", "combining", "dissociating", "emitting",
        ];
        table.add_row(Row::new(header.iter().map(|h| Cell::new(h)).collect()));
        for sc in self.super_clusters() {
            let (reacting, combining, dissociating, emitting) = match sc.zeroth_order_lists() {
                Some(l) => (
                    l.reacting.len(),
                    l.combining.len(),
                    l.dissociating.len(),
                    l.emission.len(),
                ),
                None => (
                    sc.lists().reacting.len(),
                    sc.lists().combining.len(),
                    sc.lists().dissociating.len(),
                    sc.lists().emission.len(),
                ),
            };
            let row = [
                sc.name().to_string(),
                sc.id().to_string(),
                sc.n_tot().to_string(),
                sc.is_full().to_string(),
                reacting.to_string(),
                combining.to_string(),
                dissociating.to_string(),
                emitting.to_string(),
            ];
            table.add_row(Row::new(row.iter().map(|v| Cell::new(v)).collect()));
        }
        table
    }

    pub fn print_summary_table(&self) {
        self.summary_table().printstd();
    }
}
