//! # Jacobian Assembler
//!
//! Partial derivatives of the four flux contractions of `super_flux`, with the same tensors and the
//! same index order. Row `i` of the output is the derivative of `sum[i]` (scalar flux for `i = 0`,
//! moment flux of `axis(i)` otherwise). Columns are the global unknowns of the partner clusters:
//! column type `j = 0` is the concentration, `j >= 1` the first moment along `axis(j)`. Partners
//! without that moment (individual clusters) contribute no column.
//!
//! Three storage layouts:
//! - slot mapped: `partials[i][maps[j][global]]`, the layout of a sparse row
//! - dense: `partials[i][global]`
//! - zeroth order: `partials[global]`, single row, read from the `coeff0` shadows

use crate::Clusters::cluster::{ClusterEnum, Reactant};
use crate::Clusters::super_cluster::SuperCluster;
use crate::Flux::super_flux::{FluxContext, expansion_state};
use crate::ReactionNetwork::network_error::NetworkError;
use crate::settings::{MAX_PS_DIM, MomentConfig};
use std::collections::HashMap;

/// global unknown index -> position in a row of partial derivatives
pub type PartialsIdxMap = HashMap<usize, usize>;

trait PartialsSink {
    fn add(&mut self, row: usize, column: usize, global: usize, value: f64) -> Result<(), NetworkError>;
}

struct MappedPartials<'a> {
    maps: &'a [PartialsIdxMap],
    partials: &'a mut [Vec<f64>],
}

impl PartialsSink for MappedPartials<'_> {
    fn add(&mut self, row: usize, column: usize, global: usize, value: f64) -> Result<(), NetworkError> {
        let slot = self.maps[column]
            .get(&global)
            .ok_or(NetworkError::UnmappedPartialIndex { column, index: global })?;
        self.partials[row][*slot] += value;
        Ok(())
    }
}

struct DensePartials<'a> {
    partials: &'a mut [Vec<f64>],
}

impl PartialsSink for DensePartials<'_> {
    fn add(&mut self, row: usize, _column: usize, global: usize, value: f64) -> Result<(), NetworkError> {
        self.partials[row][global] += value;
        Ok(())
    }
}

/// global index of column type `j` of `cluster`
fn column_of(cluster: &ClusterEnum, j: usize, config: &MomentConfig) -> Option<usize> {
    if j == 0 {
        Some(cluster.id())
    } else {
        cluster.moment_id(config.axis(j))
    }
}

fn own_column(cluster: &SuperCluster, j: usize, config: &MomentConfig) -> Option<usize> {
    if j == 0 {
        Some(cluster.id())
    } else {
        cluster.moment_id(config.axis(j))
    }
}

impl SuperCluster {
    // A + B -> this: dF/dC_A = k C_B, dF/dC_B = k C_A
    fn production_partials<S: PartialsSink>(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        sink: &mut S,
    ) -> Result<(), NetworkError> {
        let ps = ctx.config.ps_dim();
        for pair in self.lists.reacting.iter() {
            let first = &ctx.clusters[pair.first];
            let second = &ctx.clusters[pair.second];
            let la = expansion_state(first, concs, ctx.config);
            let lb = expansion_state(second, concs, ctx.config);
            let mut sum = [[[0.0; 2]; MAX_PS_DIM]; MAX_PS_DIM];
            for k in 0..ps {
                for j in 0..ps {
                    for i in 0..ps {
                        sum[k][j][0] += pair.coefs[(j, i, k)] * lb[i];
                        sum[k][j][1] += pair.coefs[(i, j, k)] * la[i];
                    }
                }
            }
            let value = ctx.production[pair.reaction].rate(xi) / self.n_tot() as f64;
            for j in 0..ps {
                if let Some(col) = column_of(first, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, value * sum[i][j][0])?;
                    }
                }
                if let Some(col) = column_of(second, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, value * sum[i][j][1])?;
                    }
                }
            }
        }
        Ok(())
    }

    // this + B -> C: dF/dC_this = -k C_B, dF/dC_B = -k C_this
    fn combination_partials<S: PartialsSink>(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        sink: &mut S,
    ) -> Result<(), NetworkError> {
        let ps = ctx.config.ps_dim();
        let la = expansion_state(self, concs, ctx.config);
        for comb in self.lists.combining.iter() {
            let other = &ctx.clusters[comb.other];
            let lb = expansion_state(other, concs, ctx.config);
            let mut sum = [[[0.0; 2]; MAX_PS_DIM]; MAX_PS_DIM];
            for k in 0..ps {
                for j in 0..ps {
                    for i in 0..ps {
                        sum[k][j][0] += comb.coefs[(i, j, k)] * la[i];
                        sum[k][j][1] += comb.coefs[(j, i, k)] * lb[i];
                    }
                }
            }
            let value = ctx.production[comb.reaction].rate(xi) / self.n_tot() as f64;
            for j in 0..ps {
                if let Some(col) = column_of(other, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, -value * sum[i][j][0])?;
                    }
                }
                if let Some(col) = own_column(self, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, -value * sum[i][j][1])?;
                    }
                }
            }
        }
        Ok(())
    }

    // A -> this + D: dF/dC_A = k
    fn dissociation_partials<S: PartialsSink>(
        &self,
        ctx: &FluxContext,
        xi: usize,
        sink: &mut S,
    ) -> Result<(), NetworkError> {
        let ps = ctx.config.ps_dim();
        for pair in self.lists.dissociating.iter() {
            let parent = &ctx.clusters[pair.first];
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            for j in 0..ps {
                if let Some(col) = column_of(parent, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, value * pair.coefs[(j, i)])?;
                    }
                }
            }
        }
        Ok(())
    }

    // this -> B + D: dF/dC_this = -k
    fn emission_partials<S: PartialsSink>(
        &self,
        ctx: &FluxContext,
        xi: usize,
        sink: &mut S,
    ) -> Result<(), NetworkError> {
        let ps = ctx.config.ps_dim();
        for pair in self.lists.emission.iter() {
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            for j in 0..ps {
                if let Some(col) = own_column(self, j, ctx.config) {
                    for i in 0..ps {
                        sink.add(i, j, col, -value * pair.coefs[(j, i)])?;
                    }
                }
            }
        }
        Ok(())
    }

    fn all_partials<S: PartialsSink>(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        sink: &mut S,
    ) -> Result<(), NetworkError> {
        self.production_partials(ctx, concs, xi, sink)?;
        self.combination_partials(ctx, concs, xi, sink)?;
        self.dissociation_partials(ctx, xi, sink)?;
        self.emission_partials(ctx, xi, sink)
    }

    /// Adds the partial derivatives of this cluster's flux rows into `partials[i][maps[j][global]]`.
    /// `maps` holds one map per column type, `partials` one row per expansion position.
    pub fn compute_partial_derivatives(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        maps: &[PartialsIdxMap],
        partials: &mut [Vec<f64>],
    ) -> Result<(), NetworkError> {
        let mut sink = MappedPartials { maps, partials };
        self.all_partials(ctx, concs, xi, &mut sink)
    }

    /// Same contributions addressed by global index, `partials[i][global]`.
    pub fn compute_partial_derivatives_dense(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        partials: &mut [Vec<f64>],
    ) -> Result<(), NetworkError> {
        let mut sink = DensePartials { partials };
        self.all_partials(ctx, concs, xi, &mut sink)
    }

    /// Zeroth order path: a single row addressed by global index. Panics when the zeroth order
    /// lists were never built.
    pub fn compute_partial_derivatives0(
        &self,
        ctx: &FluxContext,
        concs: &[f64],
        xi: usize,
        partials: &mut [f64],
    ) {
        let Some(lists0) = self.lists0.as_ref() else {
            panic!(
                "zeroth order lists of {} are not built, call use_zeroth_moment_specializations first",
                self.name()
            );
        };
        let n_tot = self.n_tot() as f64;
        let own = self.concentration(concs);
        for pair in lists0.reacting.iter() {
            let first = &ctx.clusters[pair.first];
            let second = &ctx.clusters[pair.second];
            let value = ctx.production[pair.reaction].rate(xi) / n_tot;
            partials[first.id()] += value * pair.coeff0 * second.concentration(concs);
            partials[second.id()] += value * pair.coeff0 * first.concentration(concs);
        }
        for comb in lists0.combining.iter() {
            let other = &ctx.clusters[comb.other];
            let value = ctx.production[comb.reaction].rate(xi) / n_tot;
            partials[other.id()] -= value * comb.coeff0 * own;
            partials[self.id()] -= value * comb.coeff0 * other.concentration(concs);
        }
        for pair in lists0.dissociating.iter() {
            let value = ctx.dissociation[pair.reaction].rate(xi) / n_tot;
            partials[ctx.clusters[pair.first].id()] += value * pair.coeff0;
        }
        for pair in lists0.emission.iter() {
            let value = ctx.dissociation[pair.reaction].rate(xi) / n_tot;
            partials[self.id()] -= value * pair.coeff0;
        }
    }
}
