//! # Super-Cluster Flux
//!
//! ## Purpose
//! Contracts the aggregated lists of a super-cluster with the current state of its partners and
//! produces the rate of change of its total concentration and of its tracked first moments at one
//! grid point.
//!
//! ## Contractions
//! With `l_X = [c_X, m_X(axis(1)), ..]` the expansion state of cluster X and `value = k(xi) / nTot`:
//! - production (`+`): `sum[k] = Σ_j Σ_i coefs[j][i][k] l_A[j] l_B[i]`
//! - combination (`−`): `sum[k] = Σ_i Σ_j coefs[i][j][k] l_self[i] l_other[j]`
//! - dissociation (`+`): `sum[j] = Σ_i coefs[i][j] l_parent[i]`
//! - emission (`−`): `sum[j] = Σ_i coefs[i][j] l_self[i]`
//!
//! `value · sum[0]` goes to the scalar flux and `value · sum[i]` to `moment_flux[axis(i)]`, both with
//! the sign of the reaction kind.
//!
//! The zeroth order path reads only `coeff0` from the shadow lists and performs one multiply-add per
//! entry. It is selected once, by `use_zeroth_moment_specializations`, never per call.

use crate::Clusters::cluster::{ClusterEnum, N_AXES, Reactant};
use crate::Clusters::super_cluster::SuperCluster;
use crate::Reactions::reaction::{DissociationReaction, ProductionReaction};
use crate::settings::{MAX_PS_DIM, MomentConfig};
use std::ops::AddAssign;

/// Read-only view of the network handed to every evaluation call.
#[derive(Debug, Clone, Copy)]
pub struct FluxContext<'a> {
    pub clusters: &'a [ClusterEnum],
    pub production: &'a [ProductionReaction],
    pub dissociation: &'a [DissociationReaction],
    pub config: &'a MomentConfig,
}

/// Rate of change of a super-cluster's total concentration and first moments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuperClusterFlux {
    pub flux: f64,
    /// indexed by composition axis; untracked axes stay zero
    pub moment_flux: [f64; N_AXES],
}

impl AddAssign for SuperClusterFlux {
    fn add_assign(&mut self, rhs: Self) {
        self.flux += rhs.flux;
        for axis in 0..N_AXES {
            self.moment_flux[axis] += rhs.moment_flux[axis];
        }
    }
}

impl SuperClusterFlux {
    fn accumulate(&mut self, sign: f64, value: f64, sum: &[f64; MAX_PS_DIM], config: &MomentConfig) {
        self.flux += sign * value * sum[0];
        for i in 1..config.ps_dim() {
            self.moment_flux[config.axis(i)] += sign * value * sum[i];
        }
    }
}

/// `[concentration, moment(axis(1)), ..]`
pub(crate) fn expansion_state<R: Reactant + ?Sized>(
    cluster: &R,
    concs: &[f64],
    config: &MomentConfig,
) -> [f64; MAX_PS_DIM] {
    let mut l = [0.0; MAX_PS_DIM];
    l[0] = cluster.concentration(concs);
    for i in 1..config.ps_dim() {
        l[i] = cluster.moment(concs, config.axis(i));
    }
    l
}

impl SuperCluster {
    pub fn production_flux(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let ps = ctx.config.ps_dim();
        for pair in self.lists.reacting.iter() {
            let la = expansion_state(&ctx.clusters[pair.first], concs, ctx.config);
            let lb = expansion_state(&ctx.clusters[pair.second], concs, ctx.config);
            let mut sum = [0.0; MAX_PS_DIM];
            for k in 0..ps {
                for j in 0..ps {
                    for i in 0..ps {
                        sum[k] += pair.coefs[(j, i, k)] * la[j] * lb[i];
                    }
                }
            }
            let value = ctx.production[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.accumulate(1.0, value, &sum, ctx.config);
        }
    }

    pub fn combination_flux(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let ps = ctx.config.ps_dim();
        let la = expansion_state(self, concs, ctx.config);
        for comb in self.lists.combining.iter() {
            let lb = expansion_state(&ctx.clusters[comb.other], concs, ctx.config);
            let mut sum = [0.0; MAX_PS_DIM];
            for k in 0..ps {
                for j in 0..ps {
                    for i in 0..ps {
                        sum[k] += comb.coefs[(i, j, k)] * la[i] * lb[j];
                    }
                }
            }
            let value = ctx.production[comb.reaction].rate(xi) / self.n_tot() as f64;
            out.accumulate(-1.0, value, &sum, ctx.config);
        }
    }

    pub fn dissociation_flux(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let ps = ctx.config.ps_dim();
        for pair in self.lists.dissociating.iter() {
            let la = expansion_state(&ctx.clusters[pair.first], concs, ctx.config);
            let mut sum = [0.0; MAX_PS_DIM];
            for j in 0..ps {
                for i in 0..ps {
                    sum[j] += pair.coefs[(i, j)] * la[i];
                }
            }
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.accumulate(1.0, value, &sum, ctx.config);
        }
    }

    pub fn emission_flux(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let ps = ctx.config.ps_dim();
        let la = expansion_state(self, concs, ctx.config);
        for pair in self.lists.emission.iter() {
            let mut sum = [0.0; MAX_PS_DIM];
            for j in 0..ps {
                for i in 0..ps {
                    sum[j] += pair.coefs[(i, j)] * la[i];
                }
            }
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.accumulate(-1.0, value, &sum, ctx.config);
        }
    }

    ////////////////////////////ZEROTH ORDER/////////////////////////////////////

    pub fn production_flux0(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        for pair in self.lists0.iter().flat_map(|l| l.reacting.iter()) {
            let la = ctx.clusters[pair.first].concentration(concs);
            let lb = ctx.clusters[pair.second].concentration(concs);
            let value = ctx.production[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.flux += value * pair.coeff0 * la * lb;
        }
    }

    pub fn combination_flux0(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let la = self.concentration(concs);
        for comb in self.lists0.iter().flat_map(|l| l.combining.iter()) {
            let lb = ctx.clusters[comb.other].concentration(concs);
            let value = ctx.production[comb.reaction].rate(xi) / self.n_tot() as f64;
            out.flux -= value * comb.coeff0 * la * lb;
        }
    }

    pub fn dissociation_flux0(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        for pair in self.lists0.iter().flat_map(|l| l.dissociating.iter()) {
            let la = ctx.clusters[pair.first].concentration(concs);
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.flux += value * pair.coeff0 * la;
        }
    }

    pub fn emission_flux0(&self, ctx: &FluxContext, concs: &[f64], xi: usize, out: &mut SuperClusterFlux) {
        let la = self.concentration(concs);
        for pair in self.lists0.iter().flat_map(|l| l.emission.iter()) {
            let value = ctx.dissociation[pair.reaction].rate(xi) / self.n_tot() as f64;
            out.flux -= value * pair.coeff0 * la;
        }
    }

    /// Net flux of this super-cluster at grid point `xi`, on the zeroth order path once it is built.
    pub fn total_flux(&self, ctx: &FluxContext, concs: &[f64], xi: usize) -> SuperClusterFlux {
        let mut out = SuperClusterFlux::default();
        if self.lists0.is_some() {
            self.production_flux0(ctx, concs, xi, &mut out);
            self.combination_flux0(ctx, concs, xi, &mut out);
            self.dissociation_flux0(ctx, concs, xi, &mut out);
            self.emission_flux0(ctx, concs, xi, &mut out);
        } else {
            self.production_flux(ctx, concs, xi, &mut out);
            self.combination_flux(ctx, concs, xi, &mut out);
            self.dissociation_flux(ctx, concs, xi, &mut out);
            self.emission_flux(ctx, concs, xi, &mut out);
        }
        out
    }
}
