//! # Coefficient Synthesizer
//!
//! ## Purpose
//! Computes the increments that one elementary reaction, a batch of them, or a whole overlap region
//! adds to an aggregated entry of a super-cluster. Every function here is a pure function of the
//! network geometry and returns a fresh tensor; the builder adds it to the entry with `+=`.
//!
//! ## Modes
//! - **explicit**: one elementary reaction given by member compositions. With `distance[0] = factor[0] = 1`
//!   the update is the outer product `d_A[i] d_B[j] f[k]` (production), `d[j] f[k]` into `coefs[j][0][k]`
//!   (combining) or `d[i] f[j]` (dissociation, emission).
//! - **pending**: the explicit update summed over a batch of `PendingProductionReactionInfo`.
//! - **overlap**: the explicit update summed analytically over every member pair of an overlap region
//!   between the composite group and the grouped partner shifted by the fixed composition of the
//!   non-grouped operand. Singleton axes contribute no first or second order term.
//!
//! Expansion position `i` (1..psDim) refers to composition axis `config.axis(i)` everywhere: in the
//! bounds, the widths, the means and the dispersions.

use crate::Clusters::cluster::{ClusterEnum, N_AXES, Reactant, V_AXIS};
use crate::Clusters::super_cluster::SuperCluster;
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::effective_lists::{DissociationCoefficients, ProductionCoefficients};
use crate::Reactions::moment_sums::{
    first_order_sum, second_order_offset_sum, second_order_sum,
};
use crate::Reactions::reaction::PendingProductionReactionInfo;
use crate::settings::{MAX_PS_DIM, MomentConfig};

/// Overlap of the composite group with the shifted grouped partner along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOverlap {
    /// inclusive range inside the composite group
    pub composite: (i32, i32),
    /// the same range seen from the grouped partner, `composite - shift`
    pub group: (i32, i32),
    /// inclusive bounds of the grouped partner
    pub group_bounds: (i32, i32),
    /// composition of the non-grouped operand, minus its interstitials on the V axis
    pub shift: i32,
    pub width: i32,
}

impl AxisOverlap {
    fn group_mean(&self) -> f64 {
        (self.group_bounds.0 + self.group_bounds.1) as f64 / 2.0
    }
    fn group_span(&self) -> i32 {
        self.group_bounds.1 - self.group_bounds.0
    }
}

/// Per-axis overlap of `composite` with `group` shifted by `single`, and the number of member pairs
/// it folds. A width below one on any axis is rejected.
pub fn overlap_region<C, G, S>(
    composite: &C,
    group: &G,
    single: &S,
) -> Result<([AxisOverlap; N_AXES], f64), NetworkError>
where
    C: Reactant + ?Sized,
    G: Reactant + ?Sized,
    S: Reactant + ?Sized,
{
    let mut axes = [AxisOverlap {
        composite: (0, 0),
        group: (0, 0),
        group_bounds: (0, 0),
        shift: 0,
        width: 0,
    }; N_AXES];
    let mut n_overlap = 1.0;
    for axis in 0..N_AXES {
        let c = composite.bounds(axis);
        let g = group.bounds(axis);
        let mut shift = single.bounds(axis).first();
        if axis == V_AXIS {
            shift -= single.interstitial_size();
        }
        let lo = c.first().max(g.first() + shift);
        let hi = c.last().min(g.last() + shift);
        let width = hi - lo + 1;
        if width < 1 {
            return Err(NetworkError::EmptyOverlap { axis, width });
        }
        axes[axis] = AxisOverlap {
            composite: (lo, hi),
            group: (lo - shift, hi - shift),
            group_bounds: (g.first(), g.last()),
            shift,
            width,
        };
        n_overlap *= width as f64;
    }
    Ok((axes, n_overlap))
}

fn fos(range: (i32, i32), mean: f64) -> f64 {
    first_order_sum(range.0, range.1, mean)
}

fn sos(range: (i32, i32), mean: f64) -> f64 {
    second_order_sum(range.0, range.1, mean)
}

/// `[1, v(axis(1)), ..]` for the expansion positions of `config`
fn expansion<F: Fn(usize) -> f64>(config: &MomentConfig, f: F) -> [f64; MAX_PS_DIM] {
    let mut out = [0.0; MAX_PS_DIM];
    out[0] = 1.0;
    for i in 1..config.ps_dim() {
        out[i] = f(config.axis(i));
    }
    out
}

impl SuperCluster {
    ////////////////////////////PRODUCTION: THIS IS THE PRODUCT/////////////////////////////////////

    /// `first + second -> self` for product member `a` and grouped reactant member `b`
    pub fn result_from(
        &self,
        first: &ClusterEnum,
        second: &ClusterEnum,
        a: &[i32; N_AXES],
        b: &[i32; N_AXES],
        config: &MomentConfig,
    ) -> ProductionCoefficients {
        let ps = config.ps_dim();
        let d_first = expansion(config, |ax| first.distance(b[ax], ax));
        let d_second = expansion(config, |ax| second.distance(b[ax], ax));
        let factor = expansion(config, |ax| self.factor(a[ax], ax));
        let mut coefs = ProductionCoefficients::zeros(ps);
        for i in 0..ps {
            for j in 0..ps {
                for k in 0..ps {
                    coefs[(i, j, k)] += d_first[i] * d_second[j] * factor[k];
                }
            }
        }
        coefs
    }

    pub fn result_from_pending(
        &self,
        first: &ClusterEnum,
        second: &ClusterEnum,
        infos: &[PendingProductionReactionInfo],
        config: &MomentConfig,
    ) -> ProductionCoefficients {
        let mut coefs = ProductionCoefficients::zeros(config.ps_dim());
        for info in infos {
            coefs += &self.result_from(first, second, &info.a, &info.b, config);
        }
        coefs
    }

    /// Every member pair of the grouped reactant and the fixed reactant whose sum lands inside
    /// this group. Exactly one reactant must be grouped; its moment carries the first order terms.
    pub fn result_from_overlap(
        &self,
        first: &ClusterEnum,
        second: &ClusterEnum,
        config: &MomentConfig,
    ) -> Result<ProductionCoefficients, NetworkError> {
        let first_grouped = first.is_grouped();
        let (group, single) = match (first_grouped, second.is_grouped()) {
            (true, false) => (first, second),
            (false, true) => (second, first),
            (true, true) => return Err(NetworkError::GroupedPartners(2)),
            (false, false) => return Err(NetworkError::GroupedPartners(0)),
        };
        let (axes, n_overlap) = overlap_region(self, group, single)?;
        // position of the grouped reactant's expansion index
        let slot = |i: usize, k: usize| if first_grouped { (i, 0, k) } else { (0, i, k) };

        let ps = config.ps_dim();
        let mut coefs = ProductionCoefficients::zeros(ps);
        coefs[(0, 0, 0)] += n_overlap;
        for i in 1..ps {
            let ax = config.axis(i);
            let o = axes[ax];
            let w = o.width as f64;
            let disp = self.dispersion(ax);
            coefs[(0, 0, i)] += n_overlap / (disp * w) * fos(o.composite, self.num_atom(ax));

            if o.group_span() != 0 {
                let span = o.group_span() as f64;
                let a = 2.0 * n_overlap / (span * w) * fos(o.group, o.group_mean());
                coefs[slot(i, 0)] += a;
                let a = 2.0 * n_overlap / (span * w * disp)
                    * second_order_offset_sum(
                        o.composite.0,
                        o.composite.1,
                        self.num_atom(ax),
                        o.group_mean(),
                        -o.shift,
                    );
                coefs[slot(i, i)] += a;
            }

            for j in 1..ps {
                if i == j || o.group_span() == 0 {
                    continue;
                }
                let axj = config.axis(j);
                let oj = axes[axj];
                let a = 2.0 * n_overlap
                    / (o.group_span() as f64 * w * oj.width as f64 * self.dispersion(axj))
                    * fos(o.group, o.group_mean())
                    * fos(oj.composite, self.num_atom(axj));
                coefs[slot(i, j)] += a;
            }
        }
        Ok(coefs)
    }

    ////////////////////////////PRODUCTION: THIS IS CONSUMED/////////////////////////////////////

    /// `self + other -> product` for member `a` of this group
    pub fn participate_in(&self, a: &[i32; N_AXES], config: &MomentConfig) -> ProductionCoefficients {
        let ps = config.ps_dim();
        let distance = expansion(config, |ax| self.distance(a[ax], ax));
        let factor = expansion(config, |ax| self.factor(a[ax], ax));
        let mut coefs = ProductionCoefficients::zeros(ps);
        for j in 0..ps {
            for k in 0..ps {
                coefs[(j, 0, k)] += distance[j] * factor[k];
            }
        }
        coefs
    }

    pub fn participate_in_pending(
        &self,
        infos: &[PendingProductionReactionInfo],
        config: &MomentConfig,
    ) -> ProductionCoefficients {
        let mut coefs = ProductionCoefficients::zeros(config.ps_dim());
        for info in infos {
            coefs += &self.participate_in(&info.b, config);
        }
        coefs
    }

    /// Every member of this group that, combined with the fixed `other`, lands inside `product`.
    pub fn participate_in_overlap(
        &self,
        product: &ClusterEnum,
        other: &ClusterEnum,
        config: &MomentConfig,
    ) -> Result<ProductionCoefficients, NetworkError> {
        if other.is_grouped() {
            return Err(NetworkError::GroupedPartners(2));
        }
        let (axes, n_overlap) = overlap_region(product, self, other)?;

        let ps = config.ps_dim();
        let mut coefs = ProductionCoefficients::zeros(ps);
        coefs[(0, 0, 0)] += n_overlap;
        for i in 1..ps {
            let ax = config.axis(i);
            let o = axes[ax];
            let w = o.width as f64;
            let disp = self.dispersion(ax);
            let mean = self.num_atom(ax);
            coefs[(0, 0, i)] += n_overlap / (disp * w) * fos(o.group, mean);

            let section = self.section_width(ax);
            if section == 1 {
                continue;
            }
            let s1 = (section - 1) as f64;
            coefs[(i, 0, 0)] += 2.0 * n_overlap / (s1 * w) * fos(o.group, mean);
            coefs[(i, 0, i)] += 2.0 * n_overlap / (s1 * w * disp) * sos(o.group, mean);

            for j in 1..ps {
                if i == j {
                    continue;
                }
                let axj = config.axis(j);
                let oj = axes[axj];
                coefs[(i, 0, j)] += 2.0 * n_overlap
                    / (s1 * w * oj.width as f64 * self.dispersion(axj))
                    * fos(o.group, mean)
                    * fos(oj.group, self.num_atom(axj));
            }
        }
        Ok(coefs)
    }

    ////////////////////////////DISSOCIATION: THIS IS EMITTED/////////////////////////////////////

    /// `dissociating -> self + partner` for parent member `a` and member `b` of this group
    pub fn participate_in_dissociation(
        &self,
        dissociating: &ClusterEnum,
        a: &[i32; N_AXES],
        b: &[i32; N_AXES],
        config: &MomentConfig,
    ) -> DissociationCoefficients {
        let ps = config.ps_dim();
        let distance = expansion(config, |ax| dissociating.distance(a[ax], ax));
        let factor = expansion(config, |ax| self.factor(b[ax], ax));
        let mut coefs = DissociationCoefficients::zeros(ps);
        for i in 0..ps {
            for j in 0..ps {
                coefs[(i, j)] += distance[i] * factor[j];
            }
        }
        coefs
    }

    pub fn participate_in_dissociation_pending(
        &self,
        dissociating: &ClusterEnum,
        infos: &[PendingProductionReactionInfo],
        config: &MomentConfig,
    ) -> DissociationCoefficients {
        let mut coefs = DissociationCoefficients::zeros(config.ps_dim());
        for info in infos {
            coefs += &self.participate_in_dissociation(dissociating, &info.a, &info.b, config);
        }
        coefs
    }

    /// Every member of `dissociating` that splits into the fixed `emitted` and a member of this group.
    pub fn participate_in_dissociation_overlap(
        &self,
        dissociating: &ClusterEnum,
        emitted: &ClusterEnum,
        config: &MomentConfig,
    ) -> Result<DissociationCoefficients, NetworkError> {
        if emitted.is_grouped() {
            return Err(NetworkError::GroupedPartners(2));
        }
        let (axes, n_overlap) = overlap_region(dissociating, self, emitted)?;

        let ps = config.ps_dim();
        let mut coefs = DissociationCoefficients::zeros(ps);
        coefs[(0, 0)] += n_overlap;
        for i in 1..ps {
            let ax = config.axis(i);
            let o = axes[ax];
            let w = o.width as f64;
            let disp = self.dispersion(ax);
            coefs[(0, i)] += n_overlap / (disp * w) * fos(o.group, self.num_atom(ax));

            let parent = dissociating.bounds(ax);
            let span = parent.last() - parent.first();
            if span == 0 {
                continue;
            }
            let span = span as f64;
            let parent_mean = (parent.first() + parent.last()) as f64 / 2.0;
            coefs[(i, 0)] += 2.0 * n_overlap / (span * w) * fos(o.composite, parent_mean);
            coefs[(i, i)] += 2.0 * n_overlap / (span * w * disp)
                * second_order_offset_sum(
                    o.composite.0,
                    o.composite.1,
                    parent_mean,
                    self.num_atom(ax),
                    -o.shift,
                );

            for j in 1..ps {
                if i == j {
                    continue;
                }
                let axj = config.axis(j);
                let oj = axes[axj];
                coefs[(i, j)] += 2.0 * n_overlap
                    / (span * w * oj.width as f64 * self.dispersion(axj))
                    * fos(o.composite, parent_mean)
                    * fos(oj.group, self.num_atom(axj));
            }
        }
        Ok(coefs)
    }

    ////////////////////////////DISSOCIATION: THIS IS THE PARENT/////////////////////////////////////

    /// `self -> first + second` for member `a` of this group
    pub fn emit_from(&self, a: &[i32; N_AXES], config: &MomentConfig) -> DissociationCoefficients {
        let ps = config.ps_dim();
        let distance = expansion(config, |ax| self.distance(a[ax], ax));
        let factor = expansion(config, |ax| self.factor(a[ax], ax));
        let mut coefs = DissociationCoefficients::zeros(ps);
        for i in 0..ps {
            for j in 0..ps {
                coefs[(i, j)] += distance[i] * factor[j];
            }
        }
        coefs
    }

    pub fn emit_from_pending(
        &self,
        infos: &[PendingProductionReactionInfo],
        config: &MomentConfig,
    ) -> DissociationCoefficients {
        let mut coefs = DissociationCoefficients::zeros(config.ps_dim());
        for info in infos {
            coefs += &self.emit_from(&info.a, config);
        }
        coefs
    }

    /// Every member of this group that splits into a member of the grouped product and the fixed one.
    pub fn emit_from_overlap(
        &self,
        first: &ClusterEnum,
        second: &ClusterEnum,
        config: &MomentConfig,
    ) -> Result<DissociationCoefficients, NetworkError> {
        let (group, single) = match (first.is_grouped(), second.is_grouped()) {
            (true, false) => (first, second),
            (false, true) => (second, first),
            (true, true) => return Err(NetworkError::GroupedPartners(2)),
            (false, false) => return Err(NetworkError::GroupedPartners(0)),
        };
        let (axes, n_overlap) = overlap_region(self, group, single)?;

        let ps = config.ps_dim();
        let mut coefs = DissociationCoefficients::zeros(ps);
        coefs[(0, 0)] += n_overlap;
        for i in 1..ps {
            let ax = config.axis(i);
            let o = axes[ax];
            let w = o.width as f64;
            let disp = self.dispersion(ax);
            let mean = self.num_atom(ax);
            coefs[(0, i)] += n_overlap / (disp * w) * fos(o.composite, mean);

            let section = self.section_width(ax);
            if section == 1 {
                continue;
            }
            let s1 = (section - 1) as f64;
            coefs[(i, 0)] += 2.0 * n_overlap / (s1 * w) * fos(o.composite, mean);
            coefs[(i, i)] += 2.0 * n_overlap / (s1 * w * disp) * sos(o.composite, mean);

            for j in 1..ps {
                if i == j {
                    continue;
                }
                let axj = config.axis(j);
                let oj = axes[axj];
                coefs[(i, j)] += 2.0 * n_overlap
                    / (s1 * w * oj.width as f64 * self.dispersion(axj))
                    * fos(o.composite, mean)
                    * fos(oj.composite, self.num_atom(axj));
            }
        }
        Ok(coefs)
    }
}
