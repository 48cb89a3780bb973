//! # Super-Cluster
//!
//! ## Purpose
//! A super-cluster folds a hyper-rectangle (possibly with holes) of He-D-T-V compositions into one
//! unknown: the total concentration, plus one first moment per tracked composition axis. This module
//! holds its geometry (bounds, widths, mean composition, dispersion, membership) and its aggregated
//! reaction lists. Coefficient synthesis lives in `Reactions::coefficients`, flux and Jacobian
//! evaluation in `Flux`.
//!
//! ## Main Structures
//! - `SuperCluster`: geometry, membership, lists, connectivity
//!
//! ## Key Formulas
//! - `sectionWidth[i] = hi - lo + 1`
//! - `dispersion[i] = 1` for a singleton axis, otherwise
//!   `2 (Σ n² − numAtom[i]·nTot·numAtom[i]) / (nTot (sectionWidth[i] − 1))`
//! - `distance(b, i) = 2 (b − numAtom[i]) / (sectionWidth[i] − 1)`, zero on a singleton axis
//! - `factor(b, i) = (b − numAtom[i]) / dispersion[i]`
//! - member radius `(√3/4) a + ∛(3a³v / 8π) − ∛(3a³ / 8π)`, averaged over the members

use crate::Clusters::cluster::{
    ClusterEnum, IntegerRange, N_AXES, PI, Reactant, ReactantType, TUNGSTEN_LATTICE_CONSTANT,
    V_AXIS,
};
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::effective_lists::{EffectiveLists, ZerothOrderLists};
use crate::settings::MomentConfig;
use log::{debug, info};
use std::collections::BTreeSet;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct SuperCluster {
    id: usize,
    name: String,
    size: i32,
    /// mean composition per axis (He, D, T, V)
    num_atom: [f64; N_AXES],
    n_tot: usize,
    section_width: [i32; N_AXES],
    bounds: [IntegerRange; N_AXES],
    dispersion: [f64; N_AXES],
    full: bool,
    hev_list: Vec<[i32; N_AXES]>,
    reaction_radius: f64,
    moment_ids: [Option<usize>; N_AXES],
    pub(crate) lists: EffectiveLists,
    pub(crate) lists0: Option<ZerothOrderLists>,
    reaction_connectivity: BTreeSet<usize>,
    dissociation_connectivity: BTreeSet<usize>,
}

impl SuperCluster {
    /// `lower` and `higher` are inclusive bounds per axis
    pub fn new(
        num: [f64; N_AXES],
        n_tot: usize,
        width: [i32; N_AXES],
        lower: [i32; N_AXES],
        higher: [i32; N_AXES],
    ) -> Self {
        let size = num.iter().map(|n| *n as i32).sum();
        let bounds = [0usize, 1, 2, 3].map(|i| IntegerRange::inclusive(lower[i], higher[i]));
        let full = width.iter().product::<i32>() as i64 == n_tot as i64;
        let name = format!(
            "He_{}D_{}T_{}V_{}",
            num[0] as i32, num[1] as i32, num[2] as i32, num[3] as i32
        );
        Self {
            id: 0,
            name,
            size,
            num_atom: num,
            n_tot,
            section_width: width,
            bounds,
            dispersion: [1.0; N_AXES],
            full,
            hev_list: Vec::new(),
            reaction_radius: 0.0,
            moment_ids: [None; N_AXES],
            lists: EffectiveLists::default(),
            lists0: None,
            reaction_connectivity: BTreeSet::new(),
            dissociation_connectivity: BTreeSet::new(),
        }
    }

    /// Dense group covering every composition of the inclusive box `[lower, higher]`, with its
    /// membership list already ingested.
    pub fn rectangle(lower: [i32; N_AXES], higher: [i32; N_AXES]) -> Result<Self, NetworkError> {
        let mut members = Vec::new();
        for he in lower[0]..=higher[0] {
            for d in lower[1]..=higher[1] {
                for t in lower[2]..=higher[2] {
                    for v in lower[3]..=higher[3] {
                        members.push([he, d, t, v]);
                    }
                }
            }
        }
        let width = [0usize, 1, 2, 3].map(|i| higher[i] - lower[i] + 1);
        let num = [0usize, 1, 2, 3].map(|i| (lower[i] + higher[i]) as f64 / 2.0);
        let mut cluster = Self::new(num, members.len(), width, lower, higher);
        cluster.validate()?;
        cluster.set_hev_vector(members)?;
        Ok(cluster)
    }

    /// bounds must not be inverted and the mean must lie inside them
    pub fn validate(&self) -> Result<(), NetworkError> {
        for axis in 0..N_AXES {
            let b = self.bounds[axis];
            if b.is_empty() {
                return Err(NetworkError::InvertedBounds {
                    name: self.name.clone(),
                    axis,
                    lo: b.first(),
                    hi: b.last(),
                });
            }
            let mean = self.num_atom[axis];
            if mean < b.first() as f64 || mean > b.last() as f64 {
                return Err(NetworkError::InvertedBounds {
                    name: format!("{} (mean {})", self.name, mean),
                    axis,
                    lo: b.first(),
                    hi: b.last(),
                });
            }
        }
        Ok(())
    }

    /// Ingests the explicit membership list, computes dispersions and the reaction radius.
    /// Members must lie inside the bounds and every axis wider than one must end up with a
    /// positive dispersion; on error the group is left untouched.
    pub fn set_hev_vector(&mut self, members: Vec<[i32; N_AXES]>) -> Result<(), NetworkError> {
        if members.len() != self.n_tot {
            return Err(NetworkError::MembershipCount {
                name: self.name.clone(),
                expected: self.n_tot,
                got: members.len(),
            });
        }
        let a = TUNGSTEN_LATTICE_CONSTANT;
        let a_cubed = a * a * a;
        let mut n_square = [0.0; N_AXES];
        let mut radius = 0.0;
        for member in members.iter() {
            if let Some(axis) = (0..N_AXES).find(|axis| !self.bounds[*axis].contains(member[*axis])) {
                return Err(NetworkError::MemberOutOfBounds {
                    name: self.name.clone(),
                    member: *member,
                    axis,
                });
            }
            let v = member[V_AXIS] as f64;
            let rad = (3.0_f64.sqrt() / 4.0) * a + ((3.0 * a_cubed * v) / (8.0 * PI)).cbrt()
                - ((3.0 * a_cubed) / (8.0 * PI)).cbrt();
            radius += rad / self.n_tot as f64;
            for axis in 0..N_AXES {
                n_square[axis] += (member[axis] * member[axis]) as f64;
            }
        }
        let mut dispersion = [1.0; N_AXES];
        for axis in 0..N_AXES {
            if self.section_width[axis] == 1 {
                continue;
            }
            let mean = self.num_atom[axis];
            let value = 2.0 * (n_square[axis] - mean * self.n_tot as f64 * mean)
                / (self.n_tot as f64 * (self.section_width[axis] - 1) as f64);
            // NaN for an empty membership
            if !(value > 0.0) {
                return Err(NetworkError::NonPositiveDispersion {
                    name: self.name.clone(),
                    axis,
                    value,
                });
            }
            dispersion[axis] = value;
        }
        self.dispersion = dispersion;
        self.reaction_radius = radius;
        self.hev_list = members;
        debug!(
            "{}: dispersion {:?}, radius {:.6}",
            self.name, self.dispersion, self.reaction_radius
        );
        Ok(())
    }

    pub fn num_atom(&self, axis: usize) -> f64 {
        self.num_atom[axis]
    }
    pub fn n_tot(&self) -> usize {
        self.n_tot
    }
    pub fn section_width(&self, axis: usize) -> i32 {
        self.section_width[axis]
    }
    pub fn dispersion(&self, axis: usize) -> f64 {
        self.dispersion[axis]
    }
    /// true when the group is a dense hyper-rectangle
    pub fn is_full(&self) -> bool {
        self.full
    }
    pub fn hev_list(&self) -> &[[i32; N_AXES]] {
        &self.hev_list
    }
    pub fn lists(&self) -> &EffectiveLists {
        &self.lists
    }
    pub fn zeroth_order_lists(&self) -> Option<&ZerothOrderLists> {
        self.lists0.as_ref()
    }
    pub fn set_moment_id(&mut self, axis: usize, id: Option<usize>) {
        self.moment_ids[axis] = id;
    }

    ////////////////////////////CONCENTRATIONS/////////////////////////////////////

    /// concentration of the member sitting at the given normalized distances from the mean
    pub fn concentration_at(&self, concs: &[f64], distances: [f64; N_AXES]) -> f64 {
        let mut conc = self.concentration(concs);
        for axis in 0..N_AXES {
            conc += distances[axis] * self.moment(concs, axis);
        }
        conc
    }

    fn member_concentration(&self, concs: &[f64], member: &[i32; N_AXES]) -> f64 {
        let distances = [0usize, 1, 2, 3].map(|axis| self.distance(member[axis], axis));
        self.concentration_at(concs, distances)
    }

    /// sum of the reconstructed concentrations of every member
    pub fn total_concentration(&self, concs: &[f64]) -> f64 {
        self.hev_list
            .iter()
            .map(|m| self.member_concentration(concs, m))
            .sum()
    }

    fn total_weighted_concentration(&self, concs: &[f64], axis: usize) -> f64 {
        self.hev_list
            .iter()
            .map(|m| self.member_concentration(concs, m) * m[axis] as f64)
            .sum()
    }

    /// total number of He (axis 0), D (1) or T (2) atoms held by the group
    pub fn total_atom_concentration(&self, concs: &[f64], axis: usize) -> f64 {
        assert!(axis <= 2, "atom axis must be He, D or T, got {}", axis);
        self.total_weighted_concentration(concs, axis)
    }

    pub fn total_vacancy_concentration(&self, concs: &[f64]) -> f64 {
        self.total_weighted_concentration(concs, V_AXIS)
    }

    /// concentration of the members holding exactly `v` vacancies
    pub fn integrated_v_concentration(&self, concs: &[f64], v: i32) -> f64 {
        self.hev_list
            .iter()
            .filter(|m| m[V_AXIS] == v)
            .map(|m| self.member_concentration(concs, m))
            .sum()
    }

    ////////////////////////////STRUCTURE FREEZE/////////////////////////////////////

    /// Connectivity implied by the aggregated lists: own id and moments, both operands of every
    /// reacting pair, every combining partner, every dissociating parent. Emission partners do not
    /// feed back into this cluster.
    pub fn connectivity_from(
        &self,
        clusters: &[ClusterEnum],
        config: &MomentConfig,
    ) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let mut reaction = BTreeSet::new();
        let mut dissociation = BTreeSet::new();
        reaction.insert(self.id);
        dissociation.insert(self.id);
        for id in self.moment_ids.iter().flatten() {
            reaction.insert(*id);
            dissociation.insert(*id);
        }
        let connect = |set: &mut BTreeSet<usize>, cluster: &ClusterEnum| {
            set.insert(cluster.id());
            for i in 1..config.ps_dim() {
                if let Some(id) = cluster.moment_id(config.axis(i)) {
                    set.insert(id);
                }
            }
        };
        // the shadows mirror the full lists entry by entry and survive their release
        let (reacting, combining, dissociating): (Vec<(usize, usize)>, Vec<usize>, Vec<usize>) =
            match self.lists0.as_ref() {
                Some(l) => (
                    l.reacting.iter().map(|p| (p.first, p.second)).collect(),
                    l.combining.iter().map(|c| c.other).collect(),
                    l.dissociating.iter().map(|p| p.first).collect(),
                ),
                None => (
                    self.lists.reacting.iter().map(|p| (p.first, p.second)).collect(),
                    self.lists.combining.iter().map(|c| c.other).collect(),
                    self.lists.dissociating.iter().map(|p| p.first).collect(),
                ),
            };
        for (first, second) in reacting {
            connect(&mut reaction, &clusters[first]);
            connect(&mut reaction, &clusters[second]);
        }
        for other in combining {
            connect(&mut reaction, &clusters[other]);
        }
        for first in dissociating {
            connect(&mut dissociation, &clusters[first]);
        }
        (reaction, dissociation)
    }

    pub fn set_connectivities(&mut self, sets: (BTreeSet<usize>, BTreeSet<usize>)) {
        self.reaction_connectivity = sets.0;
        self.dissociation_connectivity = sets.1;
    }

    /// Builds the `coeff0` shadows. With `release` the full lists are dropped afterwards; the
    /// coefficient dump and the connectivity then read the shadows.
    pub fn use_zeroth_moment_specializations(&mut self, release: bool) {
        self.lists0 = Some(ZerothOrderLists::from(&self.lists));
        if release {
            self.lists = EffectiveLists::default();
        }
        info!(
            "{}: zeroth order lists built{}",
            self.name,
            if release { ", full lists released" } else { "" }
        );
    }

    ////////////////////////////DIAGNOSTICS/////////////////////////////////////

    fn assert_full_lists(&self) {
        assert!(
            self.lists0.is_none(),
            "coefficient vectors of {} are not available once the zeroth order lists are in use",
            self.name
        );
    }

    /// per reacting pair: first id, second id, then the `psDim³` coefficients
    pub fn prod_vector(&self) -> Vec<Vec<f64>> {
        self.assert_full_lists();
        self.lists
            .reacting
            .iter()
            .map(|p| {
                let mut v = vec![p.first as f64, p.second as f64];
                v.extend_from_slice(p.coefs.as_slice());
                v
            })
            .collect()
    }

    pub fn comb_vector(&self) -> Vec<Vec<f64>> {
        self.assert_full_lists();
        self.lists
            .combining
            .iter()
            .map(|c| {
                let mut v = vec![c.other as f64];
                v.extend_from_slice(c.coefs.as_slice());
                v
            })
            .collect()
    }

    pub fn disso_vector(&self) -> Vec<Vec<f64>> {
        self.assert_full_lists();
        self.lists
            .dissociating
            .iter()
            .map(|p| {
                let mut v = vec![p.first as f64, p.second as f64];
                v.extend_from_slice(p.coefs.as_slice());
                v
            })
            .collect()
    }

    pub fn emit_vector(&self) -> Vec<Vec<f64>> {
        self.assert_full_lists();
        self.lists
            .emission
            .iter()
            .map(|p| {
                let mut v = vec![p.first as f64, p.second as f64];
                v.extend_from_slice(p.coefs.as_slice());
                v
            })
            .collect()
    }

    /// Writes every aggregated entry with its partners' names and its coefficients, in insertion order.
    pub fn output_coefficients_to<W: Write>(
        &self,
        os: &mut W,
        clusters: &[ClusterEnum],
    ) -> std::io::Result<()> {
        let name = |id: usize| clusters[id].name().to_string();
        let join = |c: &[f64]| {
            c.iter()
                .map(|x| format!("{}", x))
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(os, "name: {}", self.name)?;
        if let Some(l) = self.lists0.as_ref().filter(|_| self.lists.is_empty()) {
            return Self::output_shadows_to(os, l, &name);
        }
        writeln!(os, "reacting: {}", self.lists.reacting.len())?;
        for p in self.lists.reacting.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0-4][0-4][0-4]: {}",
                name(p.first),
                name(p.second),
                join(p.coefs.as_slice())
            )?;
        }
        writeln!(os, "combining: {}", self.lists.combining.len())?;
        for c in self.lists.combining.iter() {
            writeln!(
                os,
                "other: {}; a[0-4][0-4][0-4]: {}",
                name(c.other),
                join(c.coefs.as_slice())
            )?;
        }
        writeln!(os, "dissociating: {}", self.lists.dissociating.len())?;
        for p in self.lists.dissociating.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0-4][0-4]: {}",
                name(p.first),
                name(p.second),
                join(p.coefs.as_slice())
            )?;
        }
        writeln!(os, "emitting: {}", self.lists.emission.len())?;
        for p in self.lists.emission.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0-4][0-4]: {}",
                name(p.first),
                name(p.second),
                join(p.coefs.as_slice())
            )?;
        }
        Ok(())
    }

    /// dump of the `coeff0` shadows, used once the full lists are released
    fn output_shadows_to<W: Write>(
        os: &mut W,
        lists0: &ZerothOrderLists,
        name: &dyn Fn(usize) -> String,
    ) -> std::io::Result<()> {
        writeln!(os, "reacting: {}", lists0.reacting.len())?;
        for p in lists0.reacting.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0][0][0]: {}",
                name(p.first),
                name(p.second),
                p.coeff0
            )?;
        }
        writeln!(os, "combining: {}", lists0.combining.len())?;
        for c in lists0.combining.iter() {
            writeln!(os, "other: {}; a[0][0][0]: {}", name(c.other), c.coeff0)?;
        }
        writeln!(os, "dissociating: {}", lists0.dissociating.len())?;
        for p in lists0.dissociating.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0][0]: {}",
                name(p.first),
                name(p.second),
                p.coeff0
            )?;
        }
        writeln!(os, "emitting: {}", lists0.emission.len())?;
        for p in lists0.emission.iter() {
            writeln!(
                os,
                "first: {}; second: {}; a[0][0]: {}",
                name(p.first),
                name(p.second),
                p.coeff0
            )?;
        }
        Ok(())
    }
}

impl Reactant for SuperCluster {
    fn id(&self) -> usize {
        self.id
    }
    fn set_id(&mut self, id: usize) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn reactant_type(&self) -> ReactantType {
        ReactantType::Super
    }
    fn size(&self) -> i32 {
        self.size
    }
    fn is_grouped(&self) -> bool {
        true
    }
    fn bounds(&self, axis: usize) -> IntegerRange {
        self.bounds[axis]
    }
    fn interstitial_size(&self) -> i32 {
        0
    }
    fn moment_id(&self, axis: usize) -> Option<usize> {
        self.moment_ids[axis]
    }
    fn distance(&self, b: i32, axis: usize) -> f64 {
        if self.section_width[axis] == 1 {
            return 0.0;
        }
        2.0 * (b as f64 - self.num_atom[axis]) / (self.section_width[axis] - 1) as f64
    }
    fn factor(&self, b: i32, axis: usize) -> f64 {
        (b as f64 - self.num_atom[axis]) / self.dispersion[axis]
    }
    fn diffusion_factor(&self) -> f64 {
        0.0
    }
    fn migration_energy(&self) -> f64 {
        f64::INFINITY
    }
    fn formation_energy(&self) -> f64 {
        0.0
    }
    fn reaction_radius(&self) -> f64 {
        self.reaction_radius
    }
    fn reaction_connectivity(&self) -> &BTreeSet<usize> {
        &self.reaction_connectivity
    }
    fn dissociation_connectivity(&self) -> &BTreeSet<usize> {
        &self.dissociation_connectivity
    }
}
