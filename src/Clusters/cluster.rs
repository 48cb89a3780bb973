//! # Cluster Capability Set
//!
//! ## Purpose
//! Every unknown of a point-defect network is a reactant: either an individual cluster with a fixed
//! integer composition or a super-cluster standing for a whole range of compositions. The flux and
//! coefficient code never asks "which concrete type is this"; it asks capability questions:
//! is the operand grouped, what are its bounds on an axis, where do its concentration and moments live
//! in the state vector, how far is a composition from its mean.
//!
//! ## Main Structures
//! - `Species`: He, D, T, V and I, with their composition index
//! - `IntegerRange`: half-open integer range used for per-axis bounds
//! - `Reactant`: the capability trait, dispatched with `enum_dispatch`
//! - `SingleCluster`: an individual cluster (He_n, V_n, I_n or a mixed He-D-T-V cluster)
//! - `ClusterEnum`: the arena element type, `Single` or `Super`

use crate::Clusters::super_cluster::SuperCluster;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// lattice constant of tungsten, nm
pub const TUNGSTEN_LATTICE_CONSTANT: f64 = 0.31668;
pub const PI: f64 = std::f64::consts::PI;
/// number of composition axes carrying a bound (He, D, T, V)
pub const N_AXES: usize = 4;
/// index of the vacancy axis
pub const V_AXIS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    He,
    D,
    T,
    V,
    I,
}

impl Species {
    /// position of the species in a composition array `[He, D, T, V, I]`
    pub fn comp_idx(self) -> usize {
        match self {
            Species::He => 0,
            Species::D => 1,
            Species::T => 2,
            Species::V => 3,
            Species::I => 4,
        }
    }
}

/// Half-open integer range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerRange {
    pub start: i32,
    pub end: i32,
}

impl IntegerRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
    /// range holding the inclusive interval `[lo, hi]`
    pub fn inclusive(lo: i32, hi: i32) -> Self {
        Self {
            start: lo,
            end: hi + 1,
        }
    }
    pub fn single(value: i32) -> Self {
        Self::inclusive(value, value)
    }
    pub fn first(&self) -> i32 {
        self.start
    }
    /// last included value
    pub fn last(&self) -> i32 {
        self.end - 1
    }
    pub fn len(&self) -> i32 {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
    pub fn contains(&self, value: i32) -> bool {
        value >= self.start && value < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactantType {
    He,
    D,
    T,
    V,
    I,
    Mixed,
    Super,
}

impl fmt::Display for ReactantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReactantType::He => "He",
            ReactantType::D => "D",
            ReactantType::T => "T",
            ReactantType::V => "V",
            ReactantType::I => "I",
            ReactantType::Mixed => "Mixed",
            ReactantType::Super => "Super",
        };
        write!(f, "{}", s)
    }
}

/// Capabilities shared by individual clusters and super-clusters.
#[enum_dispatch]
pub trait Reactant {
    fn id(&self) -> usize;
    fn set_id(&mut self, id: usize);
    fn name(&self) -> &str;
    fn reactant_type(&self) -> ReactantType;
    fn size(&self) -> i32;
    fn is_grouped(&self) -> bool;
    /// half-open range of compositions on composition axis `axis` (0..4)
    fn bounds(&self, axis: usize) -> IntegerRange;
    /// number of interstitials carried by the reactant
    fn interstitial_size(&self) -> i32;
    /// position of the first moment along `axis` in the state vector, if that moment is tracked
    fn moment_id(&self, axis: usize) -> Option<usize>;
    /// normalized deviation of composition `b` from the mean along `axis`, in [-1, 1]
    fn distance(&self, b: i32, axis: usize) -> f64;
    /// deviation of composition `b` from the mean along `axis` weighted by the dispersion
    fn factor(&self, b: i32, axis: usize) -> f64;
    fn diffusion_factor(&self) -> f64;
    fn migration_energy(&self) -> f64;
    fn formation_energy(&self) -> f64;
    fn reaction_radius(&self) -> f64;
    fn reaction_connectivity(&self) -> &BTreeSet<usize>;
    fn dissociation_connectivity(&self) -> &BTreeSet<usize>;

    fn concentration(&self, concs: &[f64]) -> f64 {
        concs[self.id()]
    }
    /// first moment along `axis`; zero when the moment is not tracked
    fn moment(&self, concs: &[f64], axis: usize) -> f64 {
        self.moment_id(axis).map_or(0.0, |id| concs[id])
    }
}

/// An individual cluster with an exact composition.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleCluster {
    id: usize,
    name: String,
    reactant_type: ReactantType,
    /// He, D, T, V, I
    composition: [i32; 5],
    size: i32,
    diffusion_factor: f64,
    migration_energy: f64,
    formation_energy: f64,
    reaction_radius: f64,
    reaction_connectivity: BTreeSet<usize>,
    dissociation_connectivity: BTreeSet<usize>,
}

impl SingleCluster {
    fn with_composition(reactant_type: ReactantType, composition: [i32; 5], size: i32) -> Self {
        let name = match reactant_type {
            ReactantType::Mixed => {
                let labels = ["He", "D", "T", "V"];
                labels
                    .iter()
                    .zip(composition.iter())
                    .filter(|(_, n)| **n > 0)
                    .map(|(l, n)| format!("{}_{}", l, n))
                    .collect::<Vec<_>>()
                    .join("")
            }
            other => format!("{}_{}", other, size),
        };
        Self {
            id: 0,
            name,
            reactant_type,
            composition,
            size,
            diffusion_factor: 0.0,
            migration_energy: f64::INFINITY,
            formation_energy: 0.0,
            reaction_radius: 0.0,
            reaction_connectivity: BTreeSet::new(),
            dissociation_connectivity: BTreeSet::new(),
        }
    }

    pub fn helium(n: i32) -> Self {
        Self::with_composition(ReactantType::He, [n, 0, 0, 0, 0], n)
    }
    pub fn deuterium(n: i32) -> Self {
        Self::with_composition(ReactantType::D, [0, n, 0, 0, 0], n)
    }
    pub fn tritium(n: i32) -> Self {
        Self::with_composition(ReactantType::T, [0, 0, n, 0, 0], n)
    }
    pub fn vacancy(n: i32) -> Self {
        Self::with_composition(ReactantType::V, [0, 0, 0, n, 0], n)
    }
    /// interstitials sit at the origin of the He-D-T-V lattice and shift the vacancy axis by `-n`
    pub fn interstitial(n: i32) -> Self {
        Self::with_composition(ReactantType::I, [0, 0, 0, 0, n], n)
    }
    pub fn mixed(he: i32, d: i32, t: i32, v: i32) -> Self {
        Self::with_composition(ReactantType::Mixed, [he, d, t, v, 0], he + d + t + v)
    }

    pub fn with_kinetics(
        mut self,
        diffusion_factor: f64,
        migration_energy: f64,
        formation_energy: f64,
        reaction_radius: f64,
    ) -> Self {
        self.diffusion_factor = diffusion_factor;
        self.migration_energy = migration_energy;
        self.formation_energy = formation_energy;
        self.reaction_radius = reaction_radius;
        self
    }

    pub fn composition(&self) -> [i32; 5] {
        self.composition
    }

    /// an individual cluster only ever depends on itself through the super-cluster lists
    pub fn reset_connectivities(&mut self) {
        self.reaction_connectivity = BTreeSet::from([self.id]);
        self.dissociation_connectivity = BTreeSet::from([self.id]);
    }
}

impl Reactant for SingleCluster {
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
        self.reactant_type
    }
    fn size(&self) -> i32 {
        self.size
    }
    fn is_grouped(&self) -> bool {
        false
    }
    fn bounds(&self, axis: usize) -> IntegerRange {
        IntegerRange::single(self.composition[axis])
    }
    fn interstitial_size(&self) -> i32 {
        self.composition[Species::I.comp_idx()]
    }
    fn moment_id(&self, _axis: usize) -> Option<usize> {
        None
    }
    fn distance(&self, _b: i32, _axis: usize) -> f64 {
        0.0
    }
    fn factor(&self, _b: i32, _axis: usize) -> f64 {
        0.0
    }
    fn diffusion_factor(&self) -> f64 {
        self.diffusion_factor
    }
    fn migration_energy(&self) -> f64 {
        self.migration_energy
    }
    fn formation_energy(&self) -> f64 {
        self.formation_energy
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

/// Element type of the network arena.
#[derive(Debug, Clone)]
#[enum_dispatch(Reactant)]
pub enum ClusterEnum {
    Single(SingleCluster),
    Super(SuperCluster),
}

impl ClusterEnum {
    pub fn as_super(&self) -> Option<&SuperCluster> {
        match self {
            ClusterEnum::Super(s) => Some(s),
            ClusterEnum::Single(_) => None,
        }
    }
    pub fn as_super_mut(&mut self) -> Option<&mut SuperCluster> {
        match self {
            ClusterEnum::Super(s) => Some(s),
            ClusterEnum::Single(_) => None,
        }
    }
}
