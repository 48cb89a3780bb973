//! # Effective Reaction Lists
//!
//! ## Purpose
//! A super-cluster takes part in thousands of elementary reactions between its members and their
//! partners. They collapse onto a handful of aggregated entries, one per partner key, each carrying
//! a coefficient tensor that accumulates with `+=`.
//!
//! ## Main Structures
//! - `ProductionCoefficients` / `DissociationCoefficients`: dense `psDim³` / `psDim²` tensors, row major
//! - `ProductionPair`: this cluster is the product of `first + second`
//! - `CombiningCluster`: this cluster is consumed together with `other`
//! - `DissociationPair`: used both for the dissociating list (`first` = parent, `second` = co-emitted
//!   partner) and the emission list (`first`, `second` = the two products)
//! - `EffectiveLists`: the four insertion-ordered lists owned by a super-cluster
//! - `ZerothOrderLists`: `coeff0` shadows used when only the total concentration is tracked
//! - `EffectiveListIndex`: key -> position maps, alive only while the network is being built
//!
//! Keys never contain the reaction id: two elementary reactions with the same endpoints share one
//! entry, and the entry keeps the first reaction it was created from (its rate array).

use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::reaction::{DissociationReaction, ProductionReaction};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::{AddAssign, Index, IndexMut};

/// `coefs[i][j][k]`, i and j over the two reactants' expansion positions, k over the output position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionCoefficients {
    ps_dim: usize,
    data: Vec<f64>,
}

impl ProductionCoefficients {
    pub fn zeros(ps_dim: usize) -> Self {
        Self {
            ps_dim,
            data: vec![0.0; ps_dim * ps_dim * ps_dim],
        }
    }
    /// flat array in `(i, j, k)` row-major order
    pub fn from_flat(ps_dim: usize, flat: &[f64]) -> Result<Self, NetworkError> {
        let expected = ps_dim * ps_dim * ps_dim;
        if flat.len() != expected {
            return Err(NetworkError::CoefficientCount {
                expected,
                got: flat.len(),
            });
        }
        Ok(Self {
            ps_dim,
            data: flat.to_vec(),
        })
    }
    pub fn ps_dim(&self) -> usize {
        self.ps_dim
    }
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
    pub fn coeff0(&self) -> f64 {
        self.data[0]
    }
}

impl Index<(usize, usize, usize)> for ProductionCoefficients {
    type Output = f64;
    fn index(&self, (i, j, k): (usize, usize, usize)) -> &f64 {
        &self.data[(i * self.ps_dim + j) * self.ps_dim + k]
    }
}

impl IndexMut<(usize, usize, usize)> for ProductionCoefficients {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut f64 {
        &mut self.data[(i * self.ps_dim + j) * self.ps_dim + k]
    }
}

impl AddAssign<&ProductionCoefficients> for ProductionCoefficients {
    fn add_assign(&mut self, rhs: &ProductionCoefficients) {
        debug_assert_eq!(self.ps_dim, rhs.ps_dim);
        for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a += b;
        }
    }
}

/// `coefs[i][j]`, i over the dissociating cluster's expansion positions, j over the output position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DissociationCoefficients {
    ps_dim: usize,
    data: Vec<f64>,
}

impl DissociationCoefficients {
    pub fn zeros(ps_dim: usize) -> Self {
        Self {
            ps_dim,
            data: vec![0.0; ps_dim * ps_dim],
        }
    }
    pub fn from_flat(ps_dim: usize, flat: &[f64]) -> Result<Self, NetworkError> {
        let expected = ps_dim * ps_dim;
        if flat.len() != expected {
            return Err(NetworkError::CoefficientCount {
                expected,
                got: flat.len(),
            });
        }
        Ok(Self {
            ps_dim,
            data: flat.to_vec(),
        })
    }
    pub fn ps_dim(&self) -> usize {
        self.ps_dim
    }
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
    pub fn coeff0(&self) -> f64 {
        self.data[0]
    }
}

impl Index<(usize, usize)> for DissociationCoefficients {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.ps_dim + j]
    }
}

impl IndexMut<(usize, usize)> for DissociationCoefficients {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.ps_dim + j]
    }
}

impl AddAssign<&DissociationCoefficients> for DissociationCoefficients {
    fn add_assign(&mut self, rhs: &DissociationCoefficients) {
        debug_assert_eq!(self.ps_dim, rhs.ps_dim);
        for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a += b;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPair {
    pub reaction: usize,
    pub first: usize,
    pub second: usize,
    pub coefs: ProductionCoefficients,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombiningCluster {
    pub reaction: usize,
    pub other: usize,
    pub coefs: ProductionCoefficients,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DissociationPair {
    pub reaction: usize,
    pub first: usize,
    pub second: usize,
    pub coefs: DissociationCoefficients,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPair0 {
    pub reaction: usize,
    pub first: usize,
    pub second: usize,
    pub coeff0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombiningCluster0 {
    pub reaction: usize,
    pub other: usize,
    pub coeff0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DissociationPair0 {
    pub reaction: usize,
    pub first: usize,
    pub second: usize,
    pub coeff0: f64,
}

impl From<&ProductionPair> for ProductionPair0 {
    fn from(p: &ProductionPair) -> Self {
        Self {
            reaction: p.reaction,
            first: p.first,
            second: p.second,
            coeff0: p.coefs.coeff0(),
        }
    }
}

impl From<&CombiningCluster> for CombiningCluster0 {
    fn from(c: &CombiningCluster) -> Self {
        Self {
            reaction: c.reaction,
            other: c.other,
            coeff0: c.coefs.coeff0(),
        }
    }
}

impl From<&DissociationPair> for DissociationPair0 {
    fn from(p: &DissociationPair) -> Self {
        Self {
            reaction: p.reaction,
            first: p.first,
            second: p.second,
            coeff0: p.coefs.coeff0(),
        }
    }
}

/// The four aggregated lists of a super-cluster, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectiveLists {
    pub reacting: Vec<ProductionPair>,
    pub combining: Vec<CombiningCluster>,
    pub dissociating: Vec<DissociationPair>,
    pub emission: Vec<DissociationPair>,
}

impl EffectiveLists {
    pub fn len(&self) -> usize {
        self.reacting.len() + self.combining.len() + self.dissociating.len() + self.emission.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZerothOrderLists {
    pub reacting: Vec<ProductionPair0>,
    pub combining: Vec<CombiningCluster0>,
    pub dissociating: Vec<DissociationPair0>,
    pub emission: Vec<DissociationPair0>,
}

impl From<&EffectiveLists> for ZerothOrderLists {
    fn from(lists: &EffectiveLists) -> Self {
        Self {
            reacting: lists.reacting.iter().map(ProductionPair0::from).collect(),
            combining: lists.combining.iter().map(CombiningCluster0::from).collect(),
            dissociating: lists.dissociating.iter().map(DissociationPair0::from).collect(),
            emission: lists.emission.iter().map(DissociationPair0::from).collect(),
        }
    }
}

/// Key -> list position maps of one super-cluster. Owned by the network builder and dropped
/// once the lists are frozen.
#[derive(Debug, Clone, Default)]
pub struct EffectiveListIndex {
    reacting: HashMap<(usize, usize), usize>,
    combining: HashMap<usize, usize>,
    dissociating: HashMap<(usize, usize), usize>,
    emission: HashMap<(usize, usize), usize>,
}

impl EffectiveListIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// entry of `lists.reacting` keyed by (first, second), created if absent
    pub fn reacting_entry<'a>(
        &mut self,
        lists: &'a mut EffectiveLists,
        reaction: &ProductionReaction,
        ps_dim: usize,
    ) -> &'a mut ProductionPair {
        let pos = *self
            .reacting
            .entry((reaction.first, reaction.second))
            .or_insert_with(|| {
                lists.reacting.push(ProductionPair {
                    reaction: reaction.id,
                    first: reaction.first,
                    second: reaction.second,
                    coefs: ProductionCoefficients::zeros(ps_dim),
                });
                lists.reacting.len() - 1
            });
        &mut lists.reacting[pos]
    }

    /// entry of `lists.combining` keyed by the operand that is not `owner`
    pub fn combining_entry<'a>(
        &mut self,
        lists: &'a mut EffectiveLists,
        reaction: &ProductionReaction,
        owner: usize,
        ps_dim: usize,
    ) -> Result<&'a mut CombiningCluster, NetworkError> {
        let other = reaction.other_operand(owner)?;
        let pos = *self.combining.entry(other).or_insert_with(|| {
            lists.combining.push(CombiningCluster {
                reaction: reaction.id,
                other,
                coefs: ProductionCoefficients::zeros(ps_dim),
            });
            lists.combining.len() - 1
        });
        Ok(&mut lists.combining[pos])
    }

    /// entry of `lists.dissociating` keyed by (dissociating parent, co-emitted partner)
    pub fn dissociating_entry<'a>(
        &mut self,
        lists: &'a mut EffectiveLists,
        reaction: &DissociationReaction,
        owner: usize,
        ps_dim: usize,
    ) -> Result<&'a mut DissociationPair, NetworkError> {
        let partner = reaction.emitted_partner(owner)?;
        let key = (reaction.dissociating, partner);
        let pos = *self.dissociating.entry(key).or_insert_with(|| {
            lists.dissociating.push(DissociationPair {
                reaction: reaction.id,
                first: reaction.dissociating,
                second: partner,
                coefs: DissociationCoefficients::zeros(ps_dim),
            });
            lists.dissociating.len() - 1
        });
        Ok(&mut lists.dissociating[pos])
    }

    /// entry of `lists.emission` keyed by the two products; `owner` must be the dissociating cluster
    pub fn emission_entry<'a>(
        &mut self,
        lists: &'a mut EffectiveLists,
        reaction: &DissociationReaction,
        owner: usize,
        ps_dim: usize,
    ) -> Result<&'a mut DissociationPair, NetworkError> {
        if reaction.dissociating != owner {
            return Err(NetworkError::NotAParticipant {
                cluster: owner,
                reaction: reaction.id,
            });
        }
        let key = (reaction.first, reaction.second);
        let pos = *self.emission.entry(key).or_insert_with(|| {
            lists.emission.push(DissociationPair {
                reaction: reaction.id,
                first: reaction.first,
                second: reaction.second,
                coefs: DissociationCoefficients::zeros(ps_dim),
            });
            lists.emission.len() - 1
        });
        Ok(&mut lists.emission[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_reuses_entry() {
        let mut lists = EffectiveLists::default();
        let mut index = EffectiveListIndex::new();
        let mut r1 = ProductionReaction::new(1, 2, vec![1.0]);
        r1.id = 0;
        let mut r2 = ProductionReaction::new(1, 2, vec![5.0]);
        r2.id = 7;
        index.reacting_entry(&mut lists, &r1, 2).coefs[(0, 0, 0)] += 1.0;
        index.reacting_entry(&mut lists, &r2, 2).coefs[(0, 0, 0)] += 2.0;
        assert_eq!(lists.reacting.len(), 1);
        assert_eq!(lists.reacting[0].reaction, 0);
        assert_eq!(lists.reacting[0].coefs[(0, 0, 0)], 3.0);
        // reversed operands form a different key
        let r3 = ProductionReaction::new(2, 1, vec![1.0]);
        index.reacting_entry(&mut lists, &r3, 2);
        assert_eq!(lists.reacting.len(), 2);
    }

    #[test]
    fn test_combining_key_is_other_operand() {
        let mut lists = EffectiveLists::default();
        let mut index = EffectiveListIndex::new();
        let r1 = ProductionReaction::new(4, 9, vec![1.0]);
        let r2 = ProductionReaction::new(9, 4, vec![1.0]);
        assert_eq!(index.combining_entry(&mut lists, &r1, 9, 1).unwrap().other, 4);
        index.combining_entry(&mut lists, &r2, 9, 1).unwrap();
        assert_eq!(lists.combining.len(), 1);
        assert!(index.combining_entry(&mut lists, &r1, 3, 1).is_err());
    }

    #[test]
    fn test_dissociation_and_emission_keys() {
        let mut lists = EffectiveLists::default();
        let mut index = EffectiveListIndex::new();
        let r = DissociationReaction::new(5, 1, 8, vec![1.0]);
        let entry = index.dissociating_entry(&mut lists, &r, 8, 1).unwrap();
        assert_eq!((entry.first, entry.second), (5, 1));
        assert!(index.emission_entry(&mut lists, &r, 8, 1).is_err());
        let entry = index.emission_entry(&mut lists, &r, 5, 1).unwrap();
        assert_eq!((entry.first, entry.second), (1, 8));
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn test_flat_coefficients_layout() {
        let flat: Vec<f64> = (0..8).map(|n| n as f64).collect();
        let c = ProductionCoefficients::from_flat(2, &flat).unwrap();
        assert_eq!(c[(1, 0, 1)], 5.0);
        assert_eq!(c[(0, 1, 1)], 3.0);
        assert!(ProductionCoefficients::from_flat(2, &flat[..7]).is_err());
        let d = DissociationCoefficients::from_flat(2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(d[(1, 0)], 3.0);
    }
}
