use crate::ReactionNetwork::network_error::NetworkError;
use serde::{Deserialize, Serialize};

/// A + B -> C. The product is not stored: whichever super-cluster records the reaction through its
/// reacting list is the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionReaction {
    #[serde(default)]
    pub id: usize,
    pub first: usize,
    pub second: usize,
    /// rate per grid point
    pub k_constant: Vec<f64>,
}

impl ProductionReaction {
    pub fn new(first: usize, second: usize, k_constant: Vec<f64>) -> Self {
        Self {
            id: 0,
            first,
            second,
            k_constant,
        }
    }
    pub fn rate(&self, xi: usize) -> f64 {
        self.k_constant[xi]
    }
    /// the operand that is not `cluster`
    pub fn other_operand(&self, cluster: usize) -> Result<usize, NetworkError> {
        if self.first == cluster {
            Ok(self.second)
        } else if self.second == cluster {
            Ok(self.first)
        } else {
            Err(NetworkError::NotAParticipant {
                cluster,
                reaction: self.id,
            })
        }
    }
}

/// A -> B + C, with A the dissociating cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DissociationReaction {
    #[serde(default)]
    pub id: usize,
    pub dissociating: usize,
    pub first: usize,
    pub second: usize,
    pub k_constant: Vec<f64>,
}

impl DissociationReaction {
    pub fn new(dissociating: usize, first: usize, second: usize, k_constant: Vec<f64>) -> Self {
        Self {
            id: 0,
            dissociating,
            first,
            second,
            k_constant,
        }
    }
    pub fn rate(&self, xi: usize) -> f64 {
        self.k_constant[xi]
    }
    /// the product emitted alongside `cluster`
    pub fn emitted_partner(&self, cluster: usize) -> Result<usize, NetworkError> {
        if self.first == cluster {
            Ok(self.second)
        } else if self.second == cluster {
            Ok(self.first)
        } else {
            Err(NetworkError::NotAParticipant {
                cluster,
                reaction: self.id,
            })
        }
    }
}

/// Member compositions (He, D, T, V) of one elementary reaction folded into an aggregated entry.
/// What `a` and `b` denote depends on the role of the recording super-cluster:
///
/// | role        | `a`                        | `b`                           |
/// |-------------|----------------------------|-------------------------------|
/// | product     | member of this cluster     | member of the grouped reactant |
/// | combining   | unused                     | member of this cluster         |
/// | dissociated | member of the parent       | member of this cluster         |
/// | emitting    | member of this cluster     | unused                         |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingProductionReactionInfo {
    pub a: [i32; 4],
    pub b: [i32; 4],
}

impl PendingProductionReactionInfo {
    pub fn new(a: [i32; 4], b: [i32; 4]) -> Self {
        Self { a, b }
    }
}
