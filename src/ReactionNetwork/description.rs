//! # Network Description
//!
//! ## Purpose
//! Serializable form of a whole network: clusters in arena order, reactions with their per grid point
//! rates, and the coefficient contributions that fill the aggregated lists. `build` replays the
//! description through a `NetworkBuilder`, so the same validation applies as for hand-built networks.
//!
//! ## Format
//! ```json
//! {
//!   "clusters": [
//!     {"kind": "He", "size": 1},
//!     {"kind": "Super", "lower": [2, 0, 0, 1], "higher": [4, 0, 0, 2]}
//!   ],
//!   "production": [{"first": 0, "second": 1, "k_constant": [1.0]}],
//!   "dissociation": [],
//!   "contributions": [
//!     {"cluster": 1, "reaction": 0, "role": "participate_in",
//!      "source": {"kind": "overlap", "product": 2}}
//!   ]
//! }
//! ```
//! Cluster references are positions in `clusters`. Reaction references are positions in
//! `production` (result_from, participate_in) or `dissociation` (dissociation, emission).

use crate::Clusters::cluster::{N_AXES, SingleCluster};
use crate::Clusters::super_cluster::SuperCluster;
use crate::ReactionNetwork::builder::NetworkBuilder;
use crate::ReactionNetwork::network::ReactionNetwork;
use crate::ReactionNetwork::network_error::NetworkError;
use crate::Reactions::reaction::{
    DissociationReaction, PendingProductionReactionInfo, ProductionReaction,
};
use crate::settings::NetworkSettings;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClusterSpec {
    He {
        size: i32,
    },
    D {
        size: i32,
    },
    T {
        size: i32,
    },
    V {
        size: i32,
    },
    I {
        size: i32,
    },
    Mixed {
        #[serde(default)]
        he: i32,
        #[serde(default)]
        d: i32,
        #[serde(default)]
        t: i32,
        #[serde(default)]
        v: i32,
    },
    /// Inclusive box. Without `members` every composition of the box belongs to the group.
    Super {
        lower: [i32; N_AXES],
        higher: [i32; N_AXES],
        #[serde(default)]
        members: Option<Vec<[i32; N_AXES]>>,
    },
}

impl ClusterSpec {
    fn single(&self) -> Option<SingleCluster> {
        match *self {
            ClusterSpec::He { size } => Some(SingleCluster::helium(size)),
            ClusterSpec::D { size } => Some(SingleCluster::deuterium(size)),
            ClusterSpec::T { size } => Some(SingleCluster::tritium(size)),
            ClusterSpec::V { size } => Some(SingleCluster::vacancy(size)),
            ClusterSpec::I { size } => Some(SingleCluster::interstitial(size)),
            ClusterSpec::Mixed { he, d, t, v } => Some(SingleCluster::mixed(he, d, t, v)),
            ClusterSpec::Super { .. } => None,
        }
    }
}

/// Group with an explicit membership list; the mean composition is the member average.
fn super_from_members(
    lower: [i32; N_AXES],
    higher: [i32; N_AXES],
    members: Vec<[i32; N_AXES]>,
) -> Result<SuperCluster, NetworkError> {
    let n_tot = members.len();
    let mut num = [0.0; N_AXES];
    for member in members.iter() {
        for axis in 0..N_AXES {
            num[axis] += member[axis] as f64;
        }
    }
    if n_tot > 0 {
        for n in num.iter_mut() {
            *n /= n_tot as f64;
        }
    }
    let width = [0usize, 1, 2, 3].map(|i| higher[i] - lower[i] + 1);
    let mut cluster = SuperCluster::new(num, n_tot, width, lower, higher);
    cluster.validate()?;
    cluster.set_hev_vector(members)?;
    Ok(cluster)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionRole {
    /// product of A + B
    ResultFrom,
    /// operand of A + B
    ParticipateIn,
    /// product of A -> B + C
    Dissociation,
    /// A of A -> B + C
    Emission,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientSource {
    /// One elementary reaction; `a` and `b` follow `PendingProductionReactionInfo`.
    Explicit {
        a: [i32; N_AXES],
        #[serde(default)]
        b: [i32; N_AXES],
    },
    Pending {
        infos: Vec<PendingProductionReactionInfo>,
    },
    /// Closed-form sum over the overlap region. `participate_in` also needs the product cluster.
    Overlap {
        #[serde(default)]
        product: Option<usize>,
    },
    /// Flat coefficients, `psDim³` for production roles, `psDim²` for dissociation roles.
    Raw {
        coefs: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub cluster: usize,
    pub reaction: usize,
    pub role: ContributionRole,
    pub source: CoefficientSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub clusters: Vec<ClusterSpec>,
    #[serde(default)]
    pub production: Vec<ProductionReaction>,
    #[serde(default)]
    pub dissociation: Vec<DissociationReaction>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

impl NetworkDescription {
    pub fn build(&self, settings: NetworkSettings) -> Result<ReactionNetwork, NetworkError> {
        let mut builder = NetworkBuilder::new(settings)?;
        for spec in self.clusters.iter() {
            match spec.single() {
                Some(single) => {
                    builder.add_cluster(single);
                }
                None => {
                    if let ClusterSpec::Super {
                        lower,
                        higher,
                        members,
                    } = spec
                    {
                        let cluster = match members {
                            Some(members) => super_from_members(*lower, *higher, members.clone())?,
                            None => SuperCluster::rectangle(*lower, *higher)?,
                        };
                        builder.add_super_cluster(cluster)?;
                    }
                }
            }
        }
        for reaction in self.production.iter() {
            builder.add_production_reaction(reaction.clone())?;
        }
        for reaction in self.dissociation.iter() {
            builder.add_dissociation_reaction(reaction.clone())?;
        }
        for contribution in self.contributions.iter() {
            apply(&mut builder, contribution)?;
        }
        info!(
            "description replayed: {} clusters, {} contributions",
            self.clusters.len(),
            self.contributions.len()
        );
        builder.finish()
    }
}

fn apply(builder: &mut NetworkBuilder, c: &Contribution) -> Result<(), NetworkError> {
    let (id, r) = (c.cluster, c.reaction);
    match (c.role, &c.source) {
        (ContributionRole::ResultFrom, CoefficientSource::Explicit { a, b }) => {
            builder.result_from(id, r, a, b)
        }
        (ContributionRole::ResultFrom, CoefficientSource::Pending { infos }) => {
            builder.result_from_pending(id, r, infos)
        }
        (ContributionRole::ResultFrom, CoefficientSource::Overlap { .. }) => {
            builder.result_from_overlap(id, r)
        }
        (ContributionRole::ResultFrom, CoefficientSource::Raw { coefs }) => {
            builder.result_from_coefs(id, r, coefs)
        }
        (ContributionRole::ParticipateIn, CoefficientSource::Explicit { a, .. }) => {
            builder.participate_in(id, r, a)
        }
        (ContributionRole::ParticipateIn, CoefficientSource::Pending { infos }) => {
            builder.participate_in_pending(id, r, infos)
        }
        (ContributionRole::ParticipateIn, CoefficientSource::Overlap { product }) => {
            let product = product.ok_or(NetworkError::MissingProduct {
                cluster: id,
                reaction: r,
            })?;
            builder.participate_in_overlap(id, r, product)
        }
        (ContributionRole::ParticipateIn, CoefficientSource::Raw { coefs }) => {
            builder.participate_in_coefs(id, r, coefs)
        }
        (ContributionRole::Dissociation, CoefficientSource::Explicit { a, b }) => {
            builder.participate_in_dissociation(id, r, a, b)
        }
        (ContributionRole::Dissociation, CoefficientSource::Pending { infos }) => {
            builder.participate_in_dissociation_pending(id, r, infos)
        }
        (ContributionRole::Dissociation, CoefficientSource::Overlap { .. }) => {
            builder.participate_in_dissociation_overlap(id, r)
        }
        (ContributionRole::Dissociation, CoefficientSource::Raw { coefs }) => {
            builder.participate_in_dissociation_coefs(id, r, coefs)
        }
        (ContributionRole::Emission, CoefficientSource::Explicit { a, .. }) => {
            builder.emit_from(id, r, a)
        }
        (ContributionRole::Emission, CoefficientSource::Pending { infos }) => {
            builder.emit_from_pending(id, r, infos)
        }
        (ContributionRole::Emission, CoefficientSource::Overlap { .. }) => {
            builder.emit_from_overlap(id, r)
        }
        (ContributionRole::Emission, CoefficientSource::Raw { coefs }) => {
            builder.emit_from_coefs(id, r, coefs)
        }
    }
}
