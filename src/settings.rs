//! # Settings Module
//!
//! ## Purpose
//! Holds the immutable configuration of a reaction network: which composition axes carry a first
//! moment (and therefore how large the coefficient tensors are), how many spatial grid points the
//! rate arrays span, and whether the full coefficient lists are dropped once the zeroth-order fast
//! path is built.
//!
//! ## Key Features
//! - **psDim / indexList**: `MomentConfig` maps expansion position `i = 1..psDim-1` onto a composition
//!   axis. Position `0` is always the total concentration.
//! - **Serde**: both structs (de)serialize to JSON so they can live in a settings section of a
//!   network document (see `Utils::load_from_file`).
//! - **Explicit threading**: the configuration is owned by the network and handed by reference to every
//!   coefficient, flux and Jacobian call; there is no process-wide state.
//!
//! ## Usage Pattern
//! ```rust
//! use DefectKin::settings::{MomentConfig, NetworkSettings};
//! use DefectKin::Clusters::cluster::Species;
//!
//! let moments = MomentConfig::new(vec![Species::He, Species::V]).unwrap();
//! assert_eq!(moments.ps_dim(), 3);
//! assert_eq!(moments.axis(2), 3);
//! let settings = NetworkSettings::new(moments, 10);
//! assert!(!settings.release_full_lists);
//! ```

use crate::Clusters::cluster::Species;
use crate::ReactionNetwork::network_error::NetworkError;
use serde::{Deserialize, Serialize};

/// largest possible number of expansion positions: the zeroth moment plus four composition axes
pub const MAX_PS_DIM: usize = 5;

/// Moment expansion layout of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentConfig {
    /// species whose composition axis carries a first moment, in expansion order
    pub tracked: Vec<Species>,
}

impl MomentConfig {
    pub fn new(tracked: Vec<Species>) -> Result<Self, NetworkError> {
        let config = Self { tracked };
        config.validate()?;
        Ok(config)
    }
    /// only the total concentration is tracked (psDim == 1)
    pub fn zeroth_only() -> Self {
        Self {
            tracked: Vec::new(),
        }
    }
    /// He, D, T and V moments (psDim == 5)
    pub fn all_axes() -> Self {
        Self {
            tracked: vec![Species::He, Species::D, Species::T, Species::V],
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.tracked.len() > MAX_PS_DIM - 1 {
            return Err(NetworkError::InvalidMoments(format!(
                "at most {} axes can be tracked, got {}",
                MAX_PS_DIM - 1,
                self.tracked.len()
            )));
        }
        for (n, species) in self.tracked.iter().enumerate() {
            if *species == Species::I {
                return Err(NetworkError::InvalidMoments(
                    "interstitials do not form a composition axis".to_string(),
                ));
            }
            if self.tracked[..n].contains(species) {
                return Err(NetworkError::InvalidMoments(format!(
                    "axis {:?} is tracked twice",
                    species
                )));
            }
        }
        Ok(())
    }

    pub fn ps_dim(&self) -> usize {
        self.tracked.len() + 1
    }

    /// composition axis (0..4) of expansion position `i`, `1 <= i < psDim`
    pub fn axis(&self, i: usize) -> usize {
        self.tracked[i - 1].comp_idx()
    }

    /// 1-based axis list: entry `i` is `axis(i) + 1`, entry 0 is unused
    pub fn index_list(&self) -> [usize; MAX_PS_DIM] {
        let mut list = [0; MAX_PS_DIM];
        for i in 1..self.ps_dim() {
            list[i] = self.axis(i) + 1;
        }
        list
    }

    pub fn is_tracked(&self, axis: usize) -> bool {
        self.tracked.iter().any(|s| s.comp_idx() == axis)
    }
}

/// Everything a network needs to know before the first cluster is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub moments: MomentConfig,
    /// length of every reaction rate array
    pub grid_points: usize,
    /// drop the full coefficient lists once the zeroth-order shadows are built
    #[serde(default)]
    pub release_full_lists: bool,
}

impl NetworkSettings {
    pub fn new(moments: MomentConfig, grid_points: usize) -> Self {
        Self {
            moments,
            grid_points,
            release_full_lists: false,
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        self.moments.validate()?;
        if self.grid_points == 0 {
            return Err(NetworkError::InvalidMoments(
                "a network needs at least one grid point".to_string(),
            ));
        }
        Ok(())
    }
}
