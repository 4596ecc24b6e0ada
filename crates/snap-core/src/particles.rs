//! Bounded store of spawned particle nodes.

use crate::constants::{MAX_PARTICLES, PARTICLE_ID_LEN};
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type NodeId = String;

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleNode {
    pub id: NodeId,
    pub position: Vec3,
    /// Transport seconds at spawn.
    pub created_at: f64,
}

/// Lift a wave-plane position `(x, z)` onto the ground: `[x, 0, z]`.
#[inline]
pub fn ground_position(wave: Vec2) -> Vec3 {
    Vec3::new(wave.x, 0.0, wave.y)
}

pub struct ParticleRegistry {
    nodes: FnvHashMap<NodeId, ParticleNode>,
    // spawn order, for stable iteration
    order: Vec<NodeId>,
    rng: StdRng,
}

impl Default for ParticleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic id sequence, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: FnvHashMap::default(),
            order: Vec::new(),
            rng,
        }
    }

    fn next_id(&mut self) -> NodeId {
        loop {
            let id: String = (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(PARTICLE_ID_LEN)
                .map(char::from)
                .collect();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Store a node at `position`. Returns `None` once the registry is full.
    pub fn add_node(&mut self, position: Vec3, created_at: f64) -> Option<NodeId> {
        if self.nodes.len() >= MAX_PARTICLES {
            log::warn!(
                "[particles] limit of {} reached, spawn dropped",
                MAX_PARTICLES
            );
            return None;
        }
        let id = self.next_id();
        self.nodes.insert(
            id.clone(),
            ParticleNode {
                id: id.clone(),
                position,
                created_at,
            },
        );
        self.order.push(id.clone());
        Some(id)
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.nodes.remove(id).is_none() {
            return false;
        }
        self.order.retain(|n| n != id);
        true
    }

    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }

    #[inline]
    pub fn reset(&mut self) {
        self.clear_nodes();
    }

    #[inline]
    pub fn get_node(&self, id: &str) -> Option<&ParticleNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleNode> + '_ {
        self.order.iter().filter_map(move |id| self.nodes.get(id))
    }
}
