//! Floor map generation — a 15-floor, 3-lane spire graph.
//!
//! Floor 0 is all enemies, the top floor all bosses, one interior floor
//! all treasure; everything else draws its type from a weighted table.
//! Every node always connects to the same lane one floor up, so at
//! least one path to the boss exists by construction.

use crate::state::{MapNode, NodeState, NodeType};

pub const FLOORS: usize = 15;
pub const LANES: usize = 3;
pub const TREASURE_FLOOR: usize = 8;
pub const BOSS_FLOOR: usize = FLOORS - 1;

// ── RNG (same LCG as RunState::roll) ──────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

fn rng_range(seed: &mut u64, max: u32) -> u32 {
    *seed = next_rng(*seed);
    ((*seed >> 33) % max.max(1) as u64) as u32
}

// ── Generation ────────────────────────────────────────────────

/// Weighted draw for interior floors: 45% enemy, 15% unknown,
/// 15% merchant, 15% rest, 10% elite.
fn draw_node_type(seed: &mut u64) -> NodeType {
    let roll = rng_range(seed, 100);
    if roll < 45 {
        NodeType::Enemy
    } else if roll < 60 {
        NodeType::Unknown
    } else if roll < 75 {
        NodeType::Merchant
    } else if roll < 90 {
        NodeType::Rest
    } else {
        NodeType::Elite
    }
}

/// Generate a fresh act map. Pure: always succeeds, fully determined
/// by the seed.
pub fn generate_map(rng_seed: &mut u64) -> Vec<Vec<MapNode>> {
    let mut map: Vec<Vec<MapNode>> = Vec::with_capacity(FLOORS);

    for floor in 0..FLOORS {
        let mut nodes = Vec::with_capacity(LANES);
        for lane in 0..LANES {
            let kind = if floor == 0 {
                NodeType::Enemy
            } else if floor == BOSS_FLOOR {
                NodeType::Boss
            } else if floor == TREASURE_FLOOR {
                NodeType::Treasure
            } else {
                draw_node_type(rng_seed)
            };
            nodes.push(MapNode {
                floor,
                lane,
                kind,
                next: Vec::new(),
                state: NodeState::Locked,
            });
        }
        map.push(nodes);
    }

    // Connectivity: always the same lane, each neighbor lane at 50%.
    for floor in 0..FLOORS - 1 {
        for lane in 0..LANES {
            let node = &mut map[floor][lane];
            node.next.push(lane);
            if lane > 0 && rng_range(rng_seed, 100) < 50 {
                node.next.push(lane - 1);
            }
            if lane < LANES - 1 && rng_range(rng_seed, 100) < 50 {
                node.next.push(lane + 1);
            }
            node.next.sort_unstable();
            node.next.dedup();
        }
    }

    for node in &mut map[0] {
        node.state = NodeState::Available;
    }

    map
}

// ── Tests ─────────────────────────────────────────────────────
