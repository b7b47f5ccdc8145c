//! Player and villager actors, and tile-based movement.

use bevy::math::Vec2;

use super::grid::{Cell, SolidGrid};

pub const PLAYER_START: Vec2 = Vec2::new(14.0, 9.0);
/// Tiles per second.
pub const PLAYER_SPEED: f32 = 3.5;
/// A move may not end closer than this to a villager.
pub const NPC_BLOCK_RADIUS: f32 = 0.6;
/// Villagers within this distance can be talked to.
pub const TALK_RADIUS: f32 = 1.25;

/// Continuous position in tile units: x is the column, y the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub pos: Vec2,
    /// Last non-zero movement direction.
    pub dir: Vec2,
    pub speed: f32,
}

impl Actor {
    pub fn player() -> Self {
        Self {
            pos: PLAYER_START,
            dir: Vec2::new(0.0, 1.0),
            speed: PLAYER_SPEED,
        }
    }

    pub fn cell(&self) -> Cell {
        cell_at(self.pos)
    }

    /// The tile one step ahead in the facing direction.
    pub fn facing_cell(&self) -> Cell {
        cell_at(self.pos + self.dir)
    }

    /// Try to move along `dir` for `dt` seconds. The move is all-or-nothing:
    /// rejected when the rounded destination is solid or `blocked` says so.
    pub fn try_move(
        &mut self,
        dir: Vec2,
        dt: f32,
        solids: &SolidGrid,
        blocked: impl Fn(Vec2) -> bool,
    ) -> bool {
        if dir != Vec2::ZERO {
            self.dir = dir;
        }
        let next = self.pos + dir * self.speed * dt;
        if solids.is_solid(cell_at(next)) || blocked(next) {
            return false;
        }
        self.pos = next;
        true
    }
}

pub fn cell_at(pos: Vec2) -> Cell {
    Cell::new(pos.y.round() as i32, pos.x.round() as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcId {
    Hana,
    Kumo,
    Sora,
    Poko,
}

impl NpcId {
    pub const ALL: [NpcId; 4] = [NpcId::Hana, NpcId::Kumo, NpcId::Sora, NpcId::Poko];

    pub fn name(self) -> &'static str {
        match self {
            NpcId::Hana => "Hana",
            NpcId::Kumo => "Kumo",
            NpcId::Sora => "Sora",
            NpcId::Poko => "Poko",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Farmer,
    Cook,
    Furniture,
    Pet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub id: NpcId,
    pub role: Role,
    pub home: Vec2,
    pub pos: Vec2,
    pub mood: &'static str,
}

impl Npc {
    fn new(id: NpcId, role: Role, home: Vec2, mood: &'static str) -> Self {
        Self { id, role, home, pos: home, mood }
    }

    pub fn villagers() -> Vec<Npc> {
        vec![
            Npc::new(NpcId::Hana, Role::Farmer, Vec2::new(6.0, 7.0), "Seeds make the village glow."),
            Npc::new(NpcId::Kumo, Role::Cook, Vec2::new(18.0, 6.0), "Fresh food brings energy."),
            Npc::new(NpcId::Sora, Role::Furniture, Vec2::new(22.0, 12.0), "A cozy home is a happy heart."),
            Npc::new(NpcId::Poko, Role::Pet, Vec2::new(12.0, 11.0), "Pets make the island feel alive."),
        ]
    }
}

/// Closest villager strictly within `radius` of `pos`.
pub fn nearest_npc(npcs: &[Npc], pos: Vec2, radius: f32) -> Option<&Npc> {
    npcs.iter()
        .map(|npc| (npc, npc.pos.distance(pos)))
        .filter(|&(_, dist)| dist < radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(npc, _)| npc)
}
