//! # Occupants
//!
//! Players and monsters, stored in an arena and addressed by small integer
//! handles. The grid's occupancy index maps positions back to these handles;
//! removing an occupant clears both.

use crate::{config, Position, SpawnMarker, WayfarerError, WayfarerResult};
use serde::{Deserialize, Serialize};

/// Stable handle into [`Occupants`]. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(u32);

impl OccupantId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for OccupantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an occupant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    Player,
    Rat,
    Spider,
}

impl OccupantKind {
    pub fn name(self) -> &'static str {
        match self {
            OccupantKind::Player => "Player",
            OccupantKind::Rat => "Rat",
            OccupantKind::Spider => "Spider",
        }
    }

    pub fn is_monster(self) -> bool {
        !matches!(self, OccupantKind::Player)
    }

    /// Base stats for a freshly spawned occupant of this kind.
    pub fn base_stats(self) -> Stats {
        match self {
            OccupantKind::Player => Stats::new(100, 20, 1.0),
            OccupantKind::Rat => Stats::new(50, 5, 2.0),
            OccupantKind::Spider => Stats::new(100, 10, 1.0),
        }
    }
}

impl From<SpawnMarker> for OccupantKind {
    fn from(marker: SpawnMarker) -> Self {
        match marker {
            SpawnMarker::Player => OccupantKind::Player,
            SpawnMarker::Rat => OccupantKind::Rat,
            SpawnMarker::Spider => OccupantKind::Spider,
        }
    }
}

/// Combat and pacing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hitpoints: u32,
    pub strength: u32,
    /// Action points gained per monster turn; one point buys one path step.
    pub speed: f64,
    pub action_points: f64,
}

impl Stats {
    pub fn new(hitpoints: u32, strength: u32, speed: f64) -> Self {
        Self {
            hitpoints,
            strength,
            speed,
            action_points: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }
}

/// A player or monster standing on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: OccupantId,
    pub kind: OccupantKind,
    pub position: Position,
    pub stats: Stats,
    /// Zero means the occupant has no vision of its own.
    pub sight_radius: u32,
}

impl Occupant {
    /// Builds an occupant with the base stats of `kind`. The id is assigned by
    /// [`Occupants::insert`].
    pub fn new(kind: OccupantKind, position: Position) -> Self {
        let sight_radius = match kind {
            OccupantKind::Player => config::DEFAULT_SIGHT_RADIUS,
            _ => 0,
        };
        Self {
            id: OccupantId::new(0),
            kind,
            position,
            stats: kind.base_stats(),
            sight_radius,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }
}

/// Applies one blow from `attacker` to `defender` and returns the damage dealt.
///
/// # Examples
///
/// ```
/// use wayfarer::{attack, Occupant, OccupantKind, Position};
///
/// let spider = Occupant::new(OccupantKind::Spider, Position::new(1, 1));
/// let mut rat = Occupant::new(OccupantKind::Rat, Position::new(2, 1));
/// assert_eq!(attack(&spider, &mut rat), 10);
/// assert_eq!(rat.stats.hitpoints, 40);
/// ```
pub fn attack(attacker: &Occupant, defender: &mut Occupant) -> u32 {
    let damage = attacker.stats.strength.min(defender.stats.hitpoints);
    defender.stats.hitpoints -= damage;
    log::debug!(
        "{} {} hits {} {} for {}",
        attacker.name(),
        attacker.id,
        defender.name(),
        defender.id,
        damage
    );
    damage
}

/// Arena of occupants indexed by [`OccupantId`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occupants {
    slots: Vec<Option<Occupant>>,
}

impl Occupants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `occupant` and returns its freshly assigned handle.
    pub fn insert(&mut self, mut occupant: Occupant) -> OccupantId {
        let id = OccupantId::new(self.slots.len() as u32);
        occupant.id = id;
        self.slots.push(Some(occupant));
        id
    }

    pub fn get(&self, id: OccupantId) -> Option<&Occupant> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: OccupantId) -> Option<&mut Occupant> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Takes the occupant out of the arena. The slot stays empty for good.
    pub fn remove(&mut self, id: OccupantId) -> Option<Occupant> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }

    /// Live handles in ascending order.
    pub fn ids(&self) -> Vec<OccupantId> {
        self.iter().map(|occupant| occupant.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Occupant> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails if an occupant's handle does not match its slot.
    pub(crate) fn check_handles(&self) -> WayfarerResult<()> {
        for (slot, occupant) in self.slots.iter().enumerate() {
            if let Some(occupant) = occupant {
                if occupant.id.0 as usize != slot {
                    return Err(WayfarerError::InvalidState(format!(
                        "{} {} is stored in slot {}",
                        occupant.name(),
                        occupant.id,
                        slot
                    )));
                }
            }
        }
        Ok(())
    }
}
