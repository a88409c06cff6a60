//! # Session State
//!
//! Turn-level glue between the grid, its occupants, and the traversal and
//! visibility engines.
//!
//! A [`Session`] owns one grid and the arena of occupants standing on it.
//! Callers drive it one action at a time: a player action, then a monster
//! turn. Each call reports what happened as [`GameEvent`]s plus an
//! [`Outcome`]; the session never ends the process itself.

use crate::utils::{find_path, find_path_with, refresh_visibility, Path, PathOptions};
use crate::{
    attack, config, Direction, Grid, Level, Occupant, OccupantId, OccupantKind, Occupants,
    Position, SpawnMarker, WayfarerError, WayfarerResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-session tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sight radius given to the player, in tiles
    pub sight_radius: u32,
    /// Cap on A* frontier pops per monster chase; `None` searches exhaustively
    pub chase_max_expansions: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sight_radius: config::DEFAULT_SIGHT_RADIUS,
            chase_max_expansions: Some(config::DEFAULT_CHASE_EXPANSIONS),
        }
    }
}

/// Something the player can do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step, attack or open a door, depending on what is in the way
    Move(Direction),
    /// Debug path from the player to the cell two right and one down
    Search,
    Wait,
}

/// Events produced while resolving a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved {
        occupant: OccupantId,
        from: Position,
        to: Position,
    },
    DoorOpened {
        position: Position,
    },
    Attacked {
        attacker: OccupantId,
        defender: OccupantId,
        damage: u32,
    },
    Died {
        occupant: OccupantId,
        kind: OccupantKind,
        position: Position,
    },
    Message {
        text: String,
    },
}

/// Whether play can go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Continue,
    /// The player has no hitpoints left
    Defeat,
}

/// Everything one call into the session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub events: Vec<GameEvent>,
    pub outcome: Outcome,
    /// Set by [`Action::Search`]
    pub path: Option<Path>,
}

impl TurnReport {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            outcome: Outcome::Continue,
            path: None,
        }
    }

    fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Running totals derived from the events a session produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub steps_taken: u64,
    pub doors_opened: u32,
    pub monsters_slain: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
}

impl SessionStatistics {
    /// Folds one event into the totals, from the player's point of view.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: OccupantId) {
        match event {
            GameEvent::Moved { occupant, .. } if *occupant == player_id => {
                self.steps_taken += 1;
            }
            GameEvent::DoorOpened { .. } => {
                self.doors_opened += 1;
            }
            GameEvent::Attacked {
                attacker,
                defender,
                damage,
            } => {
                if *attacker == player_id {
                    self.damage_dealt += *damage as u64;
                } else if *defender == player_id {
                    self.damage_taken += *damage as u64;
                }
            }
            GameEvent::Died { occupant, .. } if *occupant != player_id => {
                self.monsters_slain += 1;
            }
            _ => {}
        }
    }
}

/// A grid, its occupants, and the turn counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    grid: Grid,
    occupants: Occupants,
    player_id: OccupantId,
    config: SessionConfig,
    turn_number: u64,
    outcome: Outcome,
    statistics: SessionStatistics,
}

impl Session {
    /// Places the level's spawns and computes the player's initial view.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the level has no player spawn; `InvalidAction` if
    /// two spawns share a cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::{parse, Position, Session, SessionConfig};
    ///
    /// let level = parse("######\n#@..R#\n######\n").unwrap();
    /// let session = Session::from_level(level, &SessionConfig::default()).unwrap();
    /// assert_eq!(session.player().unwrap().position, Position::new(1, 1));
    /// assert_eq!(session.occupants().len(), 2);
    /// assert!(session.grid().is_visible(Position::new(4, 1)));
    /// ```
    pub fn from_level(level: Level, config: &SessionConfig) -> WayfarerResult<Self> {
        let player_position = level
            .player_spawn()
            .ok_or_else(|| WayfarerError::InvalidState("Level has no player spawn".to_string()))?;

        let Level { mut grid, spawns } = level;
        let mut occupants = Occupants::new();

        let mut player = Occupant::new(OccupantKind::Player, player_position);
        player.sight_radius = config.sight_radius;
        let player_id = occupants.insert(player);
        grid.place_occupant(player_id, player_position)?;

        for spawn in &spawns {
            match spawn.marker {
                SpawnMarker::Player => {
                    if spawn.position != player_position {
                        log::warn!("Ignoring extra player spawn at {}", spawn.position);
                    }
                }
                marker => {
                    let kind = OccupantKind::from(marker);
                    let id = occupants.insert(Occupant::new(kind, spawn.position));
                    grid.place_occupant(id, spawn.position)?;
                }
            }
        }

        let mut session = Self {
            grid,
            occupants,
            player_id,
            config: config.clone(),
            turn_number: 0,
            outcome: Outcome::Continue,
            statistics: SessionStatistics::default(),
        };
        session.refresh_player_visibility()?;

        log::info!(
            "Session started with player at {} and {} monsters",
            player_position,
            session.occupants.len() - 1
        );
        Ok(session)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn occupants(&self) -> &Occupants {
        &self.occupants
    }

    pub fn player_id(&self) -> OccupantId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Occupant> {
        self.occupants.get(self.player_id)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.statistics
    }

    /// Immutable copy of the grid for readers outside the turn loop.
    pub fn publish(&self) -> Arc<Grid> {
        Arc::new(self.grid.clone())
    }

    /// Rebuilds the visible overlay around the player. `seen` only grows.
    pub fn refresh_player_visibility(&mut self) -> WayfarerResult<()> {
        let player = self.player_ref()?;
        let (origin, radius) = (player.position, player.sight_radius);
        refresh_visibility(&mut self.grid, origin, radius);
        Ok(())
    }

    /// Resolves one player action.
    ///
    /// # Errors
    ///
    /// `InvalidAction` once the player has been defeated.
    pub fn player_action(&mut self, action: Action) -> WayfarerResult<TurnReport> {
        if self.outcome == Outcome::Defeat {
            return Err(WayfarerError::InvalidAction(
                "The player has been defeated".to_string(),
            ));
        }

        self.turn_number += 1;
        let mut report = TurnReport::new();

        match action {
            Action::Move(direction) => self.player_move(direction, &mut report)?,
            Action::Search => {
                let from = self.player_ref()?.position;
                let goal = from + Position::new(2, 1);
                report.path = Some(find_path(&self.grid, from, goal));
            }
            Action::Wait => {}
        }

        self.finish(&mut report);
        Ok(report)
    }

    fn player_move(&mut self, direction: Direction, report: &mut TurnReport) -> WayfarerResult<()> {
        let from = self.player_ref()?.position;
        let to = from.step(direction);

        if self.grid.can_walk(to) {
            self.grid.move_occupant(from, to)?;
            self.player_mut()?.position = to;
            report.push(GameEvent::Moved {
                occupant: self.player_id,
                from,
                to,
            });
            self.refresh_player_visibility()?;
        } else if let Some(target) = self.grid.occupant_at(to) {
            self.resolve_attack(self.player_id, target, report)?;
        } else if self.grid.toggle_door(to) {
            report.push(GameEvent::DoorOpened { position: to });
            self.refresh_player_visibility()?;
        } else {
            log::debug!("Player bumped into {:?} at {}", self.grid.terrain(to), to);
        }
        Ok(())
    }

    /// Lets every living monster act once, in handle order.
    pub fn monster_turn(&mut self) -> TurnReport {
        let mut report = TurnReport::new();

        for id in self.occupants.ids() {
            if self.outcome == Outcome::Defeat {
                break;
            }
            if id == self.player_id {
                continue;
            }
            if let Err(err) = self.monster_act(id, &mut report) {
                log::warn!("Monster {} skipped its turn: {}", id, err);
            }
        }

        self.finish(&mut report);
        report
    }

    fn monster_act(&mut self, id: OccupantId, report: &mut TurnReport) -> WayfarerResult<()> {
        let target = self.player_ref()?.position;
        let (start, speed) = {
            let monster = self.occupant_mut(id)?;
            monster.stats.action_points += monster.stats.speed;
            (monster.position, monster.stats.speed)
        };

        let mut options = PathOptions::chase();
        options.max_expansions = self.config.chase_max_expansions;
        let path = find_path_with(&self.grid, start, target, &options);
        if path.is_empty() {
            log::debug!("Monster {} has no route to the player", id);
            self.settle_action_points(id, speed);
            return Ok(());
        }

        // The last position is the player's own cell.
        let reachable = path.len().saturating_sub(2);
        let budget = self.occupant_ref(id)?.stats.action_points.floor().max(0.0) as usize;
        let steps = budget.min(reachable);

        let mut current = start;
        for &next in path.positions().iter().skip(1).take(steps) {
            if !self.grid.can_walk(next) {
                break;
            }
            self.grid.move_occupant(current, next)?;
            current = next;
        }

        let spent = path_cost(&path, current);
        if current != start {
            let monster = self.occupant_mut(id)?;
            monster.position = current;
            monster.stats.action_points -= spent;
            report.push(GameEvent::Moved {
                occupant: id,
                from: start,
                to: current,
            });
        } else if current.is_adjacent(target) && self.occupant_ref(id)?.stats.action_points >= 1.0 {
            self.occupant_mut(id)?.stats.action_points -= 1.0;
            self.resolve_attack(id, self.player_id, report)?;
        }

        log::debug!("Monster {} advanced {} of {} affordable steps", id, spent, steps);
        self.settle_action_points(id, speed);
        Ok(())
    }

    /// Unspent points carry over, but never more than one turn's worth.
    fn settle_action_points(&mut self, id: OccupantId, speed: f64) {
        if let Some(monster) = self.occupants.get_mut(id) {
            monster.stats.action_points = monster.stats.action_points.min(speed);
        }
    }

    /// One blow from `attacker` to `defender`. Dead monsters leave the grid;
    /// a dead player ends the session with [`Outcome::Defeat`].
    fn resolve_attack(
        &mut self,
        attacker: OccupantId,
        defender: OccupantId,
        report: &mut TurnReport,
    ) -> WayfarerResult<()> {
        let striker = self.occupant_ref(attacker)?.clone();
        let target = self.occupant_mut(defender)?;
        let damage = attack(&striker, target);
        let (alive, kind, position) = (target.is_alive(), target.kind, target.position);

        report.push(GameEvent::Attacked {
            attacker,
            defender,
            damage,
        });

        if alive {
            return Ok(());
        }

        report.push(GameEvent::Died {
            occupant: defender,
            kind,
            position,
        });
        if defender == self.player_id {
            self.outcome = Outcome::Defeat;
            report.push(GameEvent::Message {
                text: format!("{} was slain by {}", kind.name(), striker.name()),
            });
            log::info!("Player defeated by {} {} on turn {}", striker.name(), attacker, self.turn_number);
        } else {
            self.remove_occupant(defender)?;
        }
        Ok(())
    }

    /// Takes an occupant out of both the arena and the grid index.
    pub fn remove_occupant(&mut self, id: OccupantId) -> WayfarerResult<Occupant> {
        let occupant = self
            .occupants
            .remove(id)
            .ok_or_else(|| WayfarerError::InvalidState(format!("Unknown occupant {}", id)))?;
        self.grid.remove_occupant(occupant.position);
        Ok(occupant)
    }

    /// Saves the session to JSON.
    pub fn save_to_json(&self) -> WayfarerResult<String> {
        serde_json::to_string_pretty(self).map_err(WayfarerError::from)
    }

    /// Loads a session from JSON.
    ///
    /// # Errors
    ///
    /// `Config` if the JSON does not decode (including a grid whose cell
    /// count disagrees with its size); `InvalidState` if the arena and the
    /// grid's occupancy index disagree.
    pub fn load_from_json(json: &str) -> WayfarerResult<Self> {
        let session: Session = serde_json::from_str(json)?;
        session.check_occupancy()?;
        Ok(session)
    }

    /// Every arena occupant is indexed at its own position, and the index
    /// holds nobody else.
    fn check_occupancy(&self) -> WayfarerResult<()> {
        self.occupants.check_handles()?;
        self.player_ref()?;

        for occupant in self.occupants.iter() {
            if self.grid.occupant_at(occupant.position) != Some(occupant.id) {
                return Err(WayfarerError::InvalidState(format!(
                    "{} {} is not indexed at {}",
                    occupant.name(),
                    occupant.id,
                    occupant.position
                )));
            }
        }

        if self.grid.occupant_count() != self.occupants.len() {
            return Err(WayfarerError::InvalidState(format!(
                "Grid indexes {} occupants but the arena holds {}",
                self.grid.occupant_count(),
                self.occupants.len()
            )));
        }
        Ok(())
    }

    fn finish(&mut self, report: &mut TurnReport) {
        for event in &report.events {
            self.statistics.update_from_event(event, self.player_id);
        }
        report.outcome = self.outcome;
    }

    fn player_ref(&self) -> WayfarerResult<&Occupant> {
        self.occupant_ref(self.player_id)
    }

    fn player_mut(&mut self) -> WayfarerResult<&mut Occupant> {
        let id = self.player_id;
        self.occupant_mut(id)
    }

    fn occupant_ref(&self, id: OccupantId) -> WayfarerResult<&Occupant> {
        self.occupants
            .get(id)
            .ok_or_else(|| WayfarerError::InvalidState(format!("Unknown occupant {}", id)))
    }

    fn occupant_mut(&mut self, id: OccupantId) -> WayfarerResult<&mut Occupant> {
        self.occupants
            .get_mut(id)
            .ok_or_else(|| WayfarerError::InvalidState(format!("Unknown occupant {}", id)))
    }
}

/// Action points spent walking `path` from its start up to `reached`.
fn path_cost(path: &Path, reached: Position) -> f64 {
    path.positions()
        .iter()
        .skip(1)
        .position(|&pos| pos == reached)
        .map_or(0.0, |index| (index + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, TerrainKind};

    fn session(map: &str) -> Session {
        Session::from_level(parse(map).unwrap(), &SessionConfig::default()).unwrap()
    }

    fn player_pos(session: &Session) -> Position {
        session.player().unwrap().position
    }

    #[test]
    fn test_session_from_level() {
        let session = session("#######\n#@.R.S#\n#######\n");
        assert_eq!(session.turn_number(), 0);
        assert_eq!(session.occupants().len(), 3);
        assert_eq!(session.grid().occupant_count(), 3);
        assert_eq!(session.grid().occupant_at(Position::new(1, 1)), Some(session.player_id()));

        let kinds: Vec<OccupantKind> = session.occupants().iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OccupantKind::Player, OccupantKind::Rat, OccupantKind::Spider]);
        assert!(session.grid().is_seen(Position::new(5, 1)));
    }

    #[test]
    fn test_level_without_player_fails() {
        let result = Session::from_level(parse("#####\n#.R.#\n#####\n").unwrap(), &SessionConfig::default());
        assert!(matches!(result, Err(WayfarerError::InvalidState(_))));
    }

    #[test]
    fn test_player_moves_onto_floor() {
        let mut session = session("######\n#@...#\n######\n");
        let report = session.player_action(Action::Move(Direction::East)).unwrap();

        assert_eq!(player_pos(&session), Position::new(2, 1));
        assert_eq!(
            report.events,
            vec![GameEvent::Moved {
                occupant: session.player_id(),
                from: Position::new(1, 1),
                to: Position::new(2, 1),
            }]
        );
        assert_eq!(report.outcome, Outcome::Continue);
        assert_eq!(session.grid().occupant_at(Position::new(2, 1)), Some(session.player_id()));
        assert!(!session.grid().is_occupied(Position::new(1, 1)));
        assert_eq!(session.turn_number(), 1);
        assert_eq!(session.statistics().steps_taken, 1);
    }

    #[test]
    fn test_player_blocked_by_wall() {
        let mut session = session("#####\n#@..#\n#####\n");
        let report = session.player_action(Action::Move(Direction::North)).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(player_pos(&session), Position::new(1, 1));
    }

    #[test]
    fn test_bumping_door_opens_it_and_reveals() {
        let mut session = session("#######\n#@|...#\n#######\n");
        let door = Position::new(2, 1);
        assert!(!session.grid().is_seen(Position::new(3, 1)));

        let report = session.player_action(Action::Move(Direction::East)).unwrap();
        assert_eq!(report.events, vec![GameEvent::DoorOpened { position: door }]);
        assert_eq!(player_pos(&session), Position::new(1, 1));
        assert_eq!(session.grid().terrain(door), Some(TerrainKind::OpenDoor));
        assert!(session.grid().is_visible(Position::new(5, 1)));
        assert_eq!(session.statistics().doors_opened, 1);

        session.player_action(Action::Move(Direction::East)).unwrap();
        assert_eq!(player_pos(&session), door);
        assert_eq!(session.statistics().steps_taken, 1);
    }

    #[test]
    fn test_player_kills_rat() {
        let mut session = session("#####\n#@R.#\n#####\n");
        let rat = session.grid().occupant_at(Position::new(2, 1)).unwrap();

        for _ in 0..2 {
            let report = session.player_action(Action::Move(Direction::East)).unwrap();
            assert_eq!(
                report.events,
                vec![GameEvent::Attacked {
                    attacker: session.player_id(),
                    defender: rat,
                    damage: 20,
                }]
            );
        }
        assert_eq!(session.occupants().get(rat).unwrap().stats.hitpoints, 10);

        let report = session.player_action(Action::Move(Direction::East)).unwrap();
        assert!(report.events.contains(&GameEvent::Died {
            occupant: rat,
            kind: OccupantKind::Rat,
            position: Position::new(2, 1),
        }));
        assert!(session.occupants().get(rat).is_none());
        assert!(!session.grid().is_occupied(Position::new(2, 1)));
        assert_eq!(player_pos(&session), Position::new(1, 1));
        assert_eq!(session.statistics().monsters_slain, 1);
        assert_eq!(session.statistics().damage_dealt, 50);
    }

    #[test]
    fn test_search_reports_debug_path() {
        let mut session = session("######\n#@...#\n#....#\n######\n");
        let report = session.player_action(Action::Search).unwrap();
        let path = report.path.unwrap();
        assert_eq!(path.start(), Some(Position::new(1, 1)));
        assert_eq!(path.goal(), Some(Position::new(3, 2)));
        assert_eq!(path.steps(), 3);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_search_toward_wall_is_empty() {
        let mut session = session("####\n#@.#\n####\n");
        let report = session.player_action(Action::Search).unwrap();
        assert_eq!(report.path, Some(Path::none()));
    }

    #[test]
    fn test_rat_closes_in_then_attacks() {
        let mut session = session("########\n#@....R#\n########\n");
        let rat = session.grid().occupant_at(Position::new(6, 1)).unwrap();

        let report = session.monster_turn();
        assert_eq!(
            report.events,
            vec![GameEvent::Moved {
                occupant: rat,
                from: Position::new(6, 1),
                to: Position::new(4, 1),
            }]
        );

        session.monster_turn();
        assert_eq!(session.occupants().get(rat).unwrap().position, Position::new(2, 1));

        let report = session.monster_turn();
        assert_eq!(
            report.events,
            vec![GameEvent::Attacked {
                attacker: rat,
                defender: session.player_id(),
                damage: 5,
            }]
        );
        assert_eq!(session.player().unwrap().stats.hitpoints, 95);
        assert_eq!(session.occupants().get(rat).unwrap().position, Position::new(2, 1));
        assert_eq!(session.statistics().damage_taken, 5);
    }

    #[test]
    fn test_walled_off_monster_passes() {
        let mut session = session("#######\n#@.#.S#\n#######\n");
        let report = session.monster_turn();
        assert!(report.events.is_empty());
        assert_eq!(report.outcome, Outcome::Continue);
    }

    #[test]
    fn test_monster_blocked_by_another_waits() {
        let mut session = session("#######\n#@.SR.#\n#######\n");
        let spider = session.grid().occupant_at(Position::new(3, 1)).unwrap();
        let rat = session.grid().occupant_at(Position::new(4, 1)).unwrap();

        let report = session.monster_turn();
        // The spider steps next to the player and seals the corridor.
        assert_eq!(session.occupants().get(spider).unwrap().position, Position::new(2, 1));
        assert_eq!(session.occupants().get(rat).unwrap().position, Position::new(4, 1));
        assert_eq!(report.events.len(), 1);
        assert_eq!(session.grid().occupant_count(), 3);

        // Points left over from the idle turn are capped at one turn's worth.
        session.monster_turn();
        assert_eq!(session.occupants().get(rat).unwrap().stats.action_points, 2.0);
    }

    #[test]
    fn test_player_defeat() {
        let mut session = session("#####\n#@S.#\n#####\n");
        let player = session.player_id();
        session.occupants.get_mut(player).unwrap().stats.hitpoints = 10;

        let report = session.monster_turn();
        assert_eq!(report.outcome, Outcome::Defeat);
        assert!(report.events.iter().any(|event| matches!(
            event,
            GameEvent::Died { kind: OccupantKind::Player, .. }
        )));
        assert!(session.player().is_some());

        assert!(matches!(
            session.player_action(Action::Wait),
            Err(WayfarerError::InvalidAction(_))
        ));
        assert_eq!(session.monster_turn().outcome, Outcome::Defeat);
    }

    #[test]
    fn test_publish_is_a_snapshot() {
        let mut session = session("######\n#@...#\n######\n");
        let snapshot = session.publish();
        session.player_action(Action::Move(Direction::East)).unwrap();

        assert_eq!(snapshot.occupant_at(Position::new(1, 1)), Some(session.player_id()));
        assert!(!session.grid().is_occupied(Position::new(1, 1)));
    }

    #[test]
    fn test_remove_unknown_occupant() {
        let mut session = session("####\n#@R#\n####\n");
        let rat = session.grid().occupant_at(Position::new(2, 1)).unwrap();
        assert_eq!(session.remove_occupant(rat).unwrap().kind, OccupantKind::Rat);
        assert!(matches!(
            session.remove_occupant(rat),
            Err(WayfarerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut session = session("######\n#@..S#\n######\n");
        session.player_action(Action::Move(Direction::East)).unwrap();

        let json = session.save_to_json().unwrap();
        let restored = Session::load_from_json(&json).unwrap();
        assert_eq!(restored.grid(), session.grid());
        assert_eq!(restored.turn_number(), 1);
        assert_eq!(player_pos(&restored), Position::new(2, 1));
    }

    #[test]
    fn test_load_rejects_truncated_cells() {
        let session = session("######\n#@..S#\n######\n");
        let mut value: serde_json::Value = serde_json::from_str(&session.save_to_json().unwrap()).unwrap();
        value["grid"]["cells"] = serde_json::json!([]);

        let result = Session::load_from_json(&value.to_string());
        assert!(matches!(result, Err(WayfarerError::Config(_))));
    }

    #[test]
    fn test_load_rejects_index_out_of_step_with_arena() {
        let session = session("######\n#@..S#\n######\n");
        let mut value: serde_json::Value = serde_json::from_str(&session.save_to_json().unwrap()).unwrap();
        value["occupants"]["slots"][1]["position"]["x"] = serde_json::json!(3);

        let result = Session::load_from_json(&value.to_string());
        assert!(matches!(result, Err(WayfarerError::InvalidState(_))));

        let mut value: serde_json::Value = serde_json::from_str(&session.save_to_json().unwrap()).unwrap();
        value["grid"]["occupancy"] = serde_json::json!([]);
        let result = Session::load_from_json(&value.to_string());
        assert!(matches!(result, Err(WayfarerError::InvalidState(_))));
    }
}
