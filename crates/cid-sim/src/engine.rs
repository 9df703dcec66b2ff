//! Simulation engine, the orchestrating state machine of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the defenders, the single
//! pending-encounter slot and the injected question source. It processes
//! player commands, runs all systems in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use cid_core::commands::PlayerCommand;
use cid_core::components::{Enemy, EnemyProfile, Health, Tower, TowerState};
use cid_core::constants::*;
use cid_core::defender::Defender;
use cid_core::enums::*;
use cid_core::errors::{AnswerError, PlacementError, TowerError};
use cid_core::events::GameEvent;
use cid_core::question::OPTION_COUNT;
use cid_core::state::{AnswerStats, GameStateSnapshot};
use cid_core::types::{Position, SimTime};

use cid_quiz::{QuestionBank, QuestionSource, QuizError};
use cid_threat_ai::profiles::balanced_damage;

use crate::encounter::{Encounter, ScoreState};
use crate::messages::MessageLog;
use crate::systems;
use crate::systems::enemy_ai::Contact;
use crate::systems::projectiles::Kill;
use crate::systems::snapshot::{sell_value, SessionRefs};
use crate::systems::wave_spawner::WaveClock;
use crate::world_setup;

/// Configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Waves in a run; clearing the last one wins.
    pub max_waves: u32,
    /// Seconds of play between waves.
    pub wave_interval_secs: f64,
    /// Seconds of play before the first wave.
    pub first_wave_delay_secs: f64,
    /// Seconds the player has to answer.
    pub question_time_limit_secs: f64,
    pub starting_score: i64,
    pub game_over_policy: GameOverPolicy,
    /// Seconds before the intro hands over to the menu.
    pub intro_duration_secs: f64,
    /// Upper bound on a single frame's delta time.
    pub max_frame_dt: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_waves: 5,
            wave_interval_secs: 15.0,
            first_wave_delay_secs: 1.0,
            question_time_limit_secs: QUESTION_TIME_LIMIT_SECS,
            starting_score: 200,
            game_over_policy: GameOverPolicy::default(),
            intro_duration_secs: 3.0,
            max_frame_dt: 0.25,
        }
    }
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    questions: Box<dyn QuestionSource>,
    defenders: BTreeMap<DefenderId, Defender>,
    /// At most one contact is resolved at a time.
    pending: Option<Encounter>,
    score: ScoreState,
    waves: WaveClock,
    intro_elapsed_secs: f64,
    selected_tower: Option<TowerKind>,
    next_enemy_id: u32,
    next_tower_id: u32,
    messages: MessageLog,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine backed by the bundled question bank.
    pub fn new(config: SimConfig) -> Result<Self, QuizError> {
        let bank = QuestionBank::builtin()?;
        Ok(Self::with_question_source(config, Box::new(bank)))
    }

    /// Create an engine with a caller-provided question source.
    pub fn with_question_source(config: SimConfig, questions: Box<dyn QuestionSource>) -> Self {
        let waves = WaveClock::new(
            config.max_waves,
            config.wave_interval_secs,
            config.first_wave_delay_secs,
        );
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            questions,
            defenders: world_setup::setup_defenders(1),
            pending: None,
            score: ScoreState::new(config.starting_score),
            waves,
            intro_elapsed_secs: 0.0,
            selected_tower: None,
            next_enemy_id: 0,
            next_tower_id: 0,
            messages: MessageLog::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// Combat only runs in `Playing`. In `Question` only the answer countdown
    /// and message fades advance.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        self.process_commands();

        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };

        match self.phase {
            GamePhase::Intro => {
                self.intro_elapsed_secs += dt;
                if self.intro_elapsed_secs >= self.config.intro_duration_secs {
                    self.phase = GamePhase::Menu;
                }
            }
            GamePhase::Playing => {
                self.run_systems(dt);
                self.time.advance(dt);
            }
            GamePhase::Question => {
                self.run_question_timer(dt);
                self.messages.tick(dt);
            }
            GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => {}
        }

        self.snapshot()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn score(&self) -> i64 {
        self.score.score
    }

    pub fn stats(&self) -> AnswerStats {
        self.score.stats
    }

    /// Last wave spawned (0 before the first).
    pub fn wave_number(&self) -> u32 {
        self.waves.wave_number
    }

    pub fn defenders(&self) -> &BTreeMap<DefenderId, Defender> {
        &self.defenders
    }

    pub fn selected_tower(&self) -> Option<TowerKind> {
        self.selected_tower
    }

    pub fn enemy_count(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Input surface ---

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            info!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            info!("resumed");
        }
    }

    /// Reset the session and start playing again.
    pub fn restart(&mut self) {
        if self.phase.in_session() {
            self.start_session();
        }
    }

    /// Choose the tower type used by the next placement.
    pub fn select_tower_type(&mut self, kind: TowerKind) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.selected_tower = Some(kind);
        }
    }

    /// Place the selected tower, reporting refusals as a boolean.
    pub fn attempt_place_tower(&mut self, x: f64, y: f64) -> bool {
        let position = Position::new(x, y);
        match self.try_place_tower(position) {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, x, y, "tower placement refused");
                if self.phase == GamePhase::Playing {
                    self.messages
                        .push(MessageLevel::Error, MessageAnchor::Top, err.to_string());
                    world_setup::spawn_particle_burst(
                        &mut self.world,
                        &mut self.rng,
                        ParticleKind::Error,
                        position,
                    );
                }
                false
            }
        }
    }

    /// Place the selected tower. The selection is consumed by the attempt;
    /// a refusal leaves score and towers untouched.
    pub fn try_place_tower(&mut self, position: Position) -> Result<u32, PlacementError> {
        if self.phase != GamePhase::Playing {
            return Err(PlacementError::NotPlaying);
        }
        let kind = self
            .selected_tower
            .take()
            .ok_or(PlacementError::NoTowerSelected)?;
        let template = world_setup::tower_template(kind);
        self.check_placement(template.cost, &position)?;

        let id = self.next_tower_id;
        self.next_tower_id += 1;
        world_setup::spawn_tower(&mut self.world, id, kind, position);
        self.score.score -= template.cost;
        self.score.towers_built += 1;

        info!(tower = id, ?kind, x = position.x, y = position.y, "tower built");
        self.events.push(GameEvent::TowerBuilt { tower_id: id, kind });
        world_setup::spawn_particle_burst(&mut self.world, &mut self.rng, ParticleKind::Build, position);
        Ok(id)
    }

    fn check_placement(&self, cost: i64, position: &Position) -> Result<(), PlacementError> {
        let in_field = (0.0..=FIELD_WIDTH).contains(&position.x)
            && (0.0..=FIELD_HEIGHT).contains(&position.y);
        if !in_field {
            return Err(PlacementError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        if self.score.score < cost {
            return Err(PlacementError::InsufficientScore {
                cost,
                have: self.score.score,
            });
        }
        for (_, (_, tower_pos)) in self.world.query::<(&Tower, &Position)>().iter() {
            let distance = tower_pos.distance_to(position);
            if distance < MIN_TOWER_SPACING {
                return Err(PlacementError::TooCloseToTower { distance });
            }
        }
        for d in self.defenders.values() {
            if d.position.distance_to(position) < DEFENDER_EXCLUSION_RADIUS {
                return Err(PlacementError::RestrictedZone { defender: d.id });
            }
        }
        Ok(())
    }

    /// Upgrade a tower one level. Returns the new level.
    pub fn upgrade_tower(&mut self, tower_id: u32) -> Result<u8, TowerError> {
        if self.phase != GamePhase::Playing {
            return Err(TowerError::NotPlaying);
        }
        let tower = self
            .world
            .query_mut::<(&Tower, &mut TowerState)>()
            .into_iter()
            .map(|(_, (_, tower))| tower)
            .find(|tower| tower.id == tower_id)
            .ok_or(TowerError::NotFound(tower_id))?;

        if tower.level >= MAX_TOWER_LEVEL {
            return Err(TowerError::MaxLevel);
        }
        let cost = tower.upgrade_cost;
        if self.score.score < cost {
            return Err(TowerError::InsufficientScore {
                cost,
                have: self.score.score,
            });
        }

        tower.level += 1;
        tower.damage *= UPGRADE_DAMAGE_FACTOR;
        tower.range *= UPGRADE_RANGE_FACTOR;
        tower.fire_rate_hz *= UPGRADE_FIRE_RATE_FACTOR;
        tower.invested += cost;
        tower.upgrade_cost *= UPGRADE_COST_FACTOR;
        let level = tower.level;
        self.score.score -= cost;

        info!(tower = tower_id, level, cost, "tower upgraded");
        self.events.push(GameEvent::TowerUpgraded { tower_id, level });
        self.messages.push(
            MessageLevel::Success,
            MessageAnchor::Top,
            format!("Tower upgraded to level {level}"),
        );
        Ok(level)
    }

    /// Sell a tower for part of what was spent on it. Returns the refund.
    pub fn sell_tower(&mut self, tower_id: u32) -> Result<i64, TowerError> {
        if self.phase != GamePhase::Playing {
            return Err(TowerError::NotPlaying);
        }
        let (entity, refund) = self
            .world
            .query::<(&Tower, &TowerState)>()
            .iter()
            .find(|(_, (_, tower))| tower.id == tower_id)
            .map(|(entity, (_, tower))| (entity, sell_value(tower)))
            .ok_or(TowerError::NotFound(tower_id))?;

        let _ = self.world.despawn(entity);
        self.score.score += refund;

        info!(tower = tower_id, refund, "tower sold");
        self.events.push(GameEvent::TowerSold { tower_id, refund });
        self.messages.push(
            MessageLevel::Info,
            MessageAnchor::Top,
            format!("Tower sold for {refund} points"),
        );
        Ok(refund)
    }

    /// Answer the pending question. A second call for the same encounter is rejected.
    pub fn submit_answer(&mut self, option: usize) -> Result<AnswerResult, AnswerError> {
        let Some(encounter) = self.pending.as_ref() else {
            return Err(AnswerError::NoPendingEncounter);
        };
        if self.phase != GamePhase::Question {
            return Err(AnswerError::NotInQuestion);
        }
        if option >= OPTION_COUNT {
            return Err(AnswerError::InvalidOption(option));
        }

        let result = if encounter.question.is_correct(option) {
            AnswerResult::Correct
        } else {
            AnswerResult::Wrong
        };
        if let Some(encounter) = self.pending.take() {
            self.resolve_encounter(encounter, result);
        }
        Ok(result)
    }

    // --- Test hooks ---

    /// Spawn an enemy with stats for the current wave (for testing).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        archetype: EnemyArchetype,
        position: Position,
        assigned: DefenderId,
    ) -> u32 {
        use cid_threat_ai::profiles::{get_profile, scale_stat};
        use cid_threat_ai::wave::WaveEnemy;

        let wave = self.waves.wave_number.max(1);
        let profile = get_profile(archetype);
        let enemy = WaveEnemy {
            archetype,
            health: scale_stat(profile.health, wave).floor(),
            speed: profile.speed,
            base_damage: profile.damage,
            damage: balanced_damage(profile.damage, wave),
            score_value: profile.score_value,
            spawn: position,
            assigned_defender: assigned,
        };
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        world_setup::spawn_enemy(&mut self.world, id, wave, &enemy);
        id
    }

    /// Spawn a tower without paying for it (for testing).
    #[cfg(test)]
    pub fn spawn_test_tower(&mut self, kind: TowerKind, position: Position) -> u32 {
        let id = self.next_tower_id;
        self.next_tower_id += 1;
        world_setup::spawn_tower(&mut self.world, id, kind, position);
        id
    }

    /// Jump to a wave number, raising defender max health as a wave start would.
    #[cfg(test)]
    pub fn set_wave_number(&mut self, wave_number: u32) {
        self.waves.wave_number = wave_number;
        for d in self.defenders.values_mut() {
            d.raise_max_health(wave_number);
        }
    }

    #[cfg(test)]
    pub fn set_score(&mut self, score: i64) {
        self.score.score = score;
    }

    #[cfg(test)]
    pub fn defender_mut(&mut self, id: DefenderId) -> Option<&mut Defender> {
        self.defenders.get_mut(&id)
    }

    #[cfg(test)]
    pub fn pending_encounter(&self) -> Option<&Encounter> {
        self.pending.as_ref()
    }

    #[cfg(test)]
    pub fn clear_enemies(&mut self) {
        let enemies: Vec<hecs::Entity> = self
            .world
            .query::<&Enemy>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in enemies {
            let _ = self.world.despawn(entity);
        }
    }

    // --- Internals ---

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SkipIntro => {
                if self.phase == GamePhase::Intro {
                    self.phase = GamePhase::Menu;
                }
            }
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::Menu {
                    self.start_session();
                }
            }
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::ReturnToMenu => {
                if matches!(
                    self.phase,
                    GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory
                ) {
                    self.clear_session();
                    self.phase = GamePhase::Menu;
                }
            }
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::SelectTowerType { kind } => self.select_tower_type(kind),
            PlayerCommand::PlaceTower { x, y } => {
                self.attempt_place_tower(x, y);
            }
            PlayerCommand::UpgradeTower { tower_id } => {
                if let Err(err) = self.upgrade_tower(tower_id) {
                    debug!(%err, tower = tower_id, "upgrade refused");
                    self.messages
                        .push(MessageLevel::Error, MessageAnchor::Top, err.to_string());
                }
            }
            PlayerCommand::SellTower { tower_id } => {
                if let Err(err) = self.sell_tower(tower_id) {
                    debug!(%err, tower = tower_id, "sell refused");
                }
            }
            PlayerCommand::SubmitAnswer { option } => {
                if let Err(err) = self.submit_answer(option) {
                    warn!(%err, option, "answer rejected");
                }
            }
        }
    }

    fn start_session(&mut self) {
        self.clear_session();
        self.phase = GamePhase::Playing;
        info!(seed = self.config.seed, max_waves = self.config.max_waves, "session started");
        self.messages.push(
            MessageLevel::Info,
            MessageAnchor::Top,
            "Defend Confidentiality, Integrity and Availability!",
        );
    }

    fn clear_session(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.defenders = world_setup::setup_defenders(1);
        self.pending = None;
        self.score = ScoreState::new(self.config.starting_score);
        self.waves = WaveClock::new(
            self.config.max_waves,
            self.config.wave_interval_secs,
            self.config.first_wave_delay_secs,
        );
        self.selected_tower = None;
        self.next_enemy_id = 0;
        self.next_tower_id = 0;
        self.messages.clear();
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        // 1. Wave timer
        if let Some(wave) = self.waves.advance(dt) {
            self.start_wave(wave);
        }
        // 2. Enemies (stops at the first contact)
        if let Some(contact) = systems::enemy_ai::run(&mut self.world, &self.defenders, dt) {
            self.begin_encounter(contact);
            if self.phase == GamePhase::Question {
                return;
            }
        }
        // 3. Towers
        systems::tower_fire::run(&mut self.world, &mut self.rng, dt);
        // 4. Projectiles
        let kills =
            systems::projectiles::run(&mut self.world, &mut self.rng, &mut self.despawn_buffer, dt);
        for kill in kills {
            self.award_kill(kill);
        }
        // 5. Particles and messages
        systems::effects::run(&mut self.world, &mut self.despawn_buffer, dt);
        self.messages.tick(dt);
        // 6. Win/loss
        self.check_end_conditions();
    }

    fn start_wave(&mut self, wave: u32) {
        for d in self.defenders.values_mut() {
            d.raise_max_health(wave);
        }
        let count = systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            wave,
            &self.defenders,
            &mut self.next_enemy_id,
        );
        info!(wave, enemies = count, "wave started");
        self.events.push(GameEvent::WaveStarted {
            wave_number: wave,
            enemy_count: count,
        });
        self.messages.push(
            MessageLevel::Warning,
            MessageAnchor::Top,
            format!("Wave {wave}: {count} threats incoming"),
        );
    }

    fn begin_encounter(&mut self, contact: Contact) {
        if let Some(pending) = &self.pending {
            error!(
                pending = pending.enemy_id,
                enemy = contact.enemy_id,
                "contact raised while an encounter is pending, ignoring"
            );
            return;
        }

        let damage = if contact.blocked {
            0
        } else {
            balanced_damage(contact.base_damage, self.waves.wave_number)
        };
        let question = match self
            .questions
            .question_for_defender(contact.defender, &mut self.rng)
        {
            Ok(question) => question,
            Err(err) => {
                error!(%err, enemy = contact.enemy_id, "no question available, dropping encounter");
                let _ = self.world.despawn(contact.entity);
                return;
            }
        };

        info!(
            enemy = contact.enemy_id,
            archetype = ?contact.archetype,
            defender = ?contact.defender,
            damage,
            "enemy reached defender"
        );
        self.events.push(GameEvent::EnemyContact {
            enemy_id: contact.enemy_id,
            defender: contact.defender,
            damage,
        });
        let limit = self.config.question_time_limit_secs;
        self.pending = Some(Encounter {
            enemy: contact.entity,
            enemy_id: contact.enemy_id,
            defender: contact.defender,
            damage,
            question,
            time_remaining_secs: limit,
            time_limit_secs: limit,
        });
        self.phase = GamePhase::Question;
    }

    fn run_question_timer(&mut self, dt: f64) {
        let expired = match self.pending.as_mut() {
            Some(encounter) => {
                encounter.time_remaining_secs -= dt;
                encounter.time_remaining_secs <= 0.0
            }
            None => {
                error!("question phase without a pending encounter, resuming play");
                self.phase = GamePhase::Playing;
                return;
            }
        };
        if expired {
            if let Some(encounter) = self.pending.take() {
                self.resolve_encounter(encounter, AnswerResult::TimedOut);
            }
        }
    }

    /// Apply an answer's outcome, remove the encountering enemy and resume play.
    fn resolve_encounter(&mut self, encounter: Encounter, result: AnswerResult) {
        let wave = self.waves.wave_number;
        let defender = encounter.defender;
        let name = defender.display_name();
        let defender_pos = cid_core::defender::defender_position(defender);

        match result {
            AnswerResult::Correct => {
                let heal = HEAL_BASE
                    .saturating_add(HEAL_PER_WAVE.saturating_mul(wave.min(i32::MAX as u32) as i32));
                let healed = self
                    .defenders
                    .get_mut(&defender)
                    .map_or(0, |d| d.heal(heal));
                self.score.score += CORRECT_ANSWER_BONUS;

                let counter = encounter.damage as f64 * COUNTER_DAMAGE_FACTOR;
                let kill = self
                    .world
                    .query_one_mut::<(&mut Health, &EnemyProfile, &Position)>(encounter.enemy)
                    .ok()
                    .and_then(|(health, profile, pos)| {
                        health.take_damage(counter).then(|| Kill {
                            entity: encounter.enemy,
                            enemy_id: profile.id,
                            archetype: profile.archetype,
                            score_value: profile.score_value,
                            position: *pos,
                        })
                    });
                if let Some(kill) = kill {
                    world_setup::spawn_particle_burst(
                        &mut self.world,
                        &mut self.rng,
                        ParticleKind::Celebration,
                        kill.position,
                    );
                    self.award_kill(kill);
                }

                self.events.push(GameEvent::AnswerCorrect { defender, healed });
                self.messages.push(
                    MessageLevel::Success,
                    MessageAnchor::Center,
                    format!("Correct! +{CORRECT_ANSWER_BONUS} points, {name} healed {healed}"),
                );
                world_setup::spawn_particle_burst(&mut self.world, &mut self.rng, ParticleKind::Heal, defender_pos);
            }
            AnswerResult::Wrong | AnswerResult::TimedOut => {
                let compromised = self
                    .defenders
                    .get_mut(&defender)
                    .map_or(false, |d| d.damage(encounter.damage));

                let (event, text) = if result == AnswerResult::TimedOut {
                    (
                        GameEvent::QuestionTimedOut {
                            defender,
                            damage: encounter.damage,
                        },
                        format!("Time's up! {name} takes {} damage", encounter.damage),
                    )
                } else {
                    (
                        GameEvent::AnswerWrong {
                            defender,
                            damage: encounter.damage,
                        },
                        format!("Wrong answer! {name} takes {} damage", encounter.damage),
                    )
                };
                self.events.push(event);
                self.messages
                    .push(MessageLevel::Error, MessageAnchor::Center, text);
                world_setup::spawn_particle_burst(&mut self.world, &mut self.rng, ParticleKind::Damage, defender_pos);

                if compromised {
                    warn!(defender = ?defender, "defender compromised");
                    self.events.push(GameEvent::DefenderCompromised { defender });
                    self.messages.push(
                        MessageLevel::Warning,
                        MessageAnchor::Center,
                        format!("{name} has been compromised!"),
                    );
                }
            }
        }

        self.score.stats.record(result);
        self.messages.push(
            MessageLevel::Info,
            MessageAnchor::Bottom,
            encounter.question.explanation.clone(),
        );
        let _ = self.world.despawn(encounter.enemy);
        self.phase = GamePhase::Playing;
        info!(
            enemy = encounter.enemy_id,
            defender = ?defender,
            ?result,
            score = self.score.score,
            "encounter resolved"
        );

        // A compromise must end the run before another contact can be raised.
        self.check_end_conditions();
    }

    fn award_kill(&mut self, kill: Kill) {
        let _ = self.world.despawn(kill.entity);
        self.score.score += kill.score_value;
        self.score.enemies_destroyed += 1;
        debug!(enemy = kill.enemy_id, archetype = ?kill.archetype, "enemy destroyed");
        self.events.push(GameEvent::EnemyDestroyed {
            enemy_id: kill.enemy_id,
            archetype: kill.archetype,
            score_awarded: kill.score_value,
        });
    }

    /// Evaluated after every playing tick and every resolved encounter.
    /// Both outcomes are terminal, so each fires once.
    fn check_end_conditions(&mut self) {
        let compromised = self
            .defenders
            .values()
            .filter(|d| d.is_compromised())
            .count();
        let lost = match self.config.game_over_policy {
            GameOverPolicy::AnyDefenderCompromised => compromised > 0,
            GameOverPolicy::AllDefendersCompromised => {
                !self.defenders.is_empty() && compromised == self.defenders.len()
            }
        };

        if lost {
            self.phase = GamePhase::GameOver;
            info!(wave = self.waves.wave_number, score = self.score.score, "game over");
            self.events.push(GameEvent::GameOver {
                wave_number: self.waves.wave_number,
                score: self.score.score,
            });
            self.messages.push(
                MessageLevel::Error,
                MessageAnchor::Center,
                "Security breach! Game over",
            );
            return;
        }

        if self.waves.all_spawned() && self.enemy_count() == 0 {
            self.phase = GamePhase::Victory;
            info!(score = self.score.score, "victory");
            self.events.push(GameEvent::Victory {
                score: self.score.score,
            });
            self.messages.push(
                MessageLevel::Success,
                MessageAnchor::Center,
                "All waves repelled! Victory",
            );
            world_setup::spawn_particle_burst(
                &mut self.world,
                &mut self.rng,
                ParticleKind::Celebration,
                Position::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            );
        }
    }

    fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            SessionRefs {
                time: &self.time,
                phase: self.phase,
                wave_number: self.waves.wave_number,
                max_waves: self.waves.max_waves,
                next_wave_in_secs: self.waves.next_wave_in(),
                selected_tower: self.selected_tower,
                defenders: &self.defenders,
                encounter: self.pending.as_ref(),
                score: &self.score,
                messages: &self.messages,
            },
            events,
        )
    }
}
