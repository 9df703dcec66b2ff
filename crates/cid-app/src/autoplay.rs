//! Auto-player: a simple policy that plays a session from snapshots alone.
//!
//! It walks through the menus, answers questions with a configurable
//! accuracy, and spends score on towers at fixed build sites.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cid_core::commands::PlayerCommand;
use cid_core::enums::{GamePhase, TowerKind};
use cid_core::question::OPTION_COUNT;
use cid_core::state::GameStateSnapshot;
use cid_core::types::Position;
use cid_sim::world_setup::tower_template;

/// Build sites between the three pillars, clear of the restricted zones
/// and spaced apart from each other.
const BUILD_SITES: [(f64, f64); 10] = [
    (400.0, 60.0),
    (300.0, 150.0),
    (500.0, 150.0),
    (340.0, 260.0),
    (460.0, 260.0),
    (400.0, 350.0),
    (160.0, 350.0),
    (250.0, 440.0),
    (640.0, 350.0),
    (550.0, 440.0),
];

/// Order in which tower types are bought.
const BUILD_ORDER: [TowerKind; 4] = [
    TowerKind::Firewall,
    TowerKind::Encryption,
    TowerKind::Antivirus,
    TowerKind::Ids,
];

pub struct AutoPlayer {
    accuracy: f64,
    rng: ChaCha8Rng,
    /// Enemy whose question was already answered.
    answered: Option<u32>,
    next_site: usize,
    next_kind: usize,
}

impl AutoPlayer {
    /// `accuracy` is the chance of picking the correct option, clamped to `0..=1`.
    pub fn new(accuracy: f64, seed: u64) -> Self {
        let accuracy = if accuracy.is_finite() {
            accuracy.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            accuracy,
            rng: ChaCha8Rng::seed_from_u64(seed),
            answered: None,
            next_site: 0,
            next_kind: 0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Commands to send in response to the latest snapshot.
    pub fn decide(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        match snapshot.phase {
            GamePhase::Intro => vec![PlayerCommand::SkipIntro],
            GamePhase::Menu => vec![PlayerCommand::StartGame],
            GamePhase::Question => self.answer(snapshot).into_iter().collect(),
            GamePhase::Playing => {
                self.answered = None;
                self.spend(snapshot)
            }
            GamePhase::Paused => vec![PlayerCommand::Resume],
            GamePhase::GameOver | GamePhase::Victory => Vec::new(),
        }
    }

    fn answer(&mut self, snapshot: &GameStateSnapshot) -> Option<PlayerCommand> {
        let encounter = snapshot.encounter.as_ref()?;
        if self.answered == Some(encounter.enemy_id) {
            return None;
        }
        self.answered = Some(encounter.enemy_id);

        let correct = encounter.question.correct_index;
        let option = if self.rng.gen_bool(self.accuracy) {
            correct
        } else {
            (correct + self.rng.gen_range(1..OPTION_COUNT)) % OPTION_COUNT
        };
        Some(PlayerCommand::SubmitAnswer { option })
    }

    fn spend(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if self.next_site < BUILD_SITES.len() {
            let kind = BUILD_ORDER[self.next_kind % BUILD_ORDER.len()];
            if snapshot.score < tower_template(kind).cost {
                return Vec::new();
            }
            let (x, y) = BUILD_SITES[self.next_site];
            self.next_site += 1;
            self.next_kind += 1;
            return vec![
                PlayerCommand::SelectTowerType { kind },
                PlayerCommand::PlaceTower { x, y },
            ];
        }

        // Every site is used: upgrade the weakest affordable tower.
        snapshot
            .towers
            .iter()
            .filter_map(|t| t.upgrade_cost.map(|cost| (t, cost)))
            .filter(|(_, cost)| *cost <= snapshot.score)
            .min_by_key(|(t, _)| (t.level, t.id))
            .map(|(t, _)| vec![PlayerCommand::UpgradeTower { tower_id: t.id }])
            .unwrap_or_default()
    }
}

/// Position of a build site, for callers that want to preview them.
pub fn build_sites() -> impl Iterator<Item = Position> {
    BUILD_SITES.iter().map(|&(x, y)| Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_core::constants::{DEFENDER_EXCLUSION_RADIUS, MIN_TOWER_SPACING};
    use cid_core::defender::defender_position;
    use cid_core::enums::DefenderId;
    use cid_core::question::{Difficulty, Question, QuestionCategory};
    use cid_core::state::EncounterView;

    fn question_snapshot(enemy_id: u32) -> GameStateSnapshot {
        GameStateSnapshot {
            phase: GamePhase::Question,
            encounter: Some(EncounterView {
                enemy_id,
                defender: DefenderId::Integrity,
                damage: 25,
                question: Question {
                    id: 7,
                    text: "What does a hash verify?".into(),
                    options: [
                        "Integrity".into(),
                        "Availability".into(),
                        "Speed".into(),
                        "Location".into(),
                    ],
                    correct_index: 0,
                    explanation: "A hash changes when the data changes.".into(),
                    category: QuestionCategory::Integrity,
                    difficulty: Difficulty::Easy,
                },
                time_remaining_secs: 10.0,
                time_limit_secs: 15.0,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn build_sites_are_legal() {
        let sites: Vec<Position> = build_sites().collect();
        for (i, a) in sites.iter().enumerate() {
            for id in DefenderId::ALL {
                assert!(a.distance_to(&defender_position(id)) >= DEFENDER_EXCLUSION_RADIUS);
            }
            for b in &sites[i + 1..] {
                assert!(a.distance_to(b) >= MIN_TOWER_SPACING);
            }
        }
    }

    #[test]
    fn perfect_player_always_answers_correctly() {
        let mut bot = AutoPlayer::new(1.0, 3);
        for enemy in 0..50 {
            let commands = bot.decide(&question_snapshot(enemy));
            assert_eq!(commands, vec![PlayerCommand::SubmitAnswer { option: 0 }]);
        }
    }

    #[test]
    fn hopeless_player_never_answers_correctly() {
        let mut bot = AutoPlayer::new(0.0, 3);
        for enemy in 0..50 {
            match bot.decide(&question_snapshot(enemy)).as_slice() {
                [PlayerCommand::SubmitAnswer { option }] => {
                    assert_ne!(*option, 0);
                    assert!(*option < OPTION_COUNT);
                }
                other => panic!("unexpected commands {other:?}"),
            }
        }
    }

    #[test]
    fn answers_each_encounter_once() {
        let mut bot = AutoPlayer::new(1.0, 3);
        assert_eq!(bot.decide(&question_snapshot(4)).len(), 1);
        assert!(bot.decide(&question_snapshot(4)).is_empty());
    }

    #[test]
    fn buys_towers_when_affordable() {
        let mut bot = AutoPlayer::new(1.0, 3);
        let mut snapshot = GameStateSnapshot {
            phase: GamePhase::Playing,
            score: 50,
            ..Default::default()
        };
        assert!(bot.decide(&snapshot).is_empty());

        snapshot.score = 200;
        assert_eq!(
            bot.decide(&snapshot),
            vec![
                PlayerCommand::SelectTowerType {
                    kind: TowerKind::Firewall
                },
                PlayerCommand::PlaceTower { x: 400.0, y: 60.0 },
            ]
        );
    }

    #[test]
    fn accuracy_is_clamped() {
        assert_eq!(AutoPlayer::new(2.0, 0).accuracy(), 1.0);
        assert_eq!(AutoPlayer::new(f64::NAN, 0).accuracy(), 0.0);
    }
}
