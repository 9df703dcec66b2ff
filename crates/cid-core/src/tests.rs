#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::commands::PlayerCommand;
    use crate::components::{EnemyStats, Health};
    use crate::defender::{max_health_for_wave, Defender};
    use crate::enums::*;
    use crate::events::ScreenMessage;
    use crate::question::QuestionCategory;
    use crate::state::{AnswerStats, GameStateSnapshot};
    use crate::types::{Position, SimTime};

    // ---- Defender ----

    #[test]
    fn test_max_health_growth() {
        assert_eq!(max_health_for_wave(1), 100);
        assert_eq!(max_health_for_wave(2), 115);
        assert_eq!(max_health_for_wave(5), 160);
        assert_eq!(max_health_for_wave(6), 175);
        assert_eq!(max_health_for_wave(50), 175, "bonus is capped");
        assert_eq!(max_health_for_wave(0), 100);
    }

    #[test]
    fn test_defender_heal_capped() {
        let mut d = Defender::new(DefenderId::Confidentiality, 1);
        assert_eq!(d.heal(25), 0);
        assert_eq!(d.health(), 100);

        d.damage(40);
        assert_eq!(d.heal(25), 25);
        assert_eq!(d.heal(25), 15);
        assert_eq!(d.health(), 100);
    }

    #[test]
    fn test_defender_damage_floors_at_zero() {
        let mut d = Defender::new(DefenderId::Integrity, 1);
        assert!(!d.damage(60));
        assert!(d.damage(60), "second hit compromises");
        assert_eq!(d.health(), 0);
        assert!(d.is_compromised());
        assert!(!d.damage(10), "already compromised");
        assert_eq!(d.heal(50), 0, "compromised defenders stay down");
    }

    #[test]
    fn test_defender_raise_max_does_not_heal() {
        let mut d = Defender::new(DefenderId::Availability, 1);
        d.damage(30);
        d.raise_max_health(3);
        assert_eq!(d.max_health(), 130);
        assert_eq!(d.health(), 70);
        d.raise_max_health(1);
        assert_eq!(d.max_health(), 130, "max never lowers");
    }

    #[test]
    fn test_defender_health_bounds_random_sequences() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let mut d = Defender::new(DefenderId::Confidentiality, rng.gen_range(1..10));
            for _ in 0..100 {
                match rng.gen_range(0..4) {
                    0 => {
                        d.heal(rng.gen_range(-50..200));
                    }
                    1 => {
                        d.damage(rng.gen_range(-50..200));
                    }
                    2 => {
                        d.heal(i32::MAX);
                    }
                    _ => {
                        d.damage(i32::MAX);
                    }
                }
                assert!(d.health() >= 0);
                assert!(d.health() <= d.max_health());
            }
        }
    }

    // ---- Enemy components ----

    #[test]
    fn test_health_take_damage_clamps() {
        let mut h = Health::new(40.0);
        assert!(!h.take_damage(15.0));
        assert!(!h.take_damage(-10.0), "negative damage ignored");
        assert_eq!(h.current, 25.0);
        assert!(h.take_damage(100.0));
        assert_eq!(h.current, 0.0);
        assert!(!h.take_damage(5.0), "only the killing hit reports death");
    }

    #[test]
    fn test_repeated_slow_restores_exact_speed() {
        let mut stats = EnemyStats::new(40.0, 20, 20);
        stats.slow(0.5, 3.0);
        assert_eq!(stats.speed, 20.0);
        stats.tick_effects(1.0);
        stats.slow(0.5, 3.0);
        assert_eq!(stats.speed, 20.0, "refresh, not half of half");
        stats.slow(0.5, 3.0);
        assert_eq!(stats.speed, 20.0);

        stats.tick_effects(2.9);
        assert!(stats.is_slowed(), "timer was refreshed");
        stats.tick_effects(0.2);
        assert!(!stats.is_slowed());
        assert_eq!(stats.speed, 40.0);
    }

    #[test]
    fn test_block_restores_exact_damage() {
        let mut stats = EnemyStats::new(25.0, 35, 51);
        stats.block_attacks(2.0);
        stats.block_attacks(2.0);
        assert_eq!(stats.damage, 0);
        assert!(stats.is_blocked());
        stats.tick_effects(1.5);
        stats.block_attacks(2.0);
        stats.tick_effects(1.5);
        assert!(stats.is_blocked());
        stats.tick_effects(0.6);
        assert!(!stats.is_blocked());
        assert_eq!(stats.damage, 51);
    }

    // ---- Geometry ----

    #[test]
    fn test_step_toward_zero_distance() {
        let p = Position::new(100.0, 100.0);
        let (moved, arrived) = p.step_toward(&p, 5.0);
        assert!(arrived);
        assert_eq!(moved, p);
        assert!(!moved.x.is_nan());
    }

    #[test]
    fn test_step_toward_partial() {
        let p = Position::new(0.0, 0.0);
        let (moved, arrived) = p.step_toward(&Position::new(30.0, 40.0), 10.0);
        assert!(!arrived);
        assert!((moved.x - 6.0).abs() < 1e-9);
        assert!((moved.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        t.advance(0.5);
        t.advance(0.25);
        assert_eq!(t.tick, 2);
        assert!((t.elapsed_secs - 0.75).abs() < 1e-12);
    }

    // ---- Misc ----

    #[test]
    fn test_answer_stats_accuracy() {
        let mut stats = AnswerStats::default();
        assert_eq!(stats.accuracy_percent(), 100);
        stats.record(AnswerResult::Correct);
        stats.record(AnswerResult::Wrong);
        stats.record(AnswerResult::TimedOut);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.accuracy_percent(), 33);
    }

    #[test]
    fn test_message_alpha_fades() {
        let mut msg = ScreenMessage {
            id: 1,
            level: MessageLevel::Info,
            anchor: MessageAnchor::Top,
            text: "Wave 1".into(),
            age_secs: 0.0,
            duration_secs: 3.0,
            offset: 0.0,
        };
        assert_eq!(msg.alpha(), 1.0);
        msg.age_secs = 1.5;
        assert!((msg.alpha() - 0.5).abs() < 1e-12);
        msg.age_secs = 3.0;
        assert!(msg.is_expired());
        assert_eq!(msg.alpha(), 0.0);
    }

    #[test]
    fn test_category_from_defender() {
        for id in DefenderId::ALL {
            let category = QuestionCategory::from(id);
            assert_ne!(category, QuestionCategory::General);
        }
    }

    // ---- Serialized contracts ----

    #[test]
    fn test_player_command_serde() {
        let cmd = PlayerCommand::PlaceTower { x: 120.0, y: 80.0 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"PlaceTower\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);

        let back: PlayerCommand =
            serde_json::from_str(r#"{"type":"SelectTowerType","kind":"Ids"}"#).unwrap();
        assert_eq!(
            back,
            PlayerCommand::SelectTowerType {
                kind: TowerKind::Ids
            }
        );
    }

    #[test]
    fn test_snapshot_serde() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Intro);
        assert!(back.encounter.is_none());
    }
}
