#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use cid_core::constants::*;
    use cid_core::defender::defender_position;
    use cid_core::enums::{DefenderId, EnemyArchetype, EnemyState};
    use cid_core::types::Position;

    use crate::fsm::{evaluate, EnemyContext};
    use crate::profiles::{balanced_damage, spawn_weight};
    use crate::random::weighted_choice;
    use crate::targeting::{select_target, DefenderTarget};
    use crate::wave::{enemy_count, generate_wave, spawn_point};

    fn targets(alive: [bool; 3]) -> Vec<DefenderTarget> {
        DefenderId::ALL
            .iter()
            .zip(alive)
            .map(|(&id, alive)| DefenderTarget {
                id,
                position: defender_position(id),
                alive,
            })
            .collect()
    }

    // ---- Weighted choice ----

    #[test]
    fn test_weighted_choice_converges() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let items = [0usize, 1, 2, 3, 4];
        let weights = [4, 3, 3, 2, 1];
        let draws = 10_000;
        let mut counts = [0u32; 5];
        for _ in 0..draws {
            let pick = weighted_choice(&items, &weights, &mut rng).unwrap();
            counts[*pick] += 1;
        }
        let total: u32 = weights.iter().sum();
        for i in 0..5 {
            let expected = weights[i] as f64 / total as f64;
            let observed = counts[i] as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.05,
                "item {i}: observed {observed:.3}, expected {expected:.3}"
            );
        }
    }

    // ---- Profiles ----

    #[test]
    fn test_spawn_weight_bonuses() {
        assert_eq!(spawn_weight(EnemyArchetype::Ransomware, 3), 1);
        assert_eq!(spawn_weight(EnemyArchetype::Ransomware, 4), 2);
        assert_eq!(spawn_weight(EnemyArchetype::Ransomware, 7), 3);
        assert_eq!(spawn_weight(EnemyArchetype::Phishing, 3), 2);
        assert_eq!(spawn_weight(EnemyArchetype::Phishing, 7), 3);
        assert_eq!(spawn_weight(EnemyArchetype::Virus, 10), 4);
    }

    #[test]
    fn test_balanced_damage() {
        assert_eq!(balanced_damage(20, 1), 20);
        assert_eq!(balanced_damage(35, 5), 51);
        assert_eq!(balanced_damage(25, 2), 28);
    }

    // ---- Wave generator ----

    #[test]
    fn test_wave_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for wave in 1..=12 {
            let roster = generate_wave(wave, &DefenderId::ALL, &mut rng);
            assert_eq!(roster.len(), wave.min(3) as usize * 3, "wave {wave}");
            assert_eq!(roster.len(), enemy_count(wave, 3));
        }
    }

    #[test]
    fn test_wave_distribution_balanced() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for wave in 1..=10 {
            for n in 1..=3 {
                let defenders = &DefenderId::ALL[..n];
                for _ in 0..50 {
                    let roster = generate_wave(wave, defenders, &mut rng);
                    let mut per: HashMap<DefenderId, usize> =
                        defenders.iter().map(|&d| (d, 0)).collect();
                    for e in &roster {
                        *per.get_mut(&e.assigned_defender).unwrap() += 1;
                    }
                    let max = per.values().max().copied().unwrap();
                    let min = per.values().min().copied().unwrap();
                    assert!(max - min <= 1, "wave {wave}, {n} defenders: {per:?}");
                }
            }
        }
    }

    #[test]
    fn test_wave_stats_scale_except_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let early = generate_wave(1, &DefenderId::ALL, &mut rng);
        let late = generate_wave(5, &DefenderId::ALL, &mut rng);
        for e in early.iter().chain(late.iter()) {
            let profile = crate::profiles::get_profile(e.archetype);
            assert_eq!(e.speed, profile.speed);
            assert_eq!(e.base_damage, profile.damage);
        }
        for e in &late {
            let profile = crate::profiles::get_profile(e.archetype);
            assert!(e.health > profile.health);
            assert_eq!(e.damage, balanced_damage(profile.damage, 5));
        }
    }

    #[test]
    fn test_no_defenders_no_wave() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(generate_wave(3, &[], &mut rng).is_empty());
    }

    #[test]
    fn test_spawn_points_outside_field() {
        for wave in [1, 4] {
            for i in 0..24 {
                let p = spawn_point(i, wave);
                let inside = p.x >= 0.0 && p.x <= FIELD_WIDTH && p.y >= 0.0 && p.y <= FIELD_HEIGHT;
                assert!(!inside, "spawn {i} at wave {wave} is inside the field");
            }
        }
    }

    // ---- Targeting ----

    #[test]
    fn test_assigned_target_preferred() {
        let pick = select_target(
            EnemyArchetype::DDoS,
            DefenderId::Integrity,
            &Position::new(0.0, 0.0),
            &targets([true, true, true]),
        );
        assert_eq!(pick, Some(DefenderId::Integrity));
    }

    #[test]
    fn test_affinity_fallback() {
        let pick = select_target(
            EnemyArchetype::DDoS,
            DefenderId::Integrity,
            &Position::new(0.0, 0.0),
            &targets([true, false, true]),
        );
        assert_eq!(pick, Some(DefenderId::Availability));
    }

    #[test]
    fn test_nearest_fallback() {
        // Virus has no affinity; Integrity is down, Availability is closest.
        let pick = select_target(
            EnemyArchetype::Virus,
            DefenderId::Integrity,
            &Position::new(800.0, 400.0),
            &targets([true, false, true]),
        );
        assert_eq!(pick, Some(DefenderId::Availability));
    }

    #[test]
    fn test_no_live_target() {
        let pick = select_target(
            EnemyArchetype::Ransomware,
            DefenderId::Integrity,
            &Position::new(0.0, 0.0),
            &targets([false, false, false]),
        );
        assert_eq!(pick, None);
    }

    // ---- FSM ----

    #[test]
    fn test_enemy_moves_toward_target() {
        let update = evaluate(&EnemyContext {
            state: EnemyState::Seeking,
            position: Position::new(0.0, 150.0),
            target: Some(Position::new(400.0, 150.0)),
            speed: 40.0,
            dt: 0.5,
        });
        assert_eq!(update.new_state, EnemyState::Seeking);
        assert!(!update.contact);
        assert!((update.new_position.x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_contact_raised_inside_radius() {
        let target = Position::new(400.0, 150.0);
        let update = evaluate(&EnemyContext {
            state: EnemyState::Seeking,
            position: Position::new(400.0 - CONTACT_RADIUS - 1.0, 150.0),
            target: Some(target),
            speed: 40.0,
            dt: 0.1,
        });
        assert!(update.contact);
        assert_eq!(update.new_state, EnemyState::Attacking);

        let again = evaluate(&EnemyContext {
            state: update.new_state,
            position: update.new_position,
            target: Some(target),
            speed: 40.0,
            dt: 0.1,
        });
        assert!(!again.contact, "contact is raised once");
        assert_eq!(again.new_position, update.new_position);
    }

    #[test]
    fn test_idle_without_target() {
        let update = evaluate(&EnemyContext {
            state: EnemyState::Seeking,
            position: Position::new(10.0, 10.0),
            target: None,
            speed: 40.0,
            dt: 1.0,
        });
        assert_eq!(update.new_position, Position::new(10.0, 10.0));
        assert!(!update.contact);
    }
}
