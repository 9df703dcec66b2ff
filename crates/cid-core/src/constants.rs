//! Simulation constants and tuning parameters.

/// Nominal host frame rate (Hz). The engine accepts any delta time.
pub const TICK_RATE: u32 = 60;

/// Seconds per frame at the nominal rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Play field ---

/// Visible field width in field units.
pub const FIELD_WIDTH: f64 = 800.0;

/// Visible field height in field units.
pub const FIELD_HEIGHT: f64 = 500.0;

/// Distance outside the visible field at which enemies spawn.
pub const SPAWN_MARGIN: f64 = 30.0;

/// Wave number from which the extra spawn points are used.
pub const EXTRA_SPAWN_POINTS_WAVE: u32 = 4;

// --- Defenders ---

/// Defender positions (triangle layout): Confidentiality, Integrity, Availability.
pub const CONFIDENTIALITY_POSITION: (f64, f64) = (400.0, 150.0);
pub const INTEGRITY_POSITION: (f64, f64) = (250.0, 350.0);
pub const AVAILABILITY_POSITION: (f64, f64) = (550.0, 350.0);

/// Defender max health at wave 1.
pub const DEFENDER_BASE_HEALTH: i32 = 100;

/// Max-health bonus gained per wave after the first.
pub const DEFENDER_HEALTH_PER_WAVE: i32 = 15;

/// Cap on the cumulative max-health bonus.
pub const DEFENDER_HEALTH_BONUS_CAP: i32 = 75;

// --- Enemies ---

/// Enemies per defender grows with the wave number up to this cap.
pub const MAX_ENEMIES_PER_DEFENDER: u32 = 3;

/// Distance to a defender at which an enemy makes contact.
pub const CONTACT_RADIUS: f64 = 40.0;

/// Per-wave multiplier step for enemy health and damage.
pub const WAVE_STAT_SCALE: f64 = 0.12;

/// Waves after which Phishing and Ransomware gain +1 spawn weight.
pub const HIGH_THREAT_WAVE: u32 = 3;

/// Waves after which Ransomware gains a further +1 spawn weight.
pub const RANSOMWARE_SURGE_WAVE: u32 = 6;

// --- Encounters ---

/// Seconds the player has to answer a question.
pub const QUESTION_TIME_LIMIT_SECS: f64 = 15.0;

/// Flat heal on a correct answer.
pub const HEAL_BASE: i32 = 25;

/// Additional heal per wave on a correct answer.
pub const HEAL_PER_WAVE: i32 = 2;

/// Flat score bonus for every correct answer.
pub const CORRECT_ANSWER_BONUS: i64 = 50;

/// A correct answer hits the enemy for this multiple of the encounter damage.
pub const COUNTER_DAMAGE_FACTOR: f64 = 2.0;

// --- Towers ---

/// Minimum distance between two towers.
pub const MIN_TOWER_SPACING: f64 = 60.0;

/// Towers may not be built within this radius of a defender.
pub const DEFENDER_EXCLUSION_RADIUS: f64 = 50.0;

/// Highest tower level.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Cost of the first upgrade.
pub const BASE_UPGRADE_COST: i64 = 50;

/// Upgrade cost multiplier per level.
pub const UPGRADE_COST_FACTOR: i64 = 2;

/// Damage multiplier per upgrade.
pub const UPGRADE_DAMAGE_FACTOR: f64 = 1.4;

/// Range multiplier per upgrade.
pub const UPGRADE_RANGE_FACTOR: f64 = 1.15;

/// Fire-rate multiplier per upgrade.
pub const UPGRADE_FIRE_RATE_FACTOR: f64 = 1.25;

/// Fraction of the invested score returned when selling a tower.
pub const SELL_REFUND_FRACTION: f64 = 0.5;

// --- Projectiles and effects ---

/// Projectile travel speed (units/s).
pub const PROJECTILE_SPEED: f64 = 200.0;

/// Radius used both for Splash targeting and Splash damage.
pub const CLUSTER_RADIUS: f64 = 50.0;

/// Splash damage dealt to enemies around the primary target.
pub const SPLASH_DAMAGE_FACTOR: f64 = 0.6;

/// Slow effect speed factor.
pub const SLOW_FACTOR: f64 = 0.5;

/// Slow effect duration (seconds).
pub const SLOW_DURATION_SECS: f64 = 3.0;

/// Block effect duration (seconds).
pub const BLOCK_DURATION_SECS: f64 = 2.0;

// --- Presentation ---

/// Lifetime of a screen message (seconds).
pub const MESSAGE_DURATION_SECS: f64 = 3.0;

/// Vertical spacing between stacked messages sharing an anchor.
pub const MESSAGE_STACK_OFFSET: f64 = 30.0;

/// Hard cap on live particles.
pub const MAX_PARTICLES: usize = 512;
