//! Determinism testing utilities.
//!
//! Provides a harness for verifying that world generation and the enemy
//! simulation produce identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Every host regenerates the archipelago from a shared seed instead of
//! downloading it, so generation must be bit-exact. Sources of divergence
//! include:
//!
//! - **Floating-point trigonometry**: `sin`/`cos` differ between libm builds.
//!   Generation uses [`drift_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Enemies and players live in `BTreeMap`s keyed by id.
//!
//! - **System randomness**: All "random" behavior uses [`SeededRng`].
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual stages (layout, rasterization, bridges)
//! 2. **Property tests**: Random configurations still generate reproducibly
//! 3. **Parallel tests**: N generations on N threads all match
//!
//! [`SeededRng`]: drift_core::rng::SeededRng

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use drift_core::error::Result;
use drift_core::islands::WorldConfig;
use drift_core::map_generation::generate_world;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps each run took.
    pub ticks: u64,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, ticks: u64) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_deterministic,
            hashes,
            ticks,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Run is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stateful process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of independent runs
/// * `ticks` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute a state hash
///
/// # Example
///
/// ```
/// use drift_test_utils::determinism::verify_determinism;
/// use drift_test_utils::fixtures::EnemyScenario;
///
/// let result = verify_determinism(
///     3,
///     20,
///     || EnemyScenario::open_field(99, 3),
///     EnemyScenario::step,
///     EnemyScenario::state_hash,
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for _ in 0..ticks {
            step(&mut state);
        }
        hashes.push(hash(&state));
    }

    DeterminismResult::from_hashes(hashes, ticks)
}

/// Generate the same world `runs` times and compare state hashes.
pub fn verify_world_determinism(config: &WorldConfig, runs: usize) -> Result<DeterminismResult> {
    let hashes = (0..runs)
        .map(|_| generate_world(config).map(|world| world.state_hash()))
        .collect::<Result<Vec<_>>>()?;
    Ok(DeterminismResult::from_hashes(hashes, 0))
}

/// Generate the same world twice and compare the canonical byte encodings.
pub fn verify_world_bytes(config: &WorldConfig) -> Result<bool> {
    let first = generate_world(config)?.to_bytes()?;
    let second = generate_world(config)?.to_bytes()?;
    Ok(first == second)
}

/// Generate the same world on `threads` scoped threads and collect hashes.
///
/// Catches divergence that only shows up under different thread scheduling
/// or memory layout.
///
/// # Panics
///
/// Panics if a generator thread panics.
pub fn run_parallel_generations(config: &WorldConfig, threads: usize) -> Result<DeterminismResult> {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| generate_world(config).map(|world| world.state_hash())))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("generator thread panicked"))
            .collect::<Result<Vec<_>>>()
    })?;

    tracing::debug!(threads, seed = config.seed, "Parallel generation finished");
    Ok(DeterminismResult::from_hashes(hashes, 0))
}

/// Step two copies of a process side by side, finding the first divergence.
///
/// # Returns
///
/// `None` if the copies never differ, `Some(tick)` for the first step whose
/// hashes disagree. Tick 0 is the initial state.
pub fn find_first_divergence<S, Setup, Step, HashFn>(
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> Option<u64>
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut a = setup();
    let mut b = setup();

    if hash(&a) != hash(&b) {
        return Some(0);
    }

    for tick in 1..=ticks {
        step(&mut a);
        step(&mut b);
        if hash(&a) != hash(&b) {
            tracing::debug!(tick, "States diverged");
            return Some(tick);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash a sequence of byte buffers as one value.
#[must_use]
pub fn compute_bytes_hash(parts: &[&[u8]]) -> u64 {
    compute_hash(&parts)
}

/// Proptest strategies for determinism and rules testing.
pub mod strategies {
    use drift_core::combat::Weapon;
    use drift_core::islands::WorldConfig;
    use drift_core::players::Direction;
    use proptest::prelude::*;

    /// Any 32-bit seed.
    pub fn arb_seed() -> impl Strategy<Value = u32> {
        any::<u32>()
    }

    /// A valid world configuration small enough to generate quickly.
    ///
    /// Sizes: 60 to 160 tiles, 1 to 16 islands, radii 3 to 12.
    pub fn arb_world_config() -> impl Strategy<Value = WorldConfig> {
        (arb_seed(), 60u32..160, 60u32..160, 1u32..16, 3u32..8, 0u32..5).prop_map(
            |(seed, width, height, count, min, spread)| {
                WorldConfig::default()
                    .with_seed(seed)
                    .with_size(width, height)
                    .with_island_count(count)
                    .with_island_sizes(min, min + spread)
            },
        )
    }

    /// Facing directions.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    /// Health values (1-200).
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..200u32
    }

    /// Damage values (1-50).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        1u32..50u32
    }

    /// A melee weapon with sane reach.
    pub fn arb_weapon() -> impl Strategy<Value = Weapon> {
        (arb_damage(), 4.0f32..40.0, 0.0f32..24.0).prop_map(|(damage, range, sweep)| Weapon {
            damage,
            range,
            sweep,
        })
    }

    /// A pixel position inside a world of `size_px` pixels.
    pub fn arb_position(size_px: f32) -> impl Strategy<Value = (f32, f32)> {
        (0.0f32..size_px, 0.0f32..size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::EnemyScenario;
    use proptest::prelude::*;

    // =========================================================================
    // Harness tests
    // =========================================================================

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_detects_divergence() {
        let result = DeterminismResult::from_hashes(vec![1, 2, 1], 5);
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes(), vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_panics_on_divergence() {
        DeterminismResult::from_hashes(vec![1, 2], 1).assert_deterministic();
    }

    // =========================================================================
    // World generation
    // =========================================================================

    #[test]
    fn test_default_world_is_deterministic() {
        verify_world_determinism(&WorldConfig::default(), 3)
            .unwrap()
            .assert_deterministic();
        assert!(verify_world_bytes(&WorldConfig::default()).unwrap());
    }

    #[test]
    fn test_parallel_generations_match() {
        let config = WorldConfig::default().with_seed(777).with_island_count(16);
        let result = run_parallel_generations(&config, 8).unwrap();
        assert_eq!(result.hashes.len(), 8);
        result.assert_deterministic();
    }

    #[test]
    fn test_invalid_config_propagates() {
        let config = WorldConfig::default().with_island_count(0);
        assert!(verify_world_determinism(&config, 2).is_err());
        assert!(run_parallel_generations(&config, 2).is_err());
    }

    // =========================================================================
    // Enemy simulation
    // =========================================================================

    #[test]
    fn test_enemy_simulation_is_deterministic() {
        verify_determinism(
            3,
            50,
            || EnemyScenario::open_field(4242, 4),
            EnemyScenario::step,
            EnemyScenario::state_hash,
        )
        .assert_deterministic();
    }

    #[test]
    fn test_enemy_simulation_never_diverges() {
        let divergence = find_first_divergence(
            40,
            || EnemyScenario::open_field(11, 3),
            EnemyScenario::step,
            EnemyScenario::state_hash,
        );
        assert_eq!(divergence, None);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = EnemyScenario::open_field(1, 3);
        let mut b = EnemyScenario::open_field(2, 3);
        a.run(10);
        b.run(10);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    // =========================================================================
    // Property-based tests
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_random_configs_generate_identically(config in strategies::arb_world_config()) {
            let a = generate_world(&config).unwrap();
            let b = generate_world(&config).unwrap();
            prop_assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
            prop_assert_eq!(a.state_hash(), b.state_hash());
        }

        #[test]
        fn prop_random_seeds_simulate_identically(seed in strategies::arb_seed()) {
            let mut a = EnemyScenario::open_field(seed, 3);
            let mut b = EnemyScenario::open_field(seed, 3);
            a.run(15);
            b.run(15);
            prop_assert_eq!(a.state_hash(), b.state_hash());
            prop_assert_eq!(a.events, b.events);
        }
    }
}
