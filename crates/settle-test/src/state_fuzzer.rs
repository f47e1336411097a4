//! State Fuzzer - Randomized checking of reconciliation invariants
//!
//! Each round builds a random current/desired pair and checks:
//! - One create per key missing from current
//! - One delete per key missing from desired
//! - One update per differing key, none for equal keys
//! - Deletes come after creates and updates
//! - One reconcile pass converges and the next pass is empty

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use settle_core::{ActionKind, Blob, StateView};
use settle_state::{diff, reconcile, Plan};

use crate::MemoryState;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of random state pairs
    pub rounds: usize,
    /// Size of the key universe each state draws from
    pub key_space: usize,
    /// Probability a key is present in a given state
    pub presence_prob: f64,
    /// Probability a key present in both states differs
    pub change_prob: f64,
    /// Maximum blob payload length
    pub max_value_len: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            rounds: 200,
            key_space: 32,
            presence_prob: 0.6,
            change_prob: 0.3,
            max_value_len: 64,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            rounds: 20,
            key_space: 8,
            presence_prob: 0.5,
            change_prob: 0.3,
            max_value_len: 16,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            rounds: 2000,
            key_space: 256,
            presence_prob: 0.7,
            change_prob: 0.5,
            max_value_len: 1024,
            seed: 42,
        }
    }
}

/// Broken invariant found by the fuzzer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A key received the wrong action, or more than one
    WrongAction {
        round: usize,
        key: String,
        expected: Option<ActionKind>,
        actual: Vec<ActionKind>,
    },
    /// A create or update was planned after a delete
    DeleteBeforeUpsert { round: usize },
    /// Current did not equal desired after one pass
    NotConverged { round: usize },
    /// The pass after a successful reconcile still planned actions
    NotIdempotent { round: usize, actions: usize },
    /// A store mutation failed
    ApplyFailed { round: usize, error: String },
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct FuzzResult {
    pub rounds: usize,
    pub actions: usize,
    pub violations: Vec<Violation>,
}

impl FuzzResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Seeded reconciliation fuzzer over `Blob` values
pub struct StateFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
}

impl StateFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        StateFuzzer { config, rng }
    }

    fn random_blob(&mut self) -> Blob {
        let len = self.rng.gen_range(0..=self.config.max_value_len);
        let bytes: Vec<u8> = (0..len).map(|_| self.rng.gen()).collect();
        Blob::new(bytes)
    }

    /// Generate a random current/desired pair
    pub fn generate_pair(&mut self) -> (MemoryState<Blob>, MemoryState<Blob>) {
        let mut current = MemoryState::new();
        let mut desired = MemoryState::new();

        for i in 0..self.config.key_space {
            let key = format!("key-{:04}", i);
            let in_current = self.rng.gen_bool(self.config.presence_prob);
            let in_desired = self.rng.gen_bool(self.config.presence_prob);

            let value = self.random_blob();
            if in_current {
                current.insert(key.clone(), value.clone());
            }
            if in_desired {
                let value = if in_current && self.rng.gen_bool(self.config.change_prob) {
                    self.random_blob()
                } else {
                    value
                };
                desired.insert(key, value);
            }
        }

        (current, desired)
    }

    /// Run every round
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::default();

        for round in 0..self.config.rounds {
            let (mut current, desired) = self.generate_pair();
            let plan = diff(&current, &desired);

            result.actions += plan.len();
            check_plan(round, &current, &desired, &plan, &mut result.violations);

            if let Err(e) = reconcile(&mut current, &desired, false) {
                result.violations.push(Violation::ApplyFailed {
                    round,
                    error: e.to_string(),
                });
                continue;
            }

            if current != desired {
                result.violations.push(Violation::NotConverged { round });
            }

            let again = diff(&current, &desired);
            if !again.is_converged() {
                result.violations.push(Violation::NotIdempotent {
                    round,
                    actions: again.len(),
                });
            }

            result.rounds += 1;
        }

        result
    }
}

/// Check a plan against the per-key and ordering invariants
pub fn check_plan<V: PartialEq>(
    round: usize,
    current: &MemoryState<V>,
    desired: &MemoryState<V>,
    plan: &Plan<V>,
    violations: &mut Vec<Violation>,
) {
    let mut by_key: HashMap<&str, Vec<ActionKind>> = HashMap::new();
    for action in plan {
        by_key.entry(action.key.as_str()).or_default().push(action.kind);
    }

    let mut keys = current.keys();
    keys.extend(desired.keys());
    keys.sort();
    keys.dedup();

    for key in keys {
        let expected = match (current.get(&key), desired.get(&key)) {
            (None, Some(_)) => Some(ActionKind::Create),
            (Some(_), None) => Some(ActionKind::Delete),
            (Some(c), Some(d)) if c != d => Some(ActionKind::Update),
            _ => None,
        };
        let actual = by_key.remove(key.as_str()).unwrap_or_default();
        let ok = match expected {
            Some(kind) => actual == [kind],
            None => actual.is_empty(),
        };
        if !ok {
            violations.push(Violation::WrongAction {
                round,
                key,
                expected,
                actual,
            });
        }
    }

    let mut seen_delete = false;
    for action in plan {
        if action.kind.is_delete() {
            seen_delete = true;
        } else if seen_delete {
            violations.push(Violation::DeleteBeforeUpsert { round });
            break;
        }
    }
}

/// Property-based test helpers
pub mod properties {
    use settle_core::{Action, ActionKind};

    /// Property: every create and update precedes every delete
    pub fn deletes_last<V>(actions: &[Action<V>]) -> bool {
        match actions.iter().position(|a| a.kind.is_delete()) {
            Some(first) => actions[first..].iter().all(|a| a.kind.is_delete()),
            None => true,
        }
    }

    /// Property: no key appears twice
    pub fn keys_unique<V>(actions: &[Action<V>]) -> bool {
        let mut keys: Vec<&str> = actions.iter().map(|a| a.key.as_str()).collect();
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        keys.len() == before
    }

    /// Property: updates always say why
    pub fn updates_have_reasons<V>(actions: &[Action<V>]) -> bool {
        actions
            .iter()
            .filter(|a| a.kind == ActionKind::Update)
            .all(|a| !a.reason.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use settle_core::Action;

    #[test]
    fn test_fuzzer_light() {
        let mut fuzzer = StateFuzzer::new(FuzzerConfig::light());
        let result = fuzzer.run();

        assert!(result.is_valid(), "violations: {:?}", result.violations);
        assert_eq!(result.rounds, 20);
    }

    #[test]
    fn test_fuzzer_default() {
        let mut fuzzer = StateFuzzer::new(FuzzerConfig::default());
        let result = fuzzer.run();

        assert!(result.is_valid(), "violations: {:?}", result.violations);
        assert!(result.actions > 0);
    }

    #[test]
    fn test_same_seed_same_pair() {
        let a = StateFuzzer::new(FuzzerConfig::light()).generate_pair();
        let b = StateFuzzer::new(FuzzerConfig::light()).generate_pair();

        assert_eq!(a, b);
    }

    #[test]
    fn test_check_plan_flags_wrong_action() {
        let current = MemoryState::from_pairs([("a", 1)]);
        let desired = MemoryState::from_pairs([("a", 2)]);
        let wrong = diff(&MemoryState::<i32>::new(), &desired);
        let mut violations = Vec::new();

        check_plan(0, &current, &desired, &wrong, &mut violations);

        assert_eq!(
            violations,
            vec![Violation::WrongAction {
                round: 0,
                key: "a".into(),
                expected: Some(ActionKind::Update),
                actual: vec![ActionKind::Create],
            }]
        );
    }

    #[test]
    fn test_properties() {
        let good = vec![
            Action::create("a", 1),
            Action::update("b", 2, "structural mismatch"),
            Action::delete("c"),
        ];
        let bad = vec![
            Action::delete("c"),
            Action::create("a", 1),
            Action::create("a", 1),
        ];

        assert!(properties::deletes_last(&good));
        assert!(properties::keys_unique(&good));
        assert!(properties::updates_have_reasons(&good));
        assert!(!properties::deletes_last(&bad));
        assert!(!properties::keys_unique(&bad));
    }

    proptest! {
        #[test]
        fn prop_any_seed_runs_clean(seed in any::<u64>()) {
            let config = FuzzerConfig { seed, rounds: 5, ..FuzzerConfig::light() };
            let result = StateFuzzer::new(config).run();

            prop_assert!(result.is_valid(), "violations: {:?}", result.violations);
            prop_assert_eq!(result.rounds, 5);
        }

        #[test]
        fn prop_diff_passes_check_plan(seed in any::<u64>()) {
            let config = FuzzerConfig { seed, ..FuzzerConfig::light() };
            let (current, desired) = StateFuzzer::new(config).generate_pair();
            let plan = diff(&current, &desired);
            let mut violations = Vec::new();

            check_plan(0, &current, &desired, &plan, &mut violations);

            prop_assert!(violations.is_empty(), "violations: {:?}", violations);
            prop_assert!(properties::deletes_last(plan.actions()));
            prop_assert!(properties::keys_unique(plan.actions()));
            prop_assert!(properties::updates_have_reasons(plan.actions()));
        }

        #[test]
        fn prop_check_plan_flags_reversed_plan(seed in any::<u64>()) {
            let config = FuzzerConfig { seed, presence_prob: 0.5, ..FuzzerConfig::light() };
            let (current, desired) = StateFuzzer::new(config).generate_pair();
            let plan = diff(&current, &desired);
            let summary = plan.summary();
            prop_assume!(summary.deletes > 0 && summary.creates + summary.updates > 0);

            let mut reversed = plan.into_actions();
            reversed.reverse();
            prop_assert!(!properties::deletes_last(&reversed));
        }
    }
}
