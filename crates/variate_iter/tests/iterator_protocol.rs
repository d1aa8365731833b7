//! Integration tests for the beta iterator protocol.
//!
//! Covers:
//! - Argument and option validation with error kinds
//! - Reproducibility against a bare generator
//! - Iteration caps and closing
//! - State capture, replay, sharing and rewinding
//! - External uniform sources

use approx::assert_relative_eq;
use serde_json::json;
use variate_engine::{BetaGenerator, EngineOptions, Seed, StateBuffer};
use variate_iter::{iterator, iterator_from_options, BetaIterator, ErrorKind, IterConfig, Step};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded(seed: u32) -> IterConfig {
    IterConfig::builder().seed(seed).build().unwrap()
}

/// Deterministic stand-in for a caller-owned uniform generator.
fn lcg(seed: u32) -> impl FnMut() -> f64 {
    let mut state = u64::from(seed);
    move || {
        state = (state * 48_271) % 2_147_483_647;
        state as f64 / 2_147_483_647.0
    }
}

// ==========================================================
// Validation
// ==========================================================

#[test]
fn test_invalid_shapes_are_invalid_argument() {
    for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
        assert_eq!(iterator(bad, 2.0, None).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(iterator(2.0, bad, None).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn test_non_object_options_rejected() {
    for value in [json!("abc"), json!(5), json!(null), json!(true), json!([])] {
        let err = iterator_from_options(2.0, 5.0, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn test_out_of_range_seed() {
    let max = u64::from(u32::MAX);
    for seed in [max + 1, max + 2, max + 3] {
        let err = iterator_from_options(2.0, 5.0, &json!({ "seed": seed })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let err = IterConfig::builder().seed(seed).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }
}

#[test]
fn test_wrong_state_length() {
    for len in [0_usize, 10, 100] {
        let words = vec![1_u32; len];
        let err = iterator_from_options(2.0, 5.0, &json!({ "state": words })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }
}

// ==========================================================
// Protocol
// ==========================================================

#[test]
fn test_unseeded_iterator_yields_numbers() {
    init_tracing();
    let mut it = iterator(1.0, 1.0, None).unwrap();
    for _ in 0..100 {
        let step = it.pull();
        assert!(step.value.is_some());
        assert!(!step.done);
    }
}

#[test]
fn test_same_seed_same_sequence() {
    let mut a = iterator(2.0, 4.0, Some(&seeded(20_240_101))).unwrap();
    let mut b = iterator(2.0, 4.0, Some(&seeded(20_240_101))).unwrap();
    for _ in 0..100 {
        assert_eq!(a.pull().value, b.pull().value);
    }
}

#[test]
fn test_matches_bare_generator() {
    let options = EngineOptions {
        seed: Some(Seed::from(12345_u32)),
        ..EngineOptions::default()
    };
    let mut generator = BetaGenerator::new(2.0, 5.0, &options).unwrap();
    let mut it = iterator(2.0, 5.0, Some(&seeded(12345))).unwrap();

    for _ in 0..1000 {
        assert_eq!(it.pull().value, Some(generator.sample()));
    }
}

#[test]
fn test_array_seed_introspection() {
    let config = IterConfig::builder().seed(vec![1234_u32, 5678]).build().unwrap();
    let it = iterator(2.0, 5.0, Some(&config)).unwrap();
    assert_eq!(it.seed(), Some(vec![1234, 5678]));
    assert_eq!(it.seed_length(), Some(2));
}

#[test]
fn test_iteration_limit() {
    let config = IterConfig::builder().iter(10).build().unwrap();
    let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();

    for i in 1..=100 {
        let step = it.pull();
        if i <= 10 {
            assert!(step.value.is_some());
            assert!(!step.done);
        } else {
            assert_eq!(step, Step::finished());
        }
    }
}

#[test]
fn test_close_then_pull() {
    let mut it = iterator(1.0, 1.0, None).unwrap();
    assert!(!it.pull().done);
    assert!(!it.pull().done);

    let step = it.close(Some("finished"));
    assert_eq!(step, Step { value: Some("finished"), done: true });
    assert_eq!(it.pull(), Step::finished());
    assert_eq!(it.close::<()>(None), Step::finished());
}

#[test]
fn test_sample_moments() {
    let config = IterConfig::builder().seed(42_u32).iter(100_000).build().unwrap();
    let values: Vec<f64> = iterator(2.0, 5.0, Some(&config)).unwrap().collect();
    assert_eq!(values.len(), 100_000);

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    assert_relative_eq!(mean, 2.0 / 7.0, epsilon = 0.005);
    assert_relative_eq!(var, 10.0 / (49.0 * 8.0), epsilon = 0.002);
}

// ==========================================================
// Duplication
// ==========================================================

#[test]
fn test_duplicate_replays_run() {
    let mut it1 = iterator(2.0, 5.0, None).unwrap();
    let mut it2 = it1.duplicate().unwrap();
    assert_eq!(it2.seed(), it1.seed());
    assert_eq!(it2.state(), it1.state());

    for _ in 0..100 {
        assert_eq!(it2.pull().value, it1.pull().value);
    }
}

#[test]
fn test_duplicate_keeps_cap() {
    let config = IterConfig::builder().iter(3).build().unwrap();
    let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();
    it.close::<f64>(None);

    let copy = it.duplicate().unwrap();
    assert!(!copy.is_closed());
    assert_eq!(BetaIterator::count(&copy), 0);
    assert_eq!(copy.collect::<Vec<_>>().len(), 3);
}

// ==========================================================
// State
// ==========================================================

#[test]
fn test_resume_from_captured_state() {
    let mut it = iterator(2.0, 5.0, None).unwrap();
    for _ in 0..100 {
        it.pull();
    }
    let state = it.state().unwrap();
    let expected: Vec<f64> = (0..100).filter_map(|_| it.pull().value).collect();

    let config = IterConfig::builder().state(state).build().unwrap();
    let mut replay = iterator(2.0, 5.0, Some(&config)).unwrap();
    for &value in &expected {
        assert_eq!(replay.pull().value, Some(value));
    }
}

#[test]
fn test_shared_state_interleaves() {
    let mut it = iterator(2.0, 5.0, None).unwrap();
    for _ in 0..100 {
        it.pull();
    }
    let state = it.state().unwrap();
    let expected: Vec<f64> = (0..100).filter_map(|_| it.pull().value).collect();

    let shared = StateBuffer::from(state.clone());
    let config = IterConfig::builder().state(shared.clone()).copy(false).build().unwrap();
    let mut it1 = iterator(2.0, 5.0, Some(&config)).unwrap();
    let mut it2 = iterator(2.0, 5.0, Some(&config)).unwrap();

    for pair in expected.chunks(2).take(25) {
        assert_eq!(it1.pull().value, Some(pair[0]));
        assert_eq!(it2.pull().value, Some(pair[1]));
    }

    for _ in 0..100 {
        it2.pull();
    }

    // Rewinding through one iterator rewinds the shared stream.
    it1.set_state(&state).unwrap();
    assert_eq!(shared.to_vec(), state);

    for pair in expected.chunks(2).take(25) {
        assert_eq!(it1.pull().value, Some(pair[0]));
        assert_eq!(it2.pull().value, Some(pair[1]));
    }
}

#[test]
fn test_set_state_rewinds() {
    let mut it = iterator(2.0, 5.0, None).unwrap();
    for _ in 0..100 {
        it.pull();
    }
    let state = it.state().unwrap();
    let expected: Vec<f64> = (0..100).filter_map(|_| it.pull().value).collect();

    it.set_state(&state).unwrap();
    for &value in &expected {
        assert_eq!(it.pull().value, Some(value));
    }
}

#[test]
fn test_set_state_rejects_wrong_length() {
    let mut it = iterator(2.0, 5.0, None).unwrap();
    let err = it.set_state(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn test_caller_write_moves_shared_iterators() {
    let mut reference = iterator(2.0, 5.0, Some(&seeded(404))).unwrap();
    let start = reference.state().unwrap();
    let expected: Vec<f64> = reference.by_ref().take(4).collect();

    let shared = StateBuffer::from(reference.state().unwrap());
    let config = IterConfig::builder().state(shared.clone()).copy(false).build().unwrap();
    let mut it1 = iterator(2.0, 5.0, Some(&config)).unwrap();
    let mut it2 = iterator(2.0, 5.0, Some(&config)).unwrap();
    it1.pull();
    it2.pull();

    // Rewind from the caller's side of the alias.
    shared.set(&start).unwrap();
    assert_eq!(it1.state().unwrap(), start);
    assert_eq!(it2.state().unwrap(), start);

    for pair in expected.chunks(2) {
        assert_eq!(it1.pull().value, Some(pair[0]));
        assert_eq!(it2.pull().value, Some(pair[1]));
    }
}

#[test]
fn test_resumed_iterator_reports_seed() {
    let mut it = iterator(2.0, 5.0, Some(&seeded(12345))).unwrap();
    for _ in 0..10 {
        it.pull();
    }
    let config = IterConfig::builder().state(it.state().unwrap()).build().unwrap();
    let resumed = iterator(2.0, 5.0, Some(&config)).unwrap();

    assert_eq!(resumed.seed(), Some(vec![12345]));
    assert_eq!(resumed.seed_length(), Some(1));
    assert_eq!(resumed.state_length(), it.state_length());
    assert_eq!(resumed.byte_length(), it.byte_length());
}

#[test]
fn test_array_seed_survives_resume() {
    let config = IterConfig::builder().seed(vec![1234_u32, 5678]).build().unwrap();
    let it = iterator(2.0, 5.0, Some(&config)).unwrap();
    let state = it.state().unwrap();
    assert_eq!(it.state_length(), Some(state.len()));
    assert_eq!(it.byte_length(), Some(4 * state.len()));

    let config = IterConfig::builder().state(state).build().unwrap();
    let resumed = iterator(2.0, 5.0, Some(&config)).unwrap();
    assert_eq!(resumed.seed(), Some(vec![1234, 5678]));
}

#[test]
fn test_duplicate_of_shared_iterator_continues_stream() {
    let mut reference = iterator(2.0, 5.0, Some(&seeded(31))).unwrap();
    let shared = StateBuffer::from(reference.state().unwrap());
    let expected: Vec<f64> = reference.by_ref().take(20).collect();

    let config = IterConfig::builder().state(shared.clone()).copy(false).build().unwrap();
    let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();
    for &value in &expected[..5] {
        assert_eq!(it.pull().value, Some(value));
    }

    let mut copy = it.duplicate().unwrap();
    assert!(copy.state_buffer().unwrap().ptr_eq(&shared));
    assert_eq!(BetaIterator::count(&copy), 0);

    // No replay: the duplicate picks up where the shared buffer stands.
    for pair in expected[5..].chunks(2).take(7) {
        assert_eq!(copy.pull().value, Some(pair[0]));
        assert_eq!(it.pull().value, Some(pair[1]));
    }
}

// ==========================================================
// External uniform source
// ==========================================================

#[test]
fn test_external_prng() {
    let config = IterConfig::builder().prng(lcg(7)).seed(12345_u32).build().unwrap();
    let mut it = iterator(2.0, 5.0, Some(&config)).unwrap();

    assert!(it.prng().is_external());
    assert_eq!(it.seed(), None);
    assert_eq!(it.seed_length(), None);
    assert_eq!(it.state(), None);
    assert_eq!(it.state_length(), None);
    assert_eq!(it.byte_length(), None);
    assert_eq!(it.set_state(&[0; 17]).unwrap_err().kind(), ErrorKind::InvalidArgument);

    for _ in 0..100 {
        let x = it.pull().value.unwrap();
        assert!((0.0..=1.0).contains(&x));
    }
}

#[test]
fn test_seeded_external_prngs_agree() {
    let c1 = IterConfig::builder().prng(lcg(2024)).build().unwrap();
    let c2 = IterConfig::builder().prng(lcg(2024)).build().unwrap();
    let mut it1 = iterator(2.0, 5.0, Some(&c1)).unwrap();
    let mut it2 = iterator(2.0, 5.0, Some(&c2)).unwrap();

    for _ in 0..100 {
        assert_eq!(it1.pull().value, it2.pull().value);
    }
}

#[test]
fn test_prng_handle_is_the_supplied_source() {
    let config = IterConfig::builder().prng(lcg(5)).build().unwrap();
    let it = iterator(2.0, 5.0, Some(&config)).unwrap();
    let supplied = variate_engine::Prng::External(config.prng().unwrap().clone());
    assert!(it.prng().ptr_eq(&supplied));
}
