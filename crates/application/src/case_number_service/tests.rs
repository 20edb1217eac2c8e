use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hsg_core::{AppError, AppResult};
use hsg_domain::CaseNumber;

use super::{
    CASE_NUMBER_MAX_ATTEMPTS, CaseNumberLookup, CaseNumberService, RandomSource, encode_base36,
    sequence_in_range,
};
use crate::ManualClock;

fn start() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_792_310_400_000)
        .single()
        .unwrap_or_default()
}

/// Replays a fixed list of words, repeating the last one forever.
struct ReplayRandom {
    words: Vec<u32>,
    position: AtomicUsize,
}

impl ReplayRandom {
    fn new(words: &[u32]) -> Self {
        Self {
            words: words.to_vec(),
            position: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for ReplayRandom {
    fn next_u32(&self) -> AppResult<u32> {
        let index = self.position.fetch_add(1, Ordering::SeqCst);
        self.words
            .get(index)
            .or_else(|| self.words.last())
            .copied()
            .ok_or_else(|| AppError::Internal("no random words scripted".to_owned()))
    }
}

enum LookupMode {
    Taken(HashSet<String>),
    AlwaysTaken,
    Failing,
    Slow,
}

struct FakeLookup {
    mode: LookupMode,
    calls: AtomicUsize,
}

impl FakeLookup {
    fn new(mode: LookupMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaseNumberLookup for FakeLookup {
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            LookupMode::Taken(taken) => Ok(taken.contains(case_number.as_str())),
            LookupMode::AlwaysTaken => Ok(true),
            LookupMode::Failing => Err(AppError::Internal("database unavailable".to_owned())),
            LookupMode::Slow => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(false)
            }
        }
    }
}

/// Lookup that remembers every number the test has accepted as issued.
#[derive(Default)]
struct IssuedLookup {
    issued: Mutex<HashSet<String>>,
}

impl IssuedLookup {
    fn record(&self, case_number: &CaseNumber) {
        if let Ok(mut issued) = self.issued.lock() {
            issued.insert(case_number.as_str().to_owned());
        }
    }
}

#[async_trait]
impl CaseNumberLookup for IssuedLookup {
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool> {
        self.issued
            .lock()
            .map(|issued| issued.contains(case_number.as_str()))
            .map_err(|error| AppError::Internal(format!("failed to lock issued set: {error}")))
    }
}

fn service(lookup: Arc<dyn CaseNumberLookup>, random: &[u32]) -> CaseNumberService {
    CaseNumberService::new(
        lookup,
        Arc::new(ReplayRandom::new(random)),
        Arc::new(ManualClock::new(start())),
    )
}

#[tokio::test]
async fn free_candidate_is_returned_on_first_attempt() {
    let lookup = Arc::new(FakeLookup::new(LookupMode::Taken(HashSet::new())));
    let case_number = service(lookup.clone(), &[3821]).generate().await;

    assert_eq!(
        case_number.as_ref().map(CaseNumber::as_str).ok(),
        Some("HSG-2026-4821")
    );
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn taken_candidates_are_retried() {
    let taken = ["HSG-2026-1000", "HSG-2026-1001"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    let lookup = Arc::new(FakeLookup::new(LookupMode::Taken(taken)));

    let case_number = service(lookup.clone(), &[0, 1, 2]).generate().await;

    assert_eq!(
        case_number.as_ref().map(CaseNumber::as_str).ok(),
        Some("HSG-2026-1002")
    );
    assert_eq!(lookup.calls(), 3);
}

#[tokio::test]
async fn exhausted_attempts_fall_back_to_base36_timestamp() {
    let lookup = Arc::new(FakeLookup::new(LookupMode::AlwaysTaken));
    let case_number = service(lookup.clone(), &[42]).generate().await;

    let case_number = case_number.unwrap_or_else(|error| panic!("{error}"));
    assert_eq!(case_number.as_str(), "HSG-2026-MVDJC3K0");
    assert_eq!(case_number.sequence(), None);
    assert_eq!(
        case_number.suffix(),
        encode_base36(1_792_310_400_000).to_uppercase()
    );
    assert_eq!(lookup.calls(), CASE_NUMBER_MAX_ATTEMPTS);
}

#[tokio::test]
async fn lookup_failure_aborts_generation() {
    let lookup = Arc::new(FakeLookup::new(LookupMode::Failing));
    let result = service(lookup.clone(), &[7]).generate().await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_times_out_as_an_error() {
    let lookup = Arc::new(FakeLookup::new(LookupMode::Slow));
    let result = service(lookup, &[7])
        .with_lookup_timeout(Duration::from_millis(250))
        .generate()
        .await;

    assert!(matches!(result, Err(AppError::Internal(message)) if message.contains("timed out")));
}

#[tokio::test]
async fn issued_numbers_are_never_repeated() {
    let lookup = Arc::new(IssuedLookup::default());
    // Every draw yields the same sequence, so later calls must fall back, and
    // the clock never moves, so fallbacks share a millisecond.
    let service = service(lookup.clone(), &[500]);

    let mut seen = HashSet::new();
    for _ in 0..4 {
        let case_number = service
            .generate()
            .await
            .unwrap_or_else(|error| panic!("{error}"));
        lookup.record(&case_number);
        assert!(seen.insert(case_number.as_str().to_owned()));
    }

    assert!(seen.contains("HSG-2026-1500"));
    assert!(seen.contains("HSG-2026-MVDJC3K0"));
    assert!(seen.contains("HSG-2026-MVDJC3K1"));
}

#[test]
fn sequence_in_range_rejects_biased_words() {
    // Words at or above the last full multiple of the span are redrawn.
    let random = ReplayRandom::new(&[u32::MAX, 8_999]);
    let value = sequence_in_range(&random, 1000, 9999);
    assert_eq!(value.ok(), Some(9999));
}

#[test]
fn sequence_in_range_stays_inside_bounds() {
    for word in [0, 1, 8_999, 9_000, 123_456_789, 4_294_961_999] {
        let random = ReplayRandom::new(&[word]);
        let value = sequence_in_range(&random, 1000, 9999).unwrap_or_default();
        assert!((1000..=9999).contains(&value), "{word} mapped to {value}");
    }
}

#[test]
fn base36_matches_known_values() {
    assert_eq!(encode_base36(0), "0");
    assert_eq!(encode_base36(35), "z");
    assert_eq!(encode_base36(36), "10");
    assert_eq!(encode_base36(1_792_310_400_000), "mvdjc3k0");
}
