use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info};
use thiserror::Error;

use super::difficulty::{MAX_DIFFICULTY, satisfies};
use super::digest::sha256_hex;

/// How often (in attempts) the miner reports progress by default.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Deadline and cancellation are polled every this many attempts.
const BUDGET_CHECK_INTERVAL: u64 = 1_024;

/// Something the miner can hash for a given nonce.
pub trait Candidate {
    /// Append the exact bytes to hash for `nonce` to `out`.
    fn write_content(&self, nonce: u64, out: &mut Vec<u8>);
}

/// A literal prefix followed by the nonce in ASCII decimal.
impl Candidate for str {
    fn write_content(&self, nonce: u64, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
        out.extend_from_slice(nonce.to_string().as_bytes());
    }
}

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningResult {
    pub elapsed: Duration,
    pub hash: String,
    pub nonce: u64,
    pub attempts: u64,
    /// The bytes whose digest is `hash`.
    pub content: Vec<u8>,
}

impl MiningResult {
    pub fn content_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("difficulty {difficulty} exceeds the {max} hex digits of a digest")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },
    #[error("no matching nonce within {attempts} attempts")]
    Exhausted { attempts: u64 },
    #[error("deadline of {deadline:?} exceeded after {attempts} attempts")]
    DeadlineExceeded { deadline: Duration, attempts: u64 },
    #[error("search cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

/// Linear nonce search from 0 upward. Each call owns its own counter and
/// content buffer, so one `Miner` can serve independent searches.
#[derive(Debug, Clone)]
pub struct Miner {
    difficulty: u32,
    progress_interval: u64,
    max_attempts: Option<u64>,
    deadline: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Miner {
    /// Unbounded miner for the given difficulty (leading hex zeros).
    /// Difficulties above `MAX_DIFFICULTY` are rejected by `search`.
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_attempts: None,
            deadline: None,
            cancel: None,
        }
    }

    /// Report progress every `interval` attempts; 0 silences it.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop the search once `flag` is set by another thread.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Find the smallest nonce whose content digest satisfies the difficulty.
    pub fn search<C: Candidate + ?Sized>(&self, candidate: &C) -> Result<MiningResult, MiningError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(MiningError::DifficultyOutOfRange {
                difficulty: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        debug!(
            "mining started: looking for {} leading zeros",
            self.difficulty
        );

        let start = Instant::now();
        let limit = self.max_attempts.unwrap_or(u64::MAX);
        let mut content = Vec::new();
        let mut nonce: u64 = 0;

        loop {
            // `nonce` equals the number of attempts made so far.
            if nonce >= limit {
                return Err(MiningError::Exhausted { attempts: nonce });
            }
            if nonce % BUDGET_CHECK_INTERVAL == 0 {
                self.check_budget(start, nonce)?;
            }

            content.clear();
            candidate.write_content(nonce, &mut content);
            let hash = sha256_hex(&content);

            if satisfies(&hash, self.difficulty) {
                let elapsed = start.elapsed();
                info!(
                    "solution found: nonce={} hash={} elapsed={:?}",
                    nonce, hash, elapsed
                );
                return Ok(MiningResult {
                    elapsed,
                    hash,
                    nonce,
                    attempts: nonce + 1,
                    content,
                });
            }

            nonce += 1;
            if self.progress_interval > 0 && nonce % self.progress_interval == 0 {
                debug!("tried {} nonces; last hash {}", nonce, hash);
            }
        }
    }

    fn check_budget(&self, start: Instant, attempts: u64) -> Result<(), MiningError> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(MiningError::Cancelled { attempts });
            }
        }
        if let Some(deadline) = self.deadline {
            if start.elapsed() >= deadline {
                return Err(MiningError::DeadlineExceeded { deadline, attempts });
            }
        }
        Ok(())
    }
}

/// Solve the prefix puzzle: `prefix ∥ nonce` hashed until `difficulty` is met.
///
/// Unbounded; fails only for a difficulty above `MAX_DIFFICULTY` or if the
/// whole `u64` nonce space is exhausted.
pub fn mine(prefix: &str, difficulty: u32) -> Result<MiningResult, MiningError> {
    Miner::new(difficulty).search(prefix)
}
