//! Identifier generation for users and accounts.
//!
//! User ids are 10 upper-case alphanumeric characters drawn from 128 random
//! bits. Account ids are 16 decimal digits built from two random 8-digit
//! numbers. Neither format carries meaning; callers treat them as opaque.

use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::Uuid;

pub const USER_ID_LEN: usize = 10;
pub const ACCOUNT_ID_LEN: usize = 16;

const ACCOUNT_ID_PART_MIN: u32 = 10_000_000;
const ACCOUNT_ID_PART_MAX: u32 = 99_999_999;

pub trait IdGenerator: Send + Sync {
    fn new_user_id(&self) -> String;
    fn new_account_id(&self) -> String;
}

/// Encodes 128 random bits as base64, keeps only the alphanumeric characters,
/// and upper-cases the first ten.
fn user_id_from_bytes(bytes: &[u8; 16]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(USER_ID_LEN)
        .collect::<String>()
        .to_ascii_uppercase()
}

fn account_id_from_rng<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = rng.gen_range(ACCOUNT_ID_PART_MIN..=ACCOUNT_ID_PART_MAX);
    let second = rng.gen_range(ACCOUNT_ID_PART_MIN..=ACCOUNT_ID_PART_MAX);
    format!("{first}{second}")
}

/// Draws user ids from UUID v4 bytes (OS entropy) and account ids from the
/// thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn new_user_id(&self) -> String {
        // 16 random bytes encode to 22 base64 chars before padding, of
        // which at most a handful are '+' or '/'.
        let mut id = user_id_from_bytes(Uuid::new_v4().as_bytes());
        while id.len() < USER_ID_LEN {
            id = user_id_from_bytes(Uuid::new_v4().as_bytes());
        }
        id
    }

    fn new_account_id(&self) -> String {
        account_id_from_rng(&mut rand::thread_rng())
    }
}

/// Deterministic generator for tests and reproducible runs.
#[derive(Debug)]
pub struct SeededIdGenerator {
    rng: Mutex<StdRng>,
}

impl SeededIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl IdGenerator for SeededIdGenerator {
    fn new_user_id(&self) -> String {
        self.with_rng(|rng| loop {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            let id = user_id_from_bytes(&bytes);
            if id.len() == USER_ID_LEN {
                break id;
            }
        })
    }

    fn new_account_id(&self) -> String {
        self.with_rng(|rng| account_id_from_rng(rng))
    }
}
