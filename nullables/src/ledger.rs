//! Nullable ledger: scripted contract calls for testing.
//!
//! Every version hash is anchored unless told otherwise. Failures and hangs are
//! queued and consumed one per `submit`, so "fails once then succeeds" is
//! `fail_next(..)` followed by a normal call.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use veracity_ledger::{LedgerCall, LedgerClient, LedgerError};
use veracity_types::{LedgerTxRef, VersionHash};

enum Scripted {
    Fail(LedgerError),
    Hang,
}

#[derive(Default)]
struct Inner {
    script: VecDeque<Scripted>,
    unanchored: HashSet<VersionHash>,
    attempts: Vec<LedgerCall>,
    confirmed: Vec<(LedgerCall, LedgerTxRef)>,
    next_tx: u64,
}

/// A deterministic, in-memory ledger client.
#[derive(Default)]
pub struct NullLedger {
    inner: Mutex<Inner>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `submit` fail with `error`.
    pub fn fail_next(&self, error: LedgerError) {
        self.inner
            .lock()
            .unwrap()
            .script
            .push_back(Scripted::Fail(error));
    }

    /// Make the next `submit` reject with a generic contract error.
    pub fn reject_next(&self, reason: &str) {
        self.fail_next(LedgerError::Rejected {
            method: "scripted".into(),
            reason: reason.into(),
        });
    }

    /// Make the next `submit` never return.
    pub fn hang_next(&self) {
        self.inner.lock().unwrap().script.push_back(Scripted::Hang);
    }

    /// Treat `version_hash` as unknown to the ledger.
    pub fn unanchor(&self, version_hash: &VersionHash) {
        self.inner
            .lock()
            .unwrap()
            .unanchored
            .insert(version_hash.clone());
    }

    /// Every call submitted, including failed and hung ones.
    pub fn attempts(&self) -> Vec<LedgerCall> {
        self.inner.lock().unwrap().attempts.clone()
    }

    /// Calls that produced a ledger effect, with their tx references.
    pub fn confirmed(&self) -> Vec<(LedgerCall, LedgerTxRef)> {
        self.inner.lock().unwrap().confirmed.clone()
    }

    pub fn confirmed_methods(&self) -> Vec<&'static str> {
        self.inner
            .lock()
            .unwrap()
            .confirmed
            .iter()
            .map(|(call, _)| call.method())
            .collect()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn submit(&self, call: &LedgerCall) -> Result<LedgerTxRef, LedgerError> {
        let step = {
            let mut inner = self.inner.lock().unwrap();
            inner.attempts.push(call.clone());
            match inner.script.pop_front() {
                Some(step) => step,
                None => {
                    inner.next_tx += 1;
                    let tx = LedgerTxRef::new(format!("tx-{}", inner.next_tx));
                    inner.confirmed.push((call.clone(), tx.clone()));
                    return Ok(tx);
                }
            }
        };
        match step {
            Scripted::Fail(err) => Err(err),
            Scripted::Hang => std::future::pending().await,
        }
    }

    async fn hash_exists(&self, version_hash: &VersionHash) -> Result<bool, LedgerError> {
        Ok(!self.inner.lock().unwrap().unanchored.contains(version_hash))
    }
}
