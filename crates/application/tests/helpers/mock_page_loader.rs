#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_watchlist_application::pagination::PageLoader;
use ferrous_watchlist_domain::DomainError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// ============================================================================
// Mock PageLoader over an in-memory sequence 0..total
// ============================================================================

#[derive(Clone)]
pub struct MockPageLoader {
    total: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<(usize, usize)>>>,
    gates: Arc<Mutex<VecDeque<Option<oneshot::Receiver<()>>>>>,
    fail_with: Arc<Mutex<Option<DomainError>>>,
    resets: Arc<AtomicUsize>,
}

impl MockPageLoader {
    pub fn new(total: usize) -> Self {
        Self {
            total: Arc::new(Mutex::new(total)),
            requests: Arc::new(Mutex::new(Vec::new())),
            gates: Arc::new(Mutex::new(VecDeque::new())),
            fail_with: Arc::new(Mutex::new(None)),
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_total(&self, total: usize) {
        *self.total.lock().unwrap() = total;
    }

    pub fn set_failure(&self, error: Option<DomainError>) {
        *self.fail_with.lock().unwrap() = error;
    }

    pub fn hold_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(Some(rx));
        tx
    }

    pub fn pass_next_call(&self) {
        self.gates.lock().unwrap().push_back(None);
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageLoader for MockPageLoader {
    type Item = usize;

    async fn load_page(&self, offset: usize, limit: usize) -> Result<Vec<usize>, DomainError> {
        self.requests.lock().unwrap().push((offset, limit));

        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }

        let total = *self.total.lock().unwrap();
        Ok((offset..total).take(limit).collect())
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}
