//! Scripted responses for mock status clients

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ApiError, ApiResult};

/// Replays a list of responses, repeating the last one forever
pub(crate) struct Script<T> {
    steps: Mutex<VecDeque<ApiResult<T>>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    pub(crate) fn new(steps: Vec<ApiResult<T>>) -> Self {
        assert!(!steps.is_empty(), "a script needs at least one step");
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn always(step: ApiResult<T>) -> Self {
        Self::new(vec![step])
    }

    pub(crate) fn next(&self) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().unwrap()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: format!("status {status}"),
    }
}
