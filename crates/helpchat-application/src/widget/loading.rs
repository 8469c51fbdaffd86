use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Raises the shared loading flag for its lifetime.
///
/// The flag is lowered on drop, so every exit path of a request clears it.
pub(crate) struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    pub(crate) fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag: flag.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_follows_guard_scope() {
        let flag = Arc::new(AtomicBool::new(false));
        {
            let _guard = LoadingGuard::engage(&flag);
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
