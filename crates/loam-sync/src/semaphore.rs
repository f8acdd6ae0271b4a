//! A counting semaphore over a mutex and condvar.
//!
//! The thread pool parks workers on one of these: each queued job
//! releases a permit, each worker wake-up consumes one. Releases can be
//! batched, which is how "signal at most as many workers as there are
//! jobs" is expressed at the call site.

use parking_lot::{Condvar, Mutex};

/// A counting semaphore.
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Semaphore starting with `permits` available.
    #[must_use]
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available and takes it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Takes a permit only if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Makes `count` permits available, waking up to that many waiters.
    pub fn release(&self, count: usize) {
        if count == 0 {
            return;
        }
        let mut permits = self.permits.lock();
        *permits += count;
        drop(permits);
        if count == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }

    /// Permits currently available.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        *self.permits.lock()
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("permits", &self.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn permits_count_down_and_up() {
        let sem = Semaphore::new(2);
        assert!(sem.try_acquire());
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
        sem.release(1);
        assert!(sem.try_acquire());
    }

    #[test]
    fn acquire_blocks_until_released() {
        let sem = Arc::new(Semaphore::new(0));
        let woke = Arc::new(AtomicUsize::new(0));

        let waiter = {
            let sem = Arc::clone(&sem);
            let woke = Arc::clone(&woke);
            thread::spawn(move || {
                sem.acquire();
                woke.fetch_add(1, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert_eq!(woke.load(Ordering::SeqCst), 0);
        sem.release(1);
        waiter.join().unwrap();
        assert_eq!(woke.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn batched_release_wakes_multiple_waiters() {
        let sem = Arc::new(Semaphore::new(0));
        let woke = Arc::new(AtomicUsize::new(0));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let sem = Arc::clone(&sem);
                let woke = Arc::clone(&woke);
                thread::spawn(move || {
                    sem.acquire();
                    woke.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        sem.release(3);
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(woke.load(Ordering::SeqCst), 3);
        assert_eq!(sem.available_permits(), 0);
    }
}
