//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{EntropyError, Generator, Uuid};
use inner::GlobalGenInner;

/// Holds the outcome of the one-time seeding. A failure stays in the cell so that it is reported
/// again, never retried.
type GlobalGenCell = sync::OnceLock<Result<sync::Mutex<GlobalGenInner>, EntropyError>>;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
///
/// # Panics
///
/// Panics if the global generator could not be seeded or the lock is poisoned.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: GlobalGenCell = sync::OnceLock::new();
    lock_or_seed(&G, Generator::from_os_entropy)
}

/// Returns the lock handle of the generator in `cell`, running `seed` if the cell is empty.
///
/// `seed` runs at most once per cell, whether it succeeds or fails.
fn lock_or_seed<F>(cell: &GlobalGenCell, seed: F) -> sync::MutexGuard<'_, GlobalGenInner>
where
    F: FnOnce() -> Result<Generator, EntropyError>,
{
    let seeded = cell.get_or_init(|| {
        seed()
            .map(|generator| sync::Mutex::new(GlobalGenInner::new(generator)))
            .map_err(|err| {
                tracing::error!(error = %err, "could not seed global generator");
                err
            })
    });
    match seeded {
        Ok(g) => g.lock().expect("uuid4ctr: could not lock global generator"),
        Err(err) => panic!("uuid4ctr: could not initialize global generator: {}", err),
    }
}

/// Seeds the process-wide global generator unless it is already seeded.
///
/// Calling this function is optional, as [`uuid4()`] seeds the generator on first use. It lets
/// an application pay the one-time seeding cost, and surface an unusable entropy source, at a
/// point of its choosing. Subsequent calls neither rekey the generator nor reset its counter.
///
/// # Panics
///
/// Panics if the operating system's random source or the system clock cannot be read. Seeding is
/// not retried: once it has failed, every later call panics without touching the entropy source.
pub fn ensure_initialized() {
    lock_global_gen().get_mut();
}

/// Generates a UUIDv4 object.
///
/// This function employs a global generator that encrypts a process-wide counter, guaranteeing
/// that no two calls in the same process return the same UUID. On Unix, this function reseeds the
/// generator when the process ID changes (i.e., upon process forks) so that parent and child
/// processes do not share a key and counter.
///
/// # Panics
///
/// Panics on first use if the operating system's random source or the system clock cannot be
/// read, and on every later call after such a failure. Identifiers are never produced from a
/// generator that failed to seed.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid4ctr::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// println!("{:?}", uuid.to_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuid4ctr::uuid4().to_string();
/// ```
pub fn uuid4() -> Uuid {
    lock_global_gen().get_mut().generate()
}

mod inner {
    use crate::Generator;

    /// A thin wrapper to reseed the generator when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: Generator,
    }

    impl GlobalGenInner {
        pub fn new(generator: Generator) -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator,
            }
        }

        /// Returns a mutable reference to the inner [`Generator`] instance, reseeding the
        /// generator on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Generator {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                tracing::debug!(
                    old_pid = self.pid,
                    "process ID changed; reseeding global generator"
                );
                *self = Self::new(reseed_or_abort());
            }
            &mut self.generator
        }
    }

    /// Seeds a replacement generator in a forked child. A failure panics while the global lock
    /// is held, poisoning it so that no later call retries.
    #[cfg(unix)]
    fn reseed_or_abort() -> Generator {
        match Generator::from_os_entropy() {
            Ok(generator) => generator,
            Err(err) => {
                tracing::error!(error = %err, "could not reseed global generator");
                panic!("uuid4ctr: could not reseed global generator: {}", err);
            }
        }
    }
}
