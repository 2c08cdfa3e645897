//! UUIDv4 generator and related types.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::Uuid;

mod seed;
pub mod with_rand08;

/// A trait that defines the minimum entropy source interface for [`Generator`].
pub trait EntropySource {
    /// Fills the whole of `dest` with secure random bytes, or returns an error if the source
    /// cannot deliver that many.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

impl<T: EntropySource + ?Sized> EntropySource for &mut T {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill_bytes(dest)
    }
}

/// Error seeding a [`Generator`].
///
/// A generator that cannot be seeded cannot produce unpredictable identifiers, so callers are
/// expected to treat this as fatal rather than retry.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EntropyError {
    /// The entropy source could not be opened or returned fewer bytes than requested.
    #[error("could not read from entropy source")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The system clock reported a time before the Unix epoch.
    #[error("could not read system clock")]
    Clock(#[from] std::time::SystemTimeError),
}

/// The 128-bit block counter fed to the cipher, stored as two 64-bit halves.
///
/// The big-endian serialization places `hi` before `lo`.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct Counter {
    hi: u64,
    lo: u64,
}

impl Counter {
    /// Creates a counter from its high and low halves.
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Creates a counter from 16 big-endian bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let (hi, lo) = bytes.split_at(8);
        let mut hi_bytes = [0u8; 8];
        let mut lo_bytes = [0u8; 8];
        hi_bytes.copy_from_slice(hi);
        lo_bytes.copy_from_slice(lo);
        Self {
            hi: u64::from_be_bytes(hi_bytes),
            lo: u64::from_be_bytes(lo_bytes),
        }
    }

    /// Returns the 16-byte big-endian representation used as the cipher input block.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut dst = [0u8; 16];
        dst[..8].copy_from_slice(&self.hi.to_be_bytes());
        dst[8..].copy_from_slice(&self.lo.to_be_bytes());
        dst
    }

    /// Returns the high half.
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// Returns the low half.
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Increments the low half, carrying into the high half when the low half wraps to zero.
    pub fn increment(&mut self) {
        self.lo = self.lo.wrapping_add(1);
        if self.lo == 0 {
            self.hi = self.hi.wrapping_add(1);
        }
    }
}

impl From<Counter> for u128 {
    fn from(src: Counter) -> Self {
        (u128::from(src.hi) << 64) | u128::from(src.lo)
    }
}

/// Represents a UUIDv4 generator that encrypts an incrementing 128-bit counter with a secret
/// AES-128 key.
///
/// The key is condensed once, at construction, from 16 bytes of entropy mixed with the wall-clock
/// time and the process identity (process ID, parent process ID, user ID, and group ID). Another
/// 16 bytes of entropy seed the counter. Generating an identifier afterwards never touches the
/// entropy source again: every call increments the counter and encrypts it, so identifiers never
/// repeat within 2^128 calls and stay unpredictable to anyone without the key.
///
/// The generator itself is not synchronized. The following example shares one instance across
/// threads using Rust's standard synchronization mechanism, which serializes the
/// increment-then-encrypt sequence.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use uuid4ctr::Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(Generator::from_os_entropy()?));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// # Ok::<(), uuid4ctr::EntropyError>(())
/// ```
pub struct Generator {
    cipher: Aes128,
    counter: Counter,
}

impl Generator {
    /// Creates a generator, reading 32 bytes from `entropy`: the first 16 are condensed into the
    /// key and the next 16 seed the counter.
    pub fn new<E: EntropySource>(mut entropy: E) -> Result<Self, EntropyError> {
        let mut key_seed = [0u8; 16];
        entropy.fill_bytes(&mut key_seed)?;
        let identity = seed::Identity::capture()?;
        let key = seed::derive_key(&key_seed, &identity);

        let mut counter_seed = [0u8; 16];
        entropy.fill_bytes(&mut counter_seed)?;

        tracing::debug!(pid = identity.pid, "seeded UUIDv4 generator");
        Ok(Self::with_key(key, Counter::from_bytes(counter_seed)))
    }

    /// Creates a generator from a raw AES-128 key and an initial counter value.
    pub(crate) fn with_key(key: [u8; 16], counter: Counter) -> Self {
        Self {
            cipher: Aes128::new(&GenericArray::from(key)),
            counter,
        }
    }

    /// Generates a new UUIDv4 object.
    pub fn generate(&mut self) -> Uuid {
        self.counter.increment();
        self.encrypt_counter(self.counter)
    }

    /// Returns the current counter value.
    #[cfg(test)]
    pub(crate) fn counter(&self) -> Counter {
        self.counter
    }

    /// Encrypts `counter` and overwrites the variant and version bits of the result.
    pub(crate) fn encrypt_counter(&self, counter: Counter) -> Uuid {
        let mut block = counter.to_bytes();
        self.cipher.encrypt_block(GenericArray::from_mut_slice(&mut block));

        let mut parts = <[u32; 4]>::from(Uuid::from(block));
        parts[2] = (parts[2] & !0xc000_0000) | 0x8000_0000;
        parts[1] = (parts[1] & !0x0000_f000) | 0x0000_4000;
        Uuid::from_parts(parts)
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv4 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuid4ctr::Generator;
///
/// Generator::from_os_entropy()?
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// # Ok::<(), uuid4ctr::EntropyError>(())
/// ```
impl Iterator for Generator {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl std::iter::FusedIterator for Generator {}


#[cfg(test)]
mod tests {
    use super::{Counter, EntropyError, EntropySource, Generator};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    /// An entropy source that succeeds a limited number of times.
    struct FlakySource(usize);

    impl EntropySource for FlakySource {
        fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
            if self.0 == 0 {
                let err = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
                return Err(EntropyError::Source(Box::new(err)));
            }
            self.0 -= 1;
            dest.fill(0x5a);
            Ok(())
        }
    }

    /// Encrypts counter with AES-128 and patches variant and version bits
    #[test]
    fn encrypts_counter_with_aes_128_and_patches_variant_and_version_bits() {
        // FIPS-197 appendix C.1: 00112233445566778899aabbccddeeff -> 69c4e0d86a7b0430d8cdb78070b4c55a
        let key = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let counter = Counter::new(0x0011_2233_4455_6677, 0x8899_aabb_ccdd_eefe);
        let mut g = Generator::with_key(key, counter);
        let e = g.generate();
        assert_eq!(e.to_string(), "69c4e0d8-6a7b-4430-98cd-b78070b4c55a");
        assert_eq!(
            g.counter(),
            Counter::new(0x0011_2233_4455_6677, 0x8899_aabb_ccdd_eeff)
        );
    }

    /// Carries counter across halves while generating
    #[test]
    fn carries_counter_across_halves_while_generating() {
        let mut g = Generator::with_key([0x42; 16], Counter::new(9, u64::MAX - 1));
        g.generate();
        assert_eq!(g.counter(), Counter::new(9, u64::MAX));
        let e = g.generate();
        assert_eq!(g.counter(), Counter::new(10, 0));
        assert_eq!(e, g.encrypt_counter(Counter::new(10, 0)));
    }

    /// Seeds counter from second 16 bytes of entropy
    #[test]
    fn seeds_counter_from_second_16_bytes_of_entropy() {
        let mut expected = [0u8; 32];
        ChaCha12Rng::seed_from_u64(42).fill_bytes(&mut expected);
        let mut counter_seed = [0u8; 16];
        counter_seed.copy_from_slice(&expected[16..]);

        let g = Generator::with_rand08(ChaCha12Rng::seed_from_u64(42)).unwrap();
        assert_eq!(g.counter(), Counter::from_bytes(counter_seed));
    }

    /// Returns error if entropy source fails
    #[test]
    fn returns_error_if_entropy_source_fails() {
        assert!(matches!(
            Generator::new(FlakySource(0)),
            Err(EntropyError::Source(_))
        ));

        // key seed read succeeds but counter seed read fails
        assert!(matches!(
            Generator::new(FlakySource(1)),
            Err(EntropyError::Source(_))
        ));

        let mut source = FlakySource(2);
        assert!(Generator::new(&mut source).is_ok());
        assert_eq!(source.0, 0);
    }

    /// Sets variant and version bits on every output
    #[test]
    fn sets_variant_and_version_bits_on_every_output() {
        let mut g = Generator::with_rand08(ChaCha12Rng::seed_from_u64(7)).unwrap();
        for _ in 0..10_000 {
            let parts = *g.generate().parts();
            assert_eq!(parts[2] & 0xc000_0000, 0x8000_0000);
            assert_eq!(parts[1] & 0x0000_f000, 0x0000_4000);
        }
    }

    /// Generates 10k identifiers without collision
    #[test]
    fn generates_10k_identifiers_without_collision() {
        use std::collections::HashSet;
        let g = Generator::from_os_entropy().unwrap();
        let s: HashSet<_> = g.take(10_000).collect();
        assert_eq!(s.len(), 10_000);
    }

    /// Generates different sequences from different entropy
    #[test]
    fn generates_different_sequences_from_different_entropy() {
        let a: Vec<_> = Generator::with_rand08(ChaCha12Rng::seed_from_u64(1))
            .unwrap()
            .take(16)
            .collect();
        let b: Vec<_> = Generator::with_rand08(ChaCha12Rng::seed_from_u64(2))
            .unwrap()
            .take(16)
            .collect();
        assert!(a.iter().all(|e| !b.contains(e)));
    }

    /// Does not reveal key material in debug output
    #[test]
    fn does_not_reveal_key_material_in_debug_output() {
        let g = Generator::with_key([0xab; 16], Counter::default());
        assert_eq!(format!("{:?}", g), "Generator { .. }");
    }
}
