//! Integration with `rand` (v0.8) crate.

use super::{EntropyError, EntropySource, Generator};
use rand::{rngs::OsRng, RngCore};

/// An adapter that implements [`EntropySource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> EntropySource for Adapter<T> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.0
            .try_fill_bytes(dest)
            .map_err(|err| EntropyError::Source(Box::new(err)))
    }
}

/// The operating system's secure random source.
pub type OsEntropy = Adapter<OsRng>;

impl Generator {
    /// Creates a generator seeded by a random number generator that implements [`RngCore`] from
    /// `rand` (v0.8) crate.
    ///
    /// The generator is only as unpredictable as `rng`; pass a seeded deterministic generator
    /// only where reproducible output is wanted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use uuid4ctr::Generator;
    ///
    /// let mut g = Generator::with_rand08(rand::rngs::StdRng::from_entropy())?;
    /// println!("{}", g.generate());
    /// # Ok::<(), uuid4ctr::EntropyError>(())
    /// ```
    pub fn with_rand08<T: RngCore>(rng: T) -> Result<Self, EntropyError> {
        Self::new(Adapter(rng))
    }

    /// Creates a generator seeded by the operating system's secure random source.
    pub fn from_os_entropy() -> Result<Self, EntropyError> {
        Self::new(OsEntropy::default())
    }
}
