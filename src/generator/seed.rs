//! Key derivation from entropy and process identity.

use sha2::{Digest, Sha256};
use std::{process, time};

use super::EntropyError;

/// Process identity captured at seeding time.
///
/// Mixing these into the key keeps processes started at different times or under different
/// identities apart even if the entropy source is degenerate.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct Identity {
    /// Nanoseconds since the Unix epoch.
    pub time: u128,
    pub pid: u32,
    pub ppid: u32,
    pub uid: u32,
    pub gid: u32,
}

impl Identity {
    /// Captures the current wall-clock time and the identity of the running process.
    pub fn capture() -> Result<Self, EntropyError> {
        let time = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)?
            .as_nanos();

        #[cfg(unix)]
        let (ppid, uid, gid) = {
            // SAFETY: getuid and getgid are always successful and have no side effects
            let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
            (std::os::unix::process::parent_id(), uid, gid)
        };

        #[cfg(not(unix))]
        let (ppid, uid, gid) = (0, 0, 0);

        Ok(Self {
            time,
            pid: process::id(),
            ppid,
            uid,
            gid,
        })
    }
}

/// Condenses the random seed and the process identity into a 128-bit cipher key.
///
/// The fields are hashed in a fixed order: seed, time, pid, ppid, uid, gid, each integer in
/// big-endian. The key is the first half of the SHA-256 digest.
pub(crate) fn derive_key(seed: &[u8; 16], identity: &Identity) -> [u8; 16] {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(identity.time.to_be_bytes());
    hasher.update(identity.pid.to_be_bytes());
    hasher.update(identity.ppid.to_be_bytes());
    hasher.update(identity.uid.to_be_bytes());
    hasher.update(identity.gid.to_be_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; 16];
    key.copy_from_slice(&digest[..16]);
    key
}

#[cfg(test)]
mod tests {
    use super::{derive_key, Identity};
    use sha2::{Digest, Sha256};

    fn sample_identity() -> Identity {
        Identity {
            time: 1_700_000_000_123_456_789,
            pid: 4242,
            ppid: 1,
            uid: 1000,
            gid: 100,
        }
    }

    /// Captures current process identity
    #[test]
    fn captures_current_process_identity() {
        let identity = Identity::capture().unwrap();
        assert_eq!(identity.pid, std::process::id());
        assert!(identity.time > 0);

        let later = Identity::capture().unwrap();
        assert!(later.time >= identity.time);
        assert_eq!(
            (later.ppid, later.uid, later.gid),
            (identity.ppid, identity.uid, identity.gid)
        );
    }

    /// Hashes seed and identity fields in fixed order
    #[test]
    fn hashes_seed_and_identity_fields_in_fixed_order() {
        let seed = [0x11u8; 16];
        let identity = sample_identity();

        let mut message = Vec::new();
        message.extend_from_slice(&seed);
        message.extend_from_slice(&identity.time.to_be_bytes());
        for e in [identity.pid, identity.ppid, identity.uid, identity.gid] {
            message.extend_from_slice(&e.to_be_bytes());
        }
        let digest = Sha256::digest(&message);

        assert_eq!(derive_key(&seed, &identity), digest[..16]);
    }

    /// Derives different keys when any input changes
    #[test]
    fn derives_different_keys_when_any_input_changes() {
        let seed = [0x11u8; 16];
        let base = sample_identity();
        let key = derive_key(&seed, &base);
        assert_eq!(key, derive_key(&seed, &base));

        let mut other_seed = seed;
        other_seed[15] ^= 1;
        assert_ne!(key, derive_key(&other_seed, &base));

        let variants = [
            Identity { time: base.time + 1, ..base },
            Identity { pid: base.pid + 1, ..base },
            Identity { ppid: base.ppid + 1, ..base },
            Identity { uid: base.uid + 1, ..base },
            Identity { gid: base.gid + 1, ..base },
        ];
        for e in variants {
            assert_ne!(key, derive_key(&seed, &e), "{:?}", e);
        }
    }
}
