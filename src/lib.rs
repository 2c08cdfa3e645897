//! Unpredictable UUIDv4 generator driven by AES-128 in counter mode
//!
//! ```rust
//! use uuid4ctr::uuid4;
//!
//! let uuid = uuid4();
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{:?}", uuid.parts()); // as four 32-bit parts, most significant first
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            part 0                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |            part 1             |  ver  |        part 1         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          part 2                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            part 3                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 4-bit `ver` field is set at `0100`.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 122 bits come from the AES-128 encryption of a 128-bit counter.
//!
//! The generator condenses 16 bytes from the operating system's random source, together with the
//! wall-clock time and the process identity, into a secret AES-128 key exactly once per process.
//! Another 16 random bytes seed the counter. Every identifier afterwards costs one counter
//! increment and one block encryption, so identifiers never repeat within a process and cannot be
//! predicted without the key.
//!
//! # Other features
//!
//! Identifiers can be parsed from and formatted to the canonical 8-4-4-4-12 string, and compare
//! in the same order as their strings:
//!
//! ```rust
//! use uuid4ctr::Uuid;
//!
//! let x: Uuid = "01234567-89ab-cdef-0123-456789abcdef".parse()?;
//! assert_eq!(x.parts(), &[0x01234567, 0x89abcdef, 0x01234567, 0x89abcdef]);
//! assert_eq!(x.compare_three_way(&Uuid::nil()), 1);
//! assert!("01234567-89ab-cdef-0123-456789abcdeg".parse::<Uuid>().is_err());
//! # Ok::<(), uuid4ctr::ParseError>(())
//! ```
//!
//! A [`Generator`] can also be owned and passed around explicitly instead of using the
//! process-wide one behind [`uuid4()`]:
//!
//! ```rust
//! use uuid4ctr::Generator;
//!
//! let mut g = Generator::from_os_entropy()?;
//! println!("{}", g.generate());
//! # Ok::<(), uuid4ctr::EntropyError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ParseError, Uuid, Variant};

pub mod generator;
pub use generator::{EntropyError, EntropySource, Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{ensure_initialized, uuid4};
