//! Per-request classification core.
//!
//! Everything in this module is a pure function of the request payload: no I/O, no shared
//! state, nothing that can block. The HTTP layer calls [`assemble`] once per request and
//! renders the resulting [`Report`].
//!
//! # Components
//!
//! - [`tokens`]: splits the token list into numeric and non-numeric groups
//! - [`primes`]: reports whether any numeric token's leading integer is prime
//! - [`lowercase`]: picks the greatest all-lowercase non-numeric token
//! - [`signature`]: decodes an optional base64 file and checks its magic bytes
//! - [`assemble`](mod@assemble): validates the payload shape and composes the above
//!
//! # Example
//!
//! ```
//! use bfhl::classify::{Identity, Payload, assemble};
//!
//! let identity = Identity {
//!     user_id: "john_doe_17091999".into(),
//!     email: "john@xyz.com".into(),
//!     roll_number: "ABCD123".into(),
//! };
//! let payload = Payload::from_json(serde_json::json!({ "data": ["a", "7", "B"] })).unwrap();
//!
//! let report = assemble(payload, &identity);
//! assert_eq!(report.classification.numeric, vec!["7"]);
//! assert!(report.classification.has_prime);
//! assert_eq!(report.classification.max_lowercase, vec!["a"]);
//! ```

pub mod assemble;
pub mod lowercase;
pub mod primes;
pub mod signature;
pub mod tokens;

pub use assemble::{ClassificationResult, Identity, Payload, Report, assemble, classify};
pub use lowercase::{NO_LOWERCASE_SENTINEL, highest_lowercase};
pub use primes::{contains_prime, is_prime, leading_integer};
pub use signature::{FileVerdict, validate_file};
pub use tokens::{ClassifiedTokens, classify_tokens, is_numeric};
