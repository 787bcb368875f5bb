//! Signing OCI control plane API requests without effort.
//!
//! This crate covers the two pieces a client needs before a request reaches
//! the transport layer:
//!
//! - [`ConfigFile`] / [`Profile`]: parse the OCI CLI style credential config
//!   file and resolve one effective profile, inheriting missing fields from
//!   the `default` profile.
//! - [`Signer`]: build the canonical signing string for a request, sign it
//!   with the profile's RSA API key and populate the `Authorization`, `host`
//!   and `date` headers (plus the content headers for body-bearing methods).
//!
//! Transport, retries and TLS stay with the HTTP client of your choice; a
//! signed request can be handed to any of them.
//!
//! # Example
//!
//! ```no_run
//! use ocisign::{Profile, Signer};
//!
//! fn main() -> ocisign::Result<()> {
//!     // Resolve credentials from ~/.oci/config style file.
//!     let profile = Profile::from_config_file("/home/user/.oci/config", None)?;
//!     let signer = Signer::from_profile(&profile)?;
//!
//!     // Construct request
//!     let mut req = http::Request::builder()
//!         .method(http::Method::GET)
//!         .uri("https://identity.us-phoenix-1.oraclecloud.com/20160918/users/")
//!         .body(Vec::<u8>::new())
//!         .unwrap();
//!
//!     // Signing request with Signer
//!     signer.sign(&mut req)?;
//!
//!     // Hand the signed request to the transport of your choice.
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;

mod utils;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod config;
pub use config::ConfigFile;
pub use config::Profile;

mod sign;
pub use sign::Signer;
