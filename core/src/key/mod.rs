pub mod derivation;

pub use derivation::{DerivationIndex, DerivationPath};
