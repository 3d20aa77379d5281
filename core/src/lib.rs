#![forbid(unsafe_code)]
#![allow(clippy::doc_markdown)]

//! Cryptographic core of an Interactive Distributed Key Generation
//! (IDKG) and threshold-ECDSA signing protocol over secp256k1.
//!
//! A fixed set of nodes jointly generate, reshare, and multiply
//! Shamir-shared secrets and later cooperate to produce a standard
//! ECDSA signature whose private key never exists at any single node.
//! Module layout mirrors the protocol's layers: curve arithmetic,
//! polynomials/commitments/Lagrange interpolation, multi-recipient
//! encryption, zero-knowledge proofs, the dealing/transcript/complaint
//! state machine, BIP32-style key derivation, and signing.

pub mod commitment;
pub mod curve;
pub mod error;
pub mod idkg;
pub mod key;
pub mod lagrange;
pub mod mega;
pub mod poly;
pub mod rand;
pub mod ro;
pub mod seed;
pub mod sign;
pub mod zk;

pub use error::{Error, Result};
