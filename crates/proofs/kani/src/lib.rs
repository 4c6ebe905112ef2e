//! Kani harnesses for the reserve curve
//!
//! Run with: cargo kani -p proofs-kani

#![no_std]

#[cfg(kani)]
mod curve;
