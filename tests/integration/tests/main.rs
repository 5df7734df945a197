//! End-to-end checks of signed and encrypted SPID responses.

mod compliance;
mod decryption;
mod metadata;
