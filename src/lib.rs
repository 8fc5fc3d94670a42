//! NFT Marketplace Client — Library Root
//!
//! Client-side SDK for an on-chain NFT marketplace: builds and submits
//! the marketplace transactions (mint, list, bid, buy and their
//! cancel/accept counterparts) and derives display-ready view-models
//! from raw chain object reads. The marketplace contract itself, the
//! wallet session, and all rendering live outside this crate.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
