//! Plenum - Collegiate Appeals Board Engine
//!
//! This crate implements the docket, voting-aggregation, and
//! decision-publication engine behind a collegiate appeals board:
//! hearing sessions, per-member votes, algorithmic grouping of votes
//! into votings, binding judgments, and versioned decision
//! publications.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
