//! Brute-force search of a geocaching puzzle solution around a known point.
//!
//! The candidates are enumerated on the thousandth-of-minute grid
//! nearest first ([`search`]) and submitted one by one to the remote
//! coordinate checker ([`Hunter`]), skipping the points tried before.

// do not warn on older Rust versions
#![allow(unknown_lints)]
#![warn(absolute_paths_not_starting_with_crate)]
#![warn(anonymous_parameters)]
#![warn(deprecated_in_future)]
#![warn(elided_lifetimes_in_paths)]
#![warn(explicit_outlives_requirements)]
#![warn(keyword_idents)]
#![warn(macro_use_extern_crate)]
#![warn(meta_variable_misuse)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(single_use_lifetimes)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// conflicts with the `clippy::redundant_pub_crate`
#![allow(unreachable_pub)]
// !!! NO UNSAFE
#![forbid(unsafe_code)]
#![warn(unstable_features)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]
#![warn(unused_labels)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]
#![warn(unused_results)]
#![warn(variant_size_differences)]
//
// additional recommendations
#![deny(clippy::mem_forget)]
// suppress some pedantic warnings
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// `use super::*` in tests
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub use geocheck_types::{Angle, Axis, Direction, Point};

pub use self::{
    captcha::{CaptchaError, CaptchaTable},
    config::{load_config, Config, ConfigError},
    hunt::{Attempt, HuntError, Hunter, Outcome},
    ledger::{FileLedger, Ledger, LedgerError, MemoryLedger},
    operator::{Remediation, RemediationError, StdinPrompt},
    remote::{CheckError, Checker, GeocheckClient, Puzzle, Verdict},
    search::{search, search_with_distances},
};

pub mod captcha;
pub mod config;
pub mod hunt;
pub mod ledger;
pub mod operator;
pub mod remote;
pub mod search;
