//! Lottery Checker
//!
//! Parses recognized lottery ticket text into typed bet slips, checks them
//! against official winning numbers, and exposes an editable result table
//! for correcting recognition mistakes before the check.

pub mod app;
pub mod bridge;
pub mod check;
pub mod config;
pub mod draw;
pub mod error;
pub mod report;
pub mod slip;
pub mod storage;

pub use app::{CheckOutcome, LotteryChecker};
pub use bridge::ResultBridge;
pub use check::{evaluate, HitRecord};
pub use draw::{parse_winning_record, DrawSource, PendingLookup, WinningRecord, WinningRecordStore};
pub use error::{CheckError, CheckResult};
pub use slip::{parse_issue, Bet, BetSlip, BetSlipParser, DanTuo, Game, PlayStyle, SlipNumbers, Zone, ZonePair};
