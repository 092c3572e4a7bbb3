//! Checker Coordinator
//!
//! Ties the parser, the draw store and the hit evaluator together and
//! remembers the last checked ticket.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::bridge::ResultBridge;
use crate::check::{evaluate, HitRecord};
use crate::draw::{DrawSource, WinningRecord, WinningRecordStore};
use crate::error::CheckResult;
use crate::slip::{BetSlip, BetSlipParser, Game};

/// A slip together with its draw and hits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub slip: BetSlip,
    pub winning: WinningRecord,
    pub hits: Vec<HitRecord>,
}

impl CheckOutcome {
    /// Post-check bridge for display
    pub fn to_bridge(&self) -> ResultBridge {
        let (game, issue, numbers) = self.slip.to_query_tuple();
        ResultBridge::from_checked(game, issue, self.winning.clone(), numbers, self.hits.clone())
    }
}

/// Main ticket checker
pub struct LotteryChecker {
    store: Arc<WinningRecordStore>,
    timeout: Duration,
    last_result: Option<CheckOutcome>,
}

impl LotteryChecker {
    /// Create a checker fetching draws from `source`, waiting at most `timeout` per lookup
    pub fn new(source: Arc<dyn DrawSource>, timeout: Duration) -> Self {
        Self {
            store: Arc::new(WinningRecordStore::new(source)),
            timeout,
            last_result: None,
        }
    }

    /// Shared draw store
    pub fn store(&self) -> Arc<WinningRecordStore> {
        self.store.clone()
    }

    /// Parse recognized issue text and number lines
    pub fn recognize<S: AsRef<str>>(&self, issue_text: &str, lines: &[S], game: Game) -> CheckResult<BetSlip> {
        BetSlipParser::new(game).parse_slip(issue_text, lines)
    }

    /// Look up the draw for a slip and compute its hits
    pub fn check(&mut self, slip: &BetSlip) -> CheckResult<CheckOutcome> {
        let winning = self
            .store
            .lookup_in_background(slip.game, &slip.issue)
            .wait(self.timeout)?;
        let hits = evaluate(slip, &winning);
        info!(
            "Checked {} issue {}: {} pick(s), {} hit(s) in total",
            slip.game,
            slip.issue,
            hits.len(),
            hits.iter().map(HitRecord::total).sum::<usize>()
        );

        let outcome = CheckOutcome {
            slip: slip.clone(),
            winning,
            hits,
        };
        self.last_result = Some(outcome.clone());
        Ok(outcome)
    }

    /// Check whatever the bridge currently holds
    pub fn check_bridge(&mut self, bridge: &ResultBridge) -> CheckResult<CheckOutcome> {
        let slip = BetSlip::from_query_tuple(bridge.to_query_tuple());
        self.check(&slip)
    }

    /// Last successful check, if any
    pub fn last_result(&self) -> Option<&CheckOutcome> {
        self.last_result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::tests::FakeSource;
    use crate::error::CheckError;
    use std::sync::atomic::Ordering;

    fn checker(source: Arc<FakeSource>) -> LotteryChecker {
        LotteryChecker::new(source, Duration::from_secs(5))
    }

    #[test]
    fn test_recognize_and_check() {
        let source = Arc::new(FakeSource::new(&[(Game::Ssq, "2023001", "03,08,12,19,27,33+16")]));
        let mut checker = checker(source.clone());

        let slip = checker
            .recognize("第2023001期", &["A 03 08 12 01 02 04 16"], Game::Ssq)
            .unwrap();
        let outcome = checker.check(&slip).unwrap();

        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].total(), 4);
        assert_eq!(checker.last_result(), Some(&outcome));

        checker.check(&slip).unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_check_keeps_previous_result() {
        let source = Arc::new(FakeSource::new(&[(Game::Ssq, "1", "01 02 03 04 05 06 07")]));
        let mut checker = checker(source);

        let good = checker.recognize("1", &["A 01 02 03 04 05 06 07"], Game::Ssq).unwrap();
        checker.check(&good).unwrap();

        let missing = checker.recognize("2", &["A 01 02 03 04 05 06 07"], Game::Ssq).unwrap();
        let err = checker.check(&missing).unwrap_err();
        assert!(matches!(err, CheckError::NoDrawData { .. }));
        assert_eq!(checker.last_result().unwrap().slip.issue, "1");
    }

    #[test]
    fn test_outcome_bridge_shows_hits() {
        let source = Arc::new(FakeSource::new(&[(Game::Cjdlt, "23001", "01 02 03 04 05 06 07")]));
        let mut checker = checker(source);

        let slip = checker
            .recognize("23001", &["01 02 03 09 10 11-06 12"], Game::Cjdlt)
            .unwrap();
        let bridge = checker.check(&slip).unwrap().to_bridge();
        assert_eq!(bridge.get_cell(2, 0), "01 02 03 04 05 + 06 07");
        assert_eq!(bridge.get_cell(4, 1), "中3 + 1");
    }
}
