//! Hit evaluation
//!
//! Intersects each pick of a slip with the winning numbers, zone by zone.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::draw::WinningRecord;
use crate::slip::numbers::natural_key;
use crate::slip::{Bet, BetSlip, DanTuo, ZonePair};

/// Hits for one pick, shaped like the pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitRecord {
    /// Red/blue hits of a single or compound pick
    Line(ZonePair),
    /// Hits of each anchor/float zone, reported separately
    DanTuo(DanTuo),
}

impl HitRecord {
    /// Total hits across all zones
    pub fn total(&self) -> usize {
        match self {
            HitRecord::Line(pair) => pair.len(),
            HitRecord::DanTuo(dantuo) => dantuo.len(),
        }
    }
}

/// Numbers present in both lists, deduplicated, in natural numeric order
pub fn zone_hits(picked: &[String], winning: &[String]) -> Vec<String> {
    let winning: HashSet<&str> = winning.iter().map(String::as_str).collect();
    let mut hits: Vec<String> = picked
        .iter()
        .filter(|n| winning.contains(n.as_str()))
        .cloned()
        .collect();
    hits.sort_by(|a, b| natural_key(a).cmp(&natural_key(b)));
    hits.dedup();
    hits
}

fn line_hits(pick: &ZonePair, record: &WinningRecord) -> ZonePair {
    ZonePair::new(zone_hits(&pick.red, &record.red), zone_hits(&pick.blue, &record.blue))
}

fn dantuo_hits(pick: &DanTuo, record: &WinningRecord) -> DanTuo {
    DanTuo {
        red_required: zone_hits(&pick.red_required, &record.red),
        red_optional: zone_hits(&pick.red_optional, &record.red),
        blue_required: zone_hits(&pick.blue_required, &record.blue),
        blue_optional: zone_hits(&pick.blue_optional, &record.blue),
    }
}

/// Compute hits for every pick of the slip, in pick order
pub fn evaluate(slip: &BetSlip, record: &WinningRecord) -> Vec<HitRecord> {
    info!("Winning numbers for {} {}: {}", slip.game, slip.issue, record.display());

    let hits: Vec<HitRecord> = match &slip.bet {
        Bet::Single(lines) => lines
            .iter()
            .map(|pick| HitRecord::Line(line_hits(pick, record)))
            .collect(),
        Bet::Compound(pick) => vec![HitRecord::Line(line_hits(pick, record))],
        Bet::Complex(pick) => vec![HitRecord::DanTuo(dantuo_hits(pick, record))],
    };

    for (index, hit) in hits.iter().enumerate() {
        debug!("Pick {} hits: {:?}", index + 1, hit);
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::Game;

    fn nums(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn ssq_record() -> WinningRecord {
        WinningRecord {
            game: Game::Ssq,
            red: nums("03 08 12 19 27 33"),
            blue: nums("16"),
        }
    }

    #[test]
    fn test_zone_hits_sorted_and_deduplicated() {
        let hits = zone_hits(&nums("33 03 12 03 05"), &nums("03 08 12 19 27 33"));
        assert_eq!(hits, nums("03 12 33"));
        assert!(zone_hits(&[], &nums("01")).is_empty());
    }

    #[test]
    fn test_single_picks_keep_order() {
        let slip = BetSlip::new(
            Game::Ssq,
            "2023001",
            Bet::Single(vec![
                ZonePair::new(nums("01 02 03 04 05 06"), nums("16")),
                ZonePair::new(nums("03 08 12 19 27 33"), nums("01")),
            ]),
        );
        let hits = evaluate(&slip, &ssq_record());
        assert_eq!(
            hits,
            vec![
                HitRecord::Line(ZonePair::new(nums("03"), nums("16"))),
                HitRecord::Line(ZonePair::new(nums("03 08 12 19 27 33"), vec![])),
            ]
        );
        assert_eq!(hits[1].total(), 6);
    }

    #[test]
    fn test_zones_do_not_cross_match() {
        let slip = BetSlip::new(
            Game::Ssq,
            "1",
            Bet::Compound(ZonePair::new(nums("16 20 21 22 23 24 25"), nums("03 08"))),
        );
        let hits = evaluate(&slip, &ssq_record());
        assert_eq!(hits, vec![HitRecord::Line(ZonePair::default())]);
    }

    #[test]
    fn test_complex_reports_required_and_optional_separately() {
        let record = WinningRecord {
            game: Game::Cjdlt,
            red: nums("03 11 19 27 35"),
            blue: nums("04 10"),
        };
        let slip = BetSlip::new(
            Game::Cjdlt,
            "23001",
            Bet::Complex(DanTuo {
                red_required: nums("03 05"),
                red_optional: nums("11 19 20 21"),
                blue_required: nums("10"),
                blue_optional: nums("01 04"),
            }),
        );
        let hits = evaluate(&slip, &record);
        assert_eq!(
            hits,
            vec![HitRecord::DanTuo(DanTuo {
                red_required: nums("03"),
                red_optional: nums("11 19"),
                blue_required: nums("10"),
                blue_optional: nums("04"),
            })]
        );
    }

    #[test]
    fn test_shuffled_zone_and_repeat_evaluation_agree() {
        let record = ssq_record();
        let slip = BetSlip::new(
            Game::Ssq,
            "1",
            Bet::Compound(ZonePair::new(nums("33 01 19 03 27 05 08"), nums("16 02"))),
        );
        let shuffled = BetSlip::new(
            Game::Ssq,
            "1",
            Bet::Compound(ZonePair::new(nums("08 05 27 03 19 01 33"), nums("02 16"))),
        );
        let first = evaluate(&slip, &record);
        assert_eq!(first, evaluate(&slip, &record));
        assert_eq!(first, evaluate(&shuffled, &record));
    }
}
