//! Bet Slip Model
//!
//! Typed representation of a lottery bet recognized from a ticket. The
//! three play styles have differently shaped picks, so a slip carries a
//! [`Bet`] variant rather than a loose list of tuples.

pub mod numbers;
pub mod parser;

pub use parser::{parse_issue, BetSlipParser};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CheckError, CheckResult};

/// Lottery game printed on the ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// Shuangseqiu: 6 red (01-33) + 1 blue (01-16)
    Ssq,
    /// Super Lotto: 5 front (01-35) + 2 back (01-12)
    Cjdlt,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Ssq, Game::Cjdlt];

    /// Code token used by the detector and the draw service
    pub fn code(&self) -> &'static str {
        match self {
            Game::Ssq => "ssq",
            Game::Cjdlt => "cjdlt",
        }
    }

    /// Canonical display label
    pub fn display_label(&self) -> &'static str {
        match self {
            Game::Ssq => "双色球",
            Game::Cjdlt => "超级大乐透",
        }
    }

    /// Reverse of [`Game::display_label`]
    pub fn from_display_label(label: &str) -> Option<Game> {
        Game::ALL.into_iter().find(|g| g.display_label() == label)
    }

    /// Count of red/front numbers in one full bet line
    pub fn red_count(&self) -> usize {
        match self {
            Game::Ssq => 6,
            Game::Cjdlt => 5,
        }
    }

    /// Count of blue/back numbers in one full bet line
    pub fn blue_count(&self) -> usize {
        match self {
            Game::Ssq => 1,
            Game::Cjdlt => 2,
        }
    }

    /// Numbers in one full bet line
    pub fn line_size(&self) -> usize {
        self.red_count() + self.blue_count()
    }

    /// Name of the first zone as printed in reports
    pub fn red_zone_name(&self) -> &'static str {
        match self {
            Game::Ssq => "红",
            Game::Cjdlt => "前区",
        }
    }

    /// Name of the second zone as printed in reports
    pub fn blue_zone_name(&self) -> &'static str {
        match self {
            Game::Ssq => "蓝",
            Game::Cjdlt => "后区",
        }
    }

    /// Whether the second zone supports an anchor/float split
    pub fn has_blue_anchor(&self) -> bool {
        matches!(self, Game::Cjdlt)
    }

    /// Split a flat token list positionally into one bet line.
    ///
    /// Callers must have checked that `tokens` holds at least
    /// [`Game::line_size`] entries; extra trailing tokens are ignored.
    pub fn split_line(&self, tokens: &[String]) -> CheckResult<ZonePair> {
        let (reds, blues) = (self.red_count(), self.blue_count());
        if tokens.len() < reds + blues {
            return Err(CheckError::MissingInfo(format!(
                "expected {} numbers for {}, found {}",
                reds + blues,
                self,
                tokens.len()
            )));
        }
        Ok(ZonePair {
            red: tokens[..reds].to_vec(),
            blue: tokens[reds..reds + blues].to_vec(),
        })
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Game {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssq" => Ok(Game::Ssq),
            "cjdlt" => Ok(Game::Cjdlt),
            other => Err(CheckError::UnknownGame(other.to_string())),
        }
    }
}

/// How the numbers on a slip encode bets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    /// One full line per pick
    Single,
    /// One pick with oversized zones
    Compound,
    /// Anchor + float ("dantuo")
    Complex,
}

impl PlayStyle {
    pub fn label(&self) -> &'static str {
        match self {
            PlayStyle::Single => "单式",
            PlayStyle::Compound => "复式",
            PlayStyle::Complex => "胆拖",
        }
    }

    pub fn from_label(label: &str) -> Option<PlayStyle> {
        [PlayStyle::Single, PlayStyle::Compound, PlayStyle::Complex]
            .into_iter()
            .find(|s| s.label() == label)
    }
}

/// Named number group inside a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Red,
    Blue,
    RedRequired,
    RedOptional,
    BlueRequired,
    BlueOptional,
}

impl Zone {
    /// Anchor/float zones in slip order
    pub const DANTUO: [Zone; 4] = [
        Zone::RedRequired,
        Zone::RedOptional,
        Zone::BlueRequired,
        Zone::BlueOptional,
    ];

    /// Anchor/float zones that exist for a game
    pub fn dantuo_zones(game: Game) -> &'static [Zone] {
        match game {
            Game::Ssq => &[Zone::RedRequired, Zone::RedOptional, Zone::BlueOptional],
            Game::Cjdlt => &Zone::DANTUO,
        }
    }
}

/// Red/blue numbers of a single or compound pick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePair {
    pub red: Vec<String>,
    pub blue: Vec<String>,
}

impl ZonePair {
    pub fn new(red: Vec<String>, blue: Vec<String>) -> Self {
        Self { red, blue }
    }

    pub fn len(&self) -> usize {
        self.red.len() + self.blue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_zone(&self, zone: Zone, values: Vec<String>) -> CheckResult<ZonePair> {
        match zone {
            Zone::Red => Ok(ZonePair::new(values, self.blue.clone())),
            Zone::Blue => Ok(ZonePair::new(self.red.clone(), values)),
            other => Err(CheckError::InvalidEdit(format!(
                "zone {:?} does not exist on a single or compound pick",
                other
            ))),
        }
    }
}

/// Anchor ("required") and float ("optional") numbers of a complex pick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanTuo {
    pub red_required: Vec<String>,
    pub red_optional: Vec<String>,
    pub blue_required: Vec<String>,
    pub blue_optional: Vec<String>,
}

impl DanTuo {
    pub fn zone(&self, zone: Zone) -> Option<&[String]> {
        match zone {
            Zone::RedRequired => Some(&self.red_required),
            Zone::RedOptional => Some(&self.red_optional),
            Zone::BlueRequired => Some(&self.blue_required),
            Zone::BlueOptional => Some(&self.blue_optional),
            Zone::Red | Zone::Blue => None,
        }
    }

    pub fn len(&self) -> usize {
        self.red_required.len()
            + self.red_optional.len()
            + self.blue_required.len()
            + self.blue_optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_zone(&self, zone: Zone, values: Vec<String>) -> CheckResult<DanTuo> {
        let mut next = self.clone();
        match zone {
            Zone::RedRequired => next.red_required = values,
            Zone::RedOptional => next.red_optional = values,
            Zone::BlueRequired => next.blue_required = values,
            Zone::BlueOptional => next.blue_optional = values,
            Zone::Red | Zone::Blue => {
                return Err(CheckError::InvalidEdit(format!(
                    "zone {:?} does not exist on a complex pick",
                    zone
                )))
            }
        }
        Ok(next)
    }
}

/// The picks on a slip, shaped by play style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bet {
    /// One or more full lines
    Single(Vec<ZonePair>),
    /// Exactly one pick with oversized zones
    Compound(ZonePair),
    /// Exactly one anchor/float pick
    Complex(DanTuo),
}

impl Bet {
    pub fn play_style(&self) -> PlayStyle {
        match self {
            Bet::Single(_) => PlayStyle::Single,
            Bet::Compound(_) => PlayStyle::Compound,
            Bet::Complex(_) => PlayStyle::Complex,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Bet::Single(lines) => lines.len(),
            Bet::Compound(_) | Bet::Complex(_) => 1,
        }
    }

    /// Check the zone sizes the play style requires for `game`.
    ///
    /// Single lines hold exactly one line's worth of numbers per zone.
    /// Compound and complex picks hold at least that many per zone and more
    /// than one line in total; a complex pick needs red floats, and only
    /// games with a blue anchor may carry blue anchors.
    pub fn validate(&self, game: Game) -> CheckResult<()> {
        match self {
            Bet::Single(lines) => {
                if lines.is_empty() {
                    return Err(CheckError::MissingInfo("single slip has no lines".to_string()));
                }
                for (index, line) in lines.iter().enumerate() {
                    if line.red.len() != game.red_count() || line.blue.len() != game.blue_count() {
                        return Err(CheckError::MissingInfo(format!(
                            "line {} has {}+{} numbers, {} needs {}+{}",
                            index + 1,
                            line.red.len(),
                            line.blue.len(),
                            game,
                            game.red_count(),
                            game.blue_count()
                        )));
                    }
                }
                Ok(())
            }
            Bet::Compound(pair) => ensure_oversized(game, pair.red.len(), pair.blue.len()),
            Bet::Complex(dantuo) => {
                if !game.has_blue_anchor() && !dantuo.blue_required.is_empty() {
                    return Err(CheckError::MalformedSlip(format!("{} has no blue anchor zone", game)));
                }
                if dantuo.red_optional.is_empty() {
                    return Err(CheckError::MissingInfo("complex slip has no red floats".to_string()));
                }
                ensure_oversized(
                    game,
                    dantuo.red_required.len() + dantuo.red_optional.len(),
                    dantuo.blue_required.len() + dantuo.blue_optional.len(),
                )
            }
        }
    }

    fn pair_mut(&mut self, pick_index: usize) -> CheckResult<&mut ZonePair> {
        match self {
            Bet::Single(lines) => {
                let count = lines.len();
                lines.get_mut(pick_index).ok_or_else(|| {
                    CheckError::InvalidEdit(format!("pick {} out of range ({} picks)", pick_index, count))
                })
            }
            Bet::Compound(pair) if pick_index == 0 => Ok(pair),
            Bet::Compound(_) => Err(CheckError::InvalidEdit(format!(
                "compound slip has a single pick, got index {}",
                pick_index
            ))),
            Bet::Complex(_) => Err(CheckError::InvalidEdit(
                "complex slip picks are edited per zone".to_string(),
            )),
        }
    }
}

/// Each zone holds at least one line's worth and the total exceeds one line
fn ensure_oversized(game: Game, red: usize, blue: usize) -> CheckResult<()> {
    if red < game.red_count() || blue < game.blue_count() {
        return Err(CheckError::MissingInfo(format!(
            "{}+{} numbers, {} needs at least {}+{} per zone",
            red,
            blue,
            game,
            game.red_count(),
            game.blue_count()
        )));
    }
    if red + blue <= game.line_size() {
        return Err(CheckError::MissingInfo(format!(
            "{} numbers is not enough for a compound or complex slip",
            red + blue
        )));
    }
    Ok(())
}

/// Play style and picks, without game or issue. This is the "numbers" part
/// of a query tuple handed between the parser, the bridge and the checker;
/// the tuple's game is the only game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipNumbers {
    pub bet: Bet,
}

impl SlipNumbers {
    pub fn play_style(&self) -> PlayStyle {
        self.bet.play_style()
    }
}

/// Query tuple: game, issue and the parsed numbers
pub type QueryTuple = (Game, String, SlipNumbers);

/// A fully recognized ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSlip {
    pub game: Game,
    pub issue: String,
    pub bet: Bet,
}

impl BetSlip {
    pub fn new(game: Game, issue: impl Into<String>, bet: Bet) -> Self {
        Self {
            game,
            issue: issue.into(),
            bet,
        }
    }

    pub fn play_style(&self) -> PlayStyle {
        self.bet.play_style()
    }

    pub fn numbers(&self) -> SlipNumbers {
        SlipNumbers {
            bet: self.bet.clone(),
        }
    }

    pub fn to_query_tuple(&self) -> QueryTuple {
        (self.game, self.issue.clone(), self.numbers())
    }

    /// Rebuild a slip from a query tuple
    pub fn from_query_tuple((game, issue, numbers): QueryTuple) -> Self {
        Self {
            game,
            issue,
            bet: numbers.bet,
        }
    }

    /// Replace the numbers of one zone of one pick, rebuilding that pick.
    pub fn replace_zone(&mut self, pick_index: usize, zone: Zone, values: Vec<String>) -> CheckResult<()> {
        let game = self.game;
        match &mut self.bet {
            Bet::Complex(dantuo) => {
                if pick_index != 0 {
                    return Err(CheckError::InvalidEdit(format!(
                        "complex slip has a single pick, got index {}",
                        pick_index
                    )));
                }
                // SSQ has one blue zone with no anchor
                if zone == Zone::BlueRequired && !game.has_blue_anchor() {
                    return Err(CheckError::InvalidEdit(format!(
                        "{} has no blue anchor zone",
                        game
                    )));
                }
                *dantuo = dantuo.with_zone(zone, values)?;
            }
            bet => {
                let pair = bet.pair_mut(pick_index)?;
                *pair = pair.with_zone(zone, values)?;
            }
        }
        Ok(())
    }

    /// Replace both zones of a single or compound pick
    pub fn replace_pick(&mut self, pick_index: usize, red: Vec<String>, blue: Vec<String>) -> CheckResult<()> {
        let pair = self.bet.pair_mut(pick_index)?;
        *pair = ZonePair::new(red, blue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_game_codes_and_labels() {
        assert_eq!("ssq".parse::<Game>().unwrap(), Game::Ssq);
        assert_eq!(" CJDLT ".parse::<Game>().unwrap(), Game::Cjdlt);
        assert!(matches!("fc3d".parse::<Game>(), Err(CheckError::UnknownGame(_))));
        assert_eq!(Game::from_display_label("双色球"), Some(Game::Ssq));
        assert_eq!(Game::from_display_label("七乐彩"), None);
    }

    #[test]
    fn test_split_line_by_game() {
        let tokens = nums("01 02 03 04 05 06 07");
        let ssq = Game::Ssq.split_line(&tokens).unwrap();
        assert_eq!(ssq.red, nums("01 02 03 04 05 06"));
        assert_eq!(ssq.blue, nums("07"));

        let dlt = Game::Cjdlt.split_line(&tokens).unwrap();
        assert_eq!(dlt.red, nums("01 02 03 04 05"));
        assert_eq!(dlt.blue, nums("06 07"));

        assert!(matches!(
            Game::Ssq.split_line(&tokens[..5]),
            Err(CheckError::MissingInfo(_))
        ));
    }

    #[test]
    fn test_replace_zone_rebuilds_pick() {
        let mut slip = BetSlip::new(
            Game::Ssq,
            "2023001",
            Bet::Single(vec![
                ZonePair::new(nums("01 02 03 04 05 06"), nums("07")),
                ZonePair::new(nums("11 12 13 14 15 16"), nums("08")),
            ]),
        );
        slip.replace_zone(1, Zone::Blue, nums("09")).unwrap();
        match &slip.bet {
            Bet::Single(lines) => {
                assert_eq!(lines[1].blue, nums("09"));
                assert_eq!(lines[1].red, nums("11 12 13 14 15 16"));
                assert_eq!(lines[0].blue, nums("07"));
            }
            other => panic!("unexpected bet {:?}", other),
        }

        assert!(slip.replace_zone(2, Zone::Red, vec![]).is_err());
        assert!(slip.replace_zone(0, Zone::RedRequired, vec![]).is_err());
    }

    #[test]
    fn test_replace_zone_rejects_ssq_blue_anchor() {
        let mut slip = BetSlip::new(Game::Ssq, "1", Bet::Complex(DanTuo::default()));
        let before = slip.clone();
        assert!(slip.replace_zone(0, Zone::BlueRequired, nums("01")).is_err());
        assert_eq!(slip, before);

        let mut dlt = BetSlip::new(Game::Cjdlt, "1", Bet::Complex(DanTuo::default()));
        dlt.replace_zone(0, Zone::BlueRequired, nums("01")).unwrap();
        assert!(matches!(&dlt.bet, Bet::Complex(d) if d.blue_required == nums("01")));
    }

    #[test]
    fn test_query_tuple_roundtrip() {
        let slip = BetSlip::new(
            Game::Cjdlt,
            "23001",
            Bet::Compound(ZonePair::new(nums("01 02 03 04 05 06"), nums("07 08"))),
        );
        assert_eq!(BetSlip::from_query_tuple(slip.to_query_tuple()), slip);

        let (_, issue, numbers) = slip.to_query_tuple();
        let ssq = BetSlip::from_query_tuple((Game::Ssq, issue, numbers));
        assert_eq!(ssq.game, Game::Ssq);
        assert_eq!(ssq.bet, slip.bet);
    }

    #[test]
    fn test_validate_single_line_sizes() {
        let ssq_line = Bet::Single(vec![ZonePair::new(nums("01 02 03 04 05 06"), nums("07"))]);
        assert!(ssq_line.validate(Game::Ssq).is_ok());
        assert!(matches!(ssq_line.validate(Game::Cjdlt), Err(CheckError::MissingInfo(_))));

        let short = Bet::Single(vec![ZonePair::new(nums("01"), nums("02"))]);
        assert!(short.validate(Game::Ssq).is_err());
        assert!(Bet::Single(vec![]).validate(Game::Ssq).is_err());
    }

    #[test]
    fn test_validate_compound_zones() {
        let full = Bet::Compound(ZonePair::new(nums("01 02 03 04 05 06 07"), nums("08")));
        assert!(full.validate(Game::Ssq).is_ok());
        // Fine for SSQ, but a CJDLT compound needs two back numbers
        assert!(full.validate(Game::Cjdlt).is_err());

        let no_blue = Bet::Compound(ZonePair::new(nums("01 02 03 04 05 06 07 08"), vec![]));
        assert!(matches!(no_blue.validate(Game::Ssq), Err(CheckError::MissingInfo(_))));

        let one_line = Bet::Compound(ZonePair::new(nums("01 02 03 04 05 06"), nums("07")));
        assert!(one_line.validate(Game::Ssq).is_err());
    }

    #[test]
    fn test_validate_complex_zones() {
        let dantuo = DanTuo {
            red_required: nums("01 02"),
            red_optional: nums("03 04 05 06"),
            blue_required: vec![],
            blue_optional: nums("07 08"),
        };
        assert!(Bet::Complex(dantuo.clone()).validate(Game::Ssq).is_ok());

        let no_floats = DanTuo { red_optional: vec![], red_required: nums("01 02 03 04 05 06 07"), ..dantuo.clone() };
        assert!(Bet::Complex(no_floats).validate(Game::Ssq).is_err());

        let anchored = DanTuo { blue_required: nums("09"), ..dantuo.clone() };
        assert!(matches!(Bet::Complex(anchored.clone()).validate(Game::Ssq), Err(CheckError::MalformedSlip(_))));
        assert!(Bet::Complex(anchored).validate(Game::Cjdlt).is_ok());

        let too_small = DanTuo { blue_optional: nums("07"), red_optional: nums("03 04 05"), ..dantuo };
        assert!(Bet::Complex(too_small).validate(Game::Ssq).is_err());
    }

    #[test]
    fn test_bet_serialization() {
        let bet = Bet::Compound(ZonePair::new(nums("01"), nums("02")));
        let json = serde_json::to_string(&bet).unwrap();
        assert_eq!(json, r#"{"compound":{"red":["01"],"blue":["02"]}}"#);
        let back: Bet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bet);
    }
}
