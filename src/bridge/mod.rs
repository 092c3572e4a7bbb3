//! Result Bridge
//!
//! Editable two-column table over a bet slip and, once checked, its winning
//! numbers and hits. Rows 0-3 are fixed headers (game, issue, winning
//! numbers, play style); the remaining rows are one per pick, or one per
//! anchor/float zone for complex slips. Column 0 holds the value, column 1
//! the hit count.
//!
//! Every write is validated; a rejected write leaves the bridge untouched.

use tracing::{debug, warn};

use crate::check::HitRecord;
use crate::draw::WinningRecord;
use crate::slip::numbers::{is_all_digits, pad};
use crate::slip::{Bet, BetSlip, DanTuo, Game, PlayStyle, QueryTuple, SlipNumbers, Zone};

/// Labels of the fixed header rows
pub const FIXED_HEADERS: [&str; 4] = ["彩票类型", "开奖期", "开奖号码", "玩法"];

pub const VALUE_COLUMN: usize = 0;
pub const HIT_COLUMN: usize = 1;
pub const COLUMN_COUNT: usize = 2;

const PICK_GLYPHS: [&str; 10] = ["①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩"];

/// Shown in the winning-numbers row before a check
pub const WINNING_PENDING: &str = "未查询";

/// What a table row displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTarget {
    Game,
    Issue,
    Winning,
    PlayStyle,
    /// A single or compound pick
    Pick(usize),
    /// One zone of the complex pick
    Zone(Zone),
}

/// Editable view over one slip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBridge {
    slip: BetSlip,
    winning: Option<WinningRecord>,
    hits: Option<Vec<HitRecord>>,
}

impl ResultBridge {
    /// Pre-check bridge from a query tuple
    pub fn from_query(tuple: QueryTuple) -> Self {
        Self::from_slip(BetSlip::from_query_tuple(tuple))
    }

    /// Pre-check bridge over a parsed slip
    pub fn from_slip(slip: BetSlip) -> Self {
        Self {
            slip,
            winning: None,
            hits: None,
        }
    }

    /// Post-check bridge
    pub fn from_checked(
        game: Game,
        issue: impl Into<String>,
        winning: WinningRecord,
        numbers: SlipNumbers,
        hits: Vec<HitRecord>,
    ) -> Self {
        Self {
            slip: BetSlip::new(game, issue, numbers.bet),
            winning: Some(winning),
            hits: Some(hits),
        }
    }

    /// Game, issue and numbers for re-submission
    pub fn to_query_tuple(&self) -> QueryTuple {
        self.slip.to_query_tuple()
    }

    pub fn slip(&self) -> &BetSlip {
        &self.slip
    }

    pub fn into_slip(self) -> BetSlip {
        self.slip
    }

    pub fn winning(&self) -> Option<&WinningRecord> {
        self.winning.as_ref()
    }

    pub fn hits(&self) -> Option<&[HitRecord]> {
        self.hits.as_deref()
    }

    pub fn row_count(&self) -> usize {
        FIXED_HEADERS.len() + self.body_rows()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    fn body_rows(&self) -> usize {
        match &self.slip.bet {
            Bet::Single(lines) => lines.len(),
            Bet::Compound(_) => 1,
            Bet::Complex(_) => Zone::dantuo_zones(self.slip.game).len(),
        }
    }

    fn target(&self, row: usize) -> Option<RowTarget> {
        let target = match row {
            0 => RowTarget::Game,
            1 => RowTarget::Issue,
            2 => RowTarget::Winning,
            3 => RowTarget::PlayStyle,
            _ => {
                let index = row - FIXED_HEADERS.len();
                if index >= self.body_rows() {
                    return None;
                }
                match self.slip.bet {
                    Bet::Single(_) | Bet::Compound(_) => RowTarget::Pick(index),
                    // SSQ skips the blue anchor row
                    Bet::Complex(_) => RowTarget::Zone(Zone::dantuo_zones(self.slip.game)[index]),
                }
            }
        };
        Some(target)
    }

    /// Row header text
    pub fn row_label(&self, row: usize) -> Option<String> {
        let label = match self.target(row)? {
            RowTarget::Game | RowTarget::Issue | RowTarget::Winning | RowTarget::PlayStyle => {
                FIXED_HEADERS[row].to_string()
            }
            RowTarget::Pick(index) => PICK_GLYPHS
                .get(index)
                .map(|g| g.to_string())
                .unwrap_or_else(|| format!("({})", index + 1)),
            RowTarget::Zone(zone) => self.zone_label(zone).to_string(),
        };
        Some(label)
    }

    fn zone_label(&self, zone: Zone) -> &'static str {
        match (self.slip.game, zone) {
            (Game::Ssq, Zone::RedRequired) => "红胆",
            (Game::Ssq, Zone::RedOptional) => "红拖",
            (Game::Ssq, _) => match &self.slip.bet {
                Bet::Complex(d) if d.blue_optional.len() == 1 => "蓝单",
                _ => "蓝复",
            },
            (Game::Cjdlt, Zone::RedRequired) => "前区胆",
            (Game::Cjdlt, Zone::RedOptional) => "前区拖",
            (Game::Cjdlt, Zone::BlueRequired) => "后区胆",
            (Game::Cjdlt, _) => "后区拖",
        }
    }

    /// Text of one cell; empty when the cell has nothing to show
    pub fn get_cell(&self, row: usize, col: usize) -> String {
        let Some(target) = self.target(row) else {
            return String::new();
        };
        match col {
            VALUE_COLUMN => self.value_text(target),
            HIT_COLUMN => self.hit_text(target).unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn value_text(&self, target: RowTarget) -> String {
        match target {
            RowTarget::Game => self.slip.game.display_label().to_string(),
            RowTarget::Issue => self.slip.issue.clone(),
            RowTarget::Winning => self
                .winning
                .as_ref()
                .map(WinningRecord::display)
                .unwrap_or_else(|| WINNING_PENDING.to_string()),
            RowTarget::PlayStyle => self.slip.play_style().label().to_string(),
            RowTarget::Pick(index) => {
                let pair = match &self.slip.bet {
                    Bet::Single(lines) => lines.get(index),
                    Bet::Compound(pair) => Some(pair),
                    Bet::Complex(_) => None,
                };
                pair.map(|p| join_pair(&p.red, &p.blue)).unwrap_or_default()
            }
            RowTarget::Zone(zone) => match &self.slip.bet {
                Bet::Complex(dantuo) => dantuo.zone(zone).map(|n| n.join(" ")).unwrap_or_default(),
                Bet::Single(_) | Bet::Compound(_) => String::new(),
            },
        }
    }

    fn hit_text(&self, target: RowTarget) -> Option<String> {
        let hits = self.hits.as_ref()?;
        match target {
            RowTarget::Pick(index) => match hits.get(index)? {
                HitRecord::Line(pair) => Some(format!("中{} + {}", pair.red.len(), pair.blue.len())),
                HitRecord::DanTuo(_) => None,
            },
            RowTarget::Zone(zone) => match hits.first()? {
                HitRecord::DanTuo(dantuo) => dantuo.zone(zone).map(|n| format!("中{}", n.len())),
                HitRecord::Line(_) => None,
            },
            RowTarget::Game | RowTarget::Issue | RowTarget::Winning | RowTarget::PlayStyle => None,
        }
    }

    /// Validate and apply an edit to column 0. Returns false, leaving the
    /// bridge unchanged, when the edit is rejected.
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> bool {
        if col != VALUE_COLUMN {
            return false;
        }
        let Some(target) = self.target(row) else {
            return false;
        };
        let text = text.trim();

        let applied = match target {
            RowTarget::Game => self.set_game(text),
            RowTarget::Issue => self.set_issue(text),
            RowTarget::Winning | RowTarget::PlayStyle => false,
            RowTarget::Pick(index) => self.set_pick(index, text),
            RowTarget::Zone(zone) => self.set_zone(zone, text),
        };

        if applied {
            debug!("Row {} set to {:?}", row, text);
        } else {
            warn!("Rejected edit of row {}: {:?}", row, text);
        }
        applied
    }

    fn set_game(&mut self, text: &str) -> bool {
        let Some(game) = Game::from_display_label(text) else {
            return false;
        };
        if game == self.slip.game {
            return true;
        }
        let mut edited = self.slip.clone();
        edited.game = game;
        if !self.commit(edited) {
            return false;
        }
        self.invalidate_check();
        true
    }

    fn set_issue(&mut self, text: &str) -> bool {
        if !is_all_digits(text) {
            return false;
        }
        if text != self.slip.issue {
            self.slip.issue = text.to_string();
            self.invalidate_check();
        }
        true
    }

    fn set_pick(&mut self, index: usize, text: &str) -> bool {
        let Some((red, blue)) = text.split_once('+') else {
            return false;
        };
        if blue.contains('+') {
            return false;
        }
        let (Some(red), Some(blue)) = (digit_tokens(red), digit_tokens(blue)) else {
            return false;
        };
        let mut edited = self.slip.clone();
        if edited.replace_pick(index, red, blue).is_err() || !self.commit(edited) {
            return false;
        }
        self.hits = None;
        true
    }

    fn set_zone(&mut self, zone: Zone, text: &str) -> bool {
        let Some(values) = digit_tokens(text) else {
            return false;
        };
        let mut edited = self.slip.clone();
        if edited.replace_zone(0, zone, values).is_err() || !self.commit(edited) {
            return false;
        }
        self.hits = None;
        true
    }

    /// Keep `edited` only if its picks still fit its game
    fn commit(&mut self, edited: BetSlip) -> bool {
        if let Err(e) = edited.bet.validate(edited.game) {
            debug!("Edited slip rejected: {}", e);
            return false;
        }
        self.slip = edited;
        true
    }

    /// Game or issue changed, so the fetched draw no longer applies
    fn invalidate_check(&mut self) {
        self.winning = None;
        self.hits = None;
    }

    /// Play style shown in row 3
    pub fn play_style(&self) -> PlayStyle {
        self.slip.play_style()
    }

    /// Complex pick, if this bridge shows one
    pub fn dantuo(&self) -> Option<&DanTuo> {
        match &self.slip.bet {
            Bet::Complex(d) => Some(d),
            Bet::Single(_) | Bet::Compound(_) => None,
        }
    }
}

fn join_pair(red: &[String], blue: &[String]) -> String {
    let mut parts: Vec<&str> = red.iter().map(String::as_str).collect();
    parts.push("+");
    parts.extend(blue.iter().map(String::as_str));
    parts.join(" ")
}

/// Whitespace-separated all-digit tokens, padded; None if any token is not numeric
fn digit_tokens(text: &str) -> Option<Vec<String>> {
    text.split_whitespace()
        .map(|t| is_all_digits(t).then(|| pad(t)))
        .collect()
}
