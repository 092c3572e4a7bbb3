//! Bet slip parser
//!
//! Turns the ordered OCR text lines of a ticket into a [`SlipNumbers`].
//! The first line decides the layout:
//! - an enumeration marker (`A`, `1)`) means single lines,
//! - an anchor label (`红胆`, `前区胆`) means complex (dantuo),
//! - a zone label (`红复`, `前区`, ...) means compound,
//! - anything else is treated as free text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::numbers::{extract_and_pad, extract_numbers};
use super::{Bet, BetSlip, DanTuo, Game, SlipNumbers, Zone, ZonePair};
use crate::error::{CheckError, CheckResult};

static SINGLE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:A|\(?1\))").expect("valid single-start pattern"));

/// Leading pick marker: one letter, or an ordinal such as `2)` / `(2)`
static PICK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[A-Za-z]|\(?\d{1,2}\))").expect("valid marker pattern"));

/// Trailing multiplier (`*3`) or any parenthesized span
static MULTIPLIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\d+$|\([^)]*\)").expect("valid multiplier pattern"));

const MULTIPLIER_LABEL: &str = "倍数";

const SEPARATORS: [char; 3] = ['-', '+', '*'];

/// What a labeled line means to the zone state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Start(Zone),
    Multiplier,
}

const COMPLEX_LABELS: &[(&str, LineKind)] = &[
    ("红胆", LineKind::Start(Zone::RedRequired)),
    ("前区胆", LineKind::Start(Zone::RedRequired)),
    ("红拖", LineKind::Start(Zone::RedOptional)),
    ("前区拖", LineKind::Start(Zone::RedOptional)),
    ("后区胆", LineKind::Start(Zone::BlueRequired)),
    ("蓝单", LineKind::Start(Zone::BlueOptional)),
    ("后区拖", LineKind::Start(Zone::BlueOptional)),
    ("蓝复", LineKind::Start(Zone::BlueOptional)),
    (MULTIPLIER_LABEL, LineKind::Multiplier),
];

const COMPOUND_LABELS: &[(&str, LineKind)] = &[
    ("前区", LineKind::Start(Zone::Red)),
    ("红区", LineKind::Start(Zone::Red)),
    ("红单", LineKind::Start(Zone::Red)),
    ("红复", LineKind::Start(Zone::Red)),
    ("后区", LineKind::Start(Zone::Blue)),
    ("蓝区", LineKind::Start(Zone::Blue)),
    ("蓝单", LineKind::Start(Zone::Blue)),
    ("蓝复", LineKind::Start(Zone::Blue)),
    (MULTIPLIER_LABEL, LineKind::Multiplier),
];

fn classify(line: &str, labels: &[(&str, LineKind)]) -> Option<LineKind> {
    labels
        .iter()
        .find(|(label, _)| line.starts_with(label))
        .map(|(_, kind)| *kind)
}

/// Zone currently receiving unlabeled continuation lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneCursor {
    Idle,
    Filling(Zone),
}

/// Per-zone number buffers filled line by line
#[derive(Debug, Default)]
struct ZoneBuffers {
    red: Vec<String>,
    blue: Vec<String>,
    red_required: Vec<String>,
    red_optional: Vec<String>,
    blue_required: Vec<String>,
    blue_optional: Vec<String>,
}

impl ZoneBuffers {
    fn slot(&mut self, zone: Zone) -> &mut Vec<String> {
        match zone {
            Zone::Red => &mut self.red,
            Zone::Blue => &mut self.blue,
            Zone::RedRequired => &mut self.red_required,
            Zone::RedOptional => &mut self.red_optional,
            Zone::BlueRequired => &mut self.blue_required,
            Zone::BlueOptional => &mut self.blue_optional,
        }
    }

    /// Run the labeled-zone state machine over all lines
    fn collect<S: AsRef<str>>(game: Game, lines: &[S], labels: &[(&str, LineKind)]) -> CheckResult<Self> {
        let mut buffers = ZoneBuffers::default();
        let mut cursor = ZoneCursor::Idle;

        for line in lines {
            let line = line.as_ref().trim();
            match (classify(line, labels), cursor) {
                (Some(LineKind::Multiplier), _) => continue,
                (Some(LineKind::Start(Zone::BlueRequired)), _) if !game.has_blue_anchor() => {
                    return Err(CheckError::MalformedSlip(format!(
                        "{} has no blue anchor zone: {:?}",
                        game, line
                    )));
                }
                (Some(LineKind::Start(zone)), _) => {
                    *buffers.slot(zone) = extract_and_pad(line);
                    cursor = ZoneCursor::Filling(zone);
                }
                (None, ZoneCursor::Filling(zone)) => {
                    buffers.slot(zone).extend(extract_and_pad(line));
                }
                (None, ZoneCursor::Idle) => {
                    return Err(CheckError::MalformedSlip(format!(
                        "continuation line before any zone label: {:?}",
                        line
                    )));
                }
            }
        }

        Ok(buffers)
    }
}

/// Parses OCR lines for one game
#[derive(Debug, Clone, Copy)]
pub struct BetSlipParser {
    game: Game,
}

impl BetSlipParser {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// Parse the issue text and the number lines into a full slip
    pub fn parse_slip<S: AsRef<str>>(&self, issue_text: &str, lines: &[S]) -> CheckResult<BetSlip> {
        let issue = parse_issue(issue_text)?;
        let numbers = self.parse(lines)?;
        Ok(BetSlip::new(self.game, issue, numbers.bet))
    }

    /// Classify the lines by their first line and parse the numbers
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> CheckResult<SlipNumbers> {
        let first_line = lines
            .first()
            .map(|l| l.as_ref().trim())
            .ok_or_else(|| CheckError::MalformedSlip("no text lines recognized".to_string()))?;

        let bet = if SINGLE_START.is_match(first_line) {
            debug!("Parsing {} slip as single lines", self.game);
            self.parse_single(lines)?
        } else if classify(first_line, COMPLEX_LABELS)
            .is_some_and(|kind| kind == LineKind::Start(Zone::RedRequired))
        {
            debug!("Parsing {} slip as complex", self.game);
            self.parse_complex(lines)?
        } else if classify(first_line, COMPOUND_LABELS)
            .is_some_and(|kind| kind == LineKind::Start(Zone::Red))
        {
            debug!("Parsing {} slip as compound", self.game);
            self.parse_compound(lines)?
        } else {
            debug!("Parsing {} slip as free text", self.game);
            self.parse_free_text(lines)?
        };

        debug!("Parsed {:?} slip with {} pick(s)", bet.play_style(), bet.pick_count());
        Ok(SlipNumbers { bet })
    }

    fn parse_single<S: AsRef<str>>(&self, lines: &[S]) -> CheckResult<Bet> {
        let mut picks = Vec::with_capacity(lines.len());
        for line in lines {
            let body = PICK_MARKER.replace(line.as_ref(), "");
            let tokens = extract_and_pad(&body);
            if tokens.len() < self.game.line_size() {
                return Err(CheckError::MissingInfo(format!(
                    "single line {:?} has {} numbers, need {}",
                    line.as_ref(),
                    tokens.len(),
                    self.game.line_size()
                )));
            }
            picks.push(self.game.split_line(&tokens)?);
        }
        Ok(Bet::Single(picks))
    }

    fn parse_complex<S: AsRef<str>>(&self, lines: &[S]) -> CheckResult<Bet> {
        let buffers = ZoneBuffers::collect(self.game, lines, COMPLEX_LABELS)?;
        let dantuo = DanTuo {
            red_required: buffers.red_required,
            red_optional: buffers.red_optional,
            blue_required: buffers.blue_required,
            blue_optional: buffers.blue_optional,
        };
        let bet = Bet::Complex(dantuo);
        bet.validate(self.game)?;
        Ok(bet)
    }

    fn parse_compound<S: AsRef<str>>(&self, lines: &[S]) -> CheckResult<Bet> {
        let buffers = ZoneBuffers::collect(self.game, lines, COMPOUND_LABELS)?;
        let bet = Bet::Compound(ZonePair::new(buffers.red, buffers.blue));
        bet.validate(self.game)?;
        Ok(bet)
    }

    fn parse_free_text<S: AsRef<str>>(&self, lines: &[S]) -> CheckResult<Bet> {
        let joined = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .collect::<Vec<_>>()
            .join(" ");
        let line = MULTIPLIER.replace_all(joined.trim(), "").into_owned();
        let tokens = extract_and_pad(&line);

        let size = self.game.line_size();
        if tokens.len() < size {
            return Err(CheckError::MissingInfo(format!(
                "free text has {} numbers, need at least {}",
                tokens.len(),
                size
            )));
        }
        if tokens.len() == size {
            return Ok(Bet::Single(vec![self.game.split_line(&tokens)?]));
        }

        let candidates: Vec<char> = SEPARATORS
            .into_iter()
            .filter(|sep| line.matches(*sep).count() == 1)
            .collect();
        let separator = match candidates.as_slice() {
            [only] => *only,
            _ => return Err(CheckError::SeparatorNotFound { candidates }),
        };
        let (red_half, blue_half) = line
            .split_once(separator)
            .ok_or(CheckError::SeparatorNotFound { candidates: vec![] })?;

        // A separator at either edge leaves one zone empty
        let bet = Bet::Compound(ZonePair::new(
            extract_and_pad(red_half),
            extract_and_pad(blue_half),
        ));
        bet.validate(self.game)?;
        Ok(bet)
    }
}

/// Extract the issue number; exactly one digit run must be present
pub fn parse_issue(text: &str) -> CheckResult<String> {
    let mut runs = extract_numbers(text);
    if runs.len() != 1 {
        return Err(CheckError::IssueAmbiguous(text.to_string()));
    }
    Ok(runs.remove(0))
}
