//! Plain-text rendering of a result bridge

use crate::bridge::{ResultBridge, HIT_COLUMN, VALUE_COLUMN};

/// One line per bridge row: `label: value`, then the hit count if known
pub fn render(bridge: &ResultBridge) -> String {
    let mut out = String::new();
    for row in 0..bridge.row_count() {
        let label = bridge.row_label(row).unwrap_or_default();
        let value = bridge.get_cell(row, VALUE_COLUMN);
        let hits = bridge.get_cell(row, HIT_COLUMN);

        out.push_str(&format!("[{}] {}: {}", row, label, value));
        if !hits.is_empty() {
            out.push_str(&format!("  ({})", hits));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::{Bet, BetSlip, Game, ZonePair};

    #[test]
    fn test_render_pre_check() {
        let slip = BetSlip::new(
            Game::Cjdlt,
            "23001",
            Bet::Single(vec![ZonePair::new(
                vec!["01".into(), "02".into(), "03".into(), "04".into(), "05".into()],
                vec!["06".into(), "07".into()],
            )]),
        );
        let text = render(&ResultBridge::from_slip(slip));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "[0] 彩票类型: 超级大乐透");
        assert_eq!(lines[4], "[4] ①: 01 02 03 04 05 + 06 07");
    }
}
