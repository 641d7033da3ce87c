//! Scoring module - line clear rewards
//!
//! A lock that clears `n` rows is worth `LINE_SCORES[n]` (classic level-0
//! table). Preset boards can hold more than four full rows at once; those
//! clears are scored in groups of four plus the remainder, so the curve stays
//! non-decreasing in `n`.

use crate::types::LINE_SCORES;

/// Rows per full "tetris" group
const GROUP: usize = LINE_SCORES.len() - 1;

/// Score delta for clearing `lines` rows in a single lock
pub fn line_clear_score(lines: usize) -> u32 {
    if lines <= GROUP {
        return LINE_SCORES[lines];
    }
    let groups = (lines / GROUP) as u32;
    LINE_SCORES[GROUP]
        .saturating_mul(groups)
        .saturating_add(LINE_SCORES[lines % GROUP])
}
