//! Plain-text rendering of games and blocks.

use hm_02_envelope_builder::domain::{BatchStatus, BlockSummary};
use hm_shared_types::{Game, GameState, SnapshotLog, MAX_MISSES};
use std::fmt::Write;

pub const SUCCESS: char = '\u{2713}';
pub const FAILURE: char = '\u{2717}';

/// Board view of one snapshot.
pub fn game(game: &Game) -> String {
    let misses: Vec<String> = game.misses.iter().map(String::from).collect();
    let state = match game.state {
        GameState::Ongoing => "KEEP GOING ;-)",
        GameState::Won => "YOU WON :-)",
        GameState::Lost => "GAME OVER :-(",
    };
    format!(
        "Game:\t{}\nWord:\t{}\nMisses:\t{} ({}/{})\nState:\t{}\n",
        game.name,
        game.masked_word(),
        misses.join(" "),
        game.misses.len(),
        MAX_MISSES,
        state
    )
}

/// One line per snapshot, oldest first.
pub fn history(log: &SnapshotLog) -> String {
    let mut out = String::new();
    for (i, snapshot) in log.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<12} hits={:<10} misses={:<8} {}",
            i,
            snapshot.masked_word(),
            snapshot.hits.as_string(),
            snapshot.misses.as_string(),
            snapshot.state
        );
    }
    out
}

/// Block listing. `limit` is the page size that was requested.
pub fn blocks(blocks: &[BlockSummary], limit: usize) -> String {
    let mut out = String::new();
    let more = if blocks.len() >= limit { "+" } else { "" };
    let _ = writeln!(out, "Number of blocks: {}{}", blocks.len(), more);
    for block in blocks {
        let _ = writeln!(out, "{}", "-".repeat(86));
        let _ = writeln!(out, "Block number:      {}", block.block_num);
        let batches: Vec<String> = block
            .batch_sizes
            .iter()
            .enumerate()
            .map(|(i, n)| format!("batch {i}: {n} txn"))
            .collect();
        let _ = writeln!(
            out,
            "Number of batches: {} ({})",
            block.batch_count(),
            batches.join(", ")
        );
        let _ = writeln!(out, "Block id:          ...{}", tail(&block.block_id));
        let _ = writeln!(out, "Previous block id: ...{}", tail(&block.previous_block_id));
    }
    out
}

/// One-line outcome of a submission.
pub fn status(action: &str, name: &str, status: BatchStatus) -> String {
    match status {
        BatchStatus::Committed => format!("{action} '{name}' {SUCCESS}"),
        BatchStatus::Pending => format!("{action} '{name}' submitted, still pending"),
        BatchStatus::Invalid => format!("{action} '{name}' rejected {FAILURE}"),
        BatchStatus::Unknown => format!("{action} '{name}' status unknown {FAILURE}"),
    }
}

/// Last 64 chars of a block id.
fn tail(id: &str) -> &str {
    let start = id.len().saturating_sub(64);
    id.get(start..).unwrap_or(id)
}
