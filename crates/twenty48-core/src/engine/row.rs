use super::state::{Line, Score, Tile, MAX_TILE};

/// Outcome of reducing a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowReduction {
    pub line: Line,
    /// Sum of the values produced by merges in this line.
    pub gained: Score,
}

/// Compact and merge one line toward its trailing end (index 3).
///
/// Zeros are dropped, then pairs are resolved from the back: when
/// `line[i] == line[i - 1]` the tile at `i` doubles, the one before it is
/// removed, and the scan skips past the merged tile so it cannot merge again
/// in the same move. Tiles at [`MAX_TILE`](crate::MAX_TILE) never merge. The
/// result is left-padded with zeros.
///
/// ```
/// use twenty48_core::reduce_row;
/// let r = reduce_row([2, 2, 2, 0]);
/// assert_eq!(r.line, [0, 0, 2, 4]);
/// assert_eq!(r.gained, 4);
/// ```
pub fn reduce_row(line: Line) -> RowReduction {
    let mut tiles: Line = [0; 4];
    let mut len = 0;
    for &t in line.iter().filter(|&&t| t != 0) {
        tiles[len] = t;
        len += 1;
    }

    let mut gained: Score = 0;
    let mut idx = len.saturating_sub(1);
    while idx > 0 {
        if tiles[idx] == tiles[idx - 1] && tiles[idx] < MAX_TILE {
            let merged: Tile = tiles[idx] * 2;
            gained += Score::from(merged);
            tiles[idx - 1] = merged;
            tiles.copy_within(idx + 1..len, idx);
            len -= 1;
            // The merged tile now sits at idx - 1; resume below it.
            idx = idx.saturating_sub(2);
        } else {
            idx -= 1;
        }
    }

    let mut out: Line = [0; 4];
    out[4 - len..].copy_from_slice(&tiles[..len]);
    RowReduction { line: out, gained }
}

/// Reduce toward index 0 by mirroring the line around the trailing reducer.
pub(crate) fn reduce_row_reversed(mut line: Line) -> RowReduction {
    line.reverse();
    let mut reduced = reduce_row(line);
    reduced.line.reverse();
    reduced
}
