use super::Decklist;
use super::HandError;
use super::HandPositions;
use super::error::Result;

/// Turn deck positions back into card names.
///
/// Position `p` belongs to the first entry whose cumulative count exceeds `p`.
/// Positions come in ascending order, so entries and positions are walked
/// together once. Names come out in position order, not deck order.
pub fn resolve(decklist: &Decklist, positions: &HandPositions) -> Result<Vec<String>> {
    let mut entries = decklist.entries().iter();
    let mut current = None;
    // Exclusive upper bound of `current`.
    let mut upper = 0;
    let mut names = Vec::with_capacity(positions.len());
    for position in positions.iter() {
        while position >= upper {
            let entry = entries.next().ok_or_else(|| HandError::InvalidRequest(
                format!("position {} lies beyond a deck of {} cards", position, decklist.total_count())
            ))?;
            // Decklist totals never overflow, so saturating keeps the bound exact.
            upper = upper.saturating_add(entry.count);
            current = Some(entry);
        }
        let entry = current.ok_or_else(|| HandError::InvalidRequest(format!("position {} resolves to no card", position)))?;
        names.push(entry.name.clone());
    }
    Ok(names)
}
