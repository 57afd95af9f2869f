use std::fmt::Display;
use std::io::{self, Write};

/// Identifiers per line in the region file sections.
pub const REGION_IDS_PER_LINE: usize = 10;
/// Identifiers per block for the standard and elevated tiers of the BASIS file.
pub const BASIS_IDS_PER_BLOCK: usize = 8;
/// Identifiers per block for the pseudobond tier of the BASIS file.
pub const PSEUDOBOND_IDS_PER_BLOCK: usize = 12;

/// Joins identifiers with single spaces.
pub fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes `ids` as space-separated lines of at most `width` entries.
///
/// Produces exactly `ceil(len / width)` lines, and nothing at all for an empty list.
///
/// # Panics
///
/// Panics if `width` is zero.
pub fn write_wrapped<T: Display>(
    writer: &mut impl Write,
    ids: &[T],
    width: usize,
) -> io::Result<()> {
    for chunk in ids.chunks(width) {
        writeln!(writer, "{}", join_ids(chunk))?;
    }
    Ok(())
}
