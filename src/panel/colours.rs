use rustc_hash::FxHashMap;

use crate::models::{AsmLine, Colour};

/// Projects per-source-line colours onto assembly display indices. Lines
/// without an originating source line stay uncoloured. Pure; a mapping that
/// is stale relative to the assembly just yields partial or empty output.
pub fn asm_colours(
    assembly: &[AsmLine],
    source_colours: &FxHashMap<u32, Colour>,
) -> Vec<(usize, Colour)> {
    assembly
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let source = line.source_line?;
            source_colours.get(&source).map(|colour| (index, *colour))
        })
        .collect()
}
