//! Property tests for global verse numbering

use proptest::prelude::*;
use tilawa_core::{Catalog, TilawaError, VerseOffsets, CHAPTER_COUNT};

fn counts_strategy() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(1u16..=300, usize::from(CHAPTER_COUNT))
}

proptest! {
    #[test]
    fn offsets_are_prefix_sums(counts in counts_strategy()) {
        let offsets = VerseOffsets::from_counts(&counts).unwrap();

        prop_assert_eq!(offsets.offset(1).unwrap(), 1);
        for n in 1..CHAPTER_COUNT {
            let current = offsets.offset(n).unwrap();
            let next = offsets.offset(n + 1).unwrap();
            prop_assert_eq!(next, current + u32::from(counts[usize::from(n) - 1]));
        }

        let sum: u32 = counts.iter().map(|&c| u32::from(c)).sum();
        prop_assert_eq!(offsets.total_verses(), sum);
    }

    #[test]
    fn out_of_range_chapters_are_rejected(n in 115u16..) {
        let catalog = Catalog::builtin().unwrap();
        let result = catalog.global_verse_offset(n);
        prop_assert!(matches!(result, Err(TilawaError::InvalidChapterNumber(got)) if got == n));
    }
}

#[test]
fn builtin_offsets_cover_the_whole_book() {
    let catalog = Catalog::builtin().unwrap();
    let last = catalog.chapter(114).unwrap();
    let end = catalog.global_verse_offset(114).unwrap() + u32::from(last.verse_count) - 1;
    assert_eq!(end, catalog.verse_offsets().total_verses());
    assert!(matches!(
        catalog.global_verse_offset(0),
        Err(TilawaError::InvalidChapterNumber(0))
    ));
}
