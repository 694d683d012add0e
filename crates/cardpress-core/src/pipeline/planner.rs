//! Chunk planning: splitting an item collection into page-bounded ranges

use crate::error::{CardpressError, Result};
use crate::types::ChunkPlan;
use cardpress_types::LayoutConstants;

/// Total page count the full collection renders to
pub fn total_pages(total_items: u32, layout: LayoutConstants) -> u32 {
    total_items.div_ceil(layout.items_per_page) * layout.pages_per_item
}

/// Split `[0, total_items)` into chunks of at most `max_pages_per_chunk`
/// rendered pages each.
///
/// Boundaries are computed by walking page offsets in steps of the page
/// ceiling and mapping each offset back to the first item on that page.
/// The resulting ranges are ascending, disjoint and cover every item
/// exactly once.
pub fn plan_chunks(
    total_items: u32,
    layout: LayoutConstants,
    max_pages_per_chunk: u32,
) -> Result<Vec<ChunkPlan>> {
    if total_items == 0 {
        return Err(CardpressError::InvalidJob(
            "total_items must be positive".to_string(),
        ));
    }
    if layout.items_per_page == 0 || layout.pages_per_item == 0 {
        return Err(CardpressError::InvalidJob(
            "layout constants must be positive".to_string(),
        ));
    }
    if max_pages_per_chunk == 0 {
        return Err(CardpressError::InvalidJob(
            "max_pages_per_chunk must be positive".to_string(),
        ));
    }
    // A chunk boundary cannot split a single item's page run
    if max_pages_per_chunk < layout.pages_per_item {
        return Err(CardpressError::InvalidJob(format!(
            "max_pages_per_chunk ({}) is smaller than pages_per_item ({})",
            max_pages_per_chunk, layout.pages_per_item
        )));
    }

    let pages = total_pages(total_items, layout);
    let chunk_count = pages.div_ceil(max_pages_per_chunk);

    let mut chunks = Vec::with_capacity(chunk_count as usize);
    for index in 0..chunk_count {
        let page_offset = index * max_pages_per_chunk;
        let item_start = first_item_on_page(page_offset, layout);

        let item_end = if index + 1 < chunk_count {
            let next_offset = (index + 1) * max_pages_per_chunk;
            first_item_on_page(next_offset, layout) - 1
        } else {
            total_items - 1
        };

        chunks.push(ChunkPlan {
            chunk_index: index,
            item_start,
            item_end,
        });
    }

    Ok(chunks)
}

/// Inverse of the items-to-pages mapping: index of the first item
/// whose pages start at or after the given page offset
fn first_item_on_page(page_offset: u32, layout: LayoutConstants) -> u32 {
    (page_offset / layout.pages_per_item) * layout.items_per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITAL: LayoutConstants = LayoutConstants {
        items_per_page: 6,
        pages_per_item: 1,
    };

    const PRINT: LayoutConstants = LayoutConstants {
        items_per_page: 1,
        pages_per_item: 2,
    };

    fn assert_exact_coverage(chunks: &[ChunkPlan], total_items: u32) {
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].item_start, 0);
        assert_eq!(chunks.last().unwrap().item_end, total_items - 1);
        for window in chunks.windows(2) {
            assert_eq!(
                window[1].item_start,
                window[0].item_end + 1,
                "ranges must be adjacent and ascending"
            );
            assert_eq!(window[1].chunk_index, window[0].chunk_index + 1);
        }
    }

    #[test]
    fn test_600_print_items_make_12_chunks_of_50() {
        let chunks = plan_chunks(600, PRINT, 100).unwrap();
        assert_eq!(chunks.len(), 12);
        for chunk in &chunks {
            assert_eq!(chunk.item_count(), 50);
        }
        assert_exact_coverage(&chunks, 600);
    }

    #[test]
    fn test_1000_digital_items_make_2_chunks() {
        // ceil(1000 / 6) = 167 pages -> chunks of 100 + 67 pages
        let chunks = plan_chunks(1000, DIGITAL, 100).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].item_start, 0);
        assert_eq!(chunks[0].item_end, 599);
        assert_eq!(chunks[1].item_start, 600);
        assert_eq!(chunks[1].item_end, 999);
    }

    #[test]
    fn test_small_collection_is_one_chunk() {
        let chunks = plan_chunks(50, PRINT, 100).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].item_start, 0);
        assert_eq!(chunks[0].item_end, 49);
    }

    #[test]
    fn test_chunk_count_formula() {
        for total_items in [1, 5, 6, 7, 99, 100, 101, 600, 601, 999, 1000, 5000] {
            for (layout, max_pages) in [(DIGITAL, 100), (PRINT, 100), (DIGITAL, 7), (PRINT, 13)] {
                let chunks = plan_chunks(total_items, layout, max_pages).unwrap();
                let pages = total_pages(total_items, layout);
                assert_eq!(
                    chunks.len() as u32,
                    pages.div_ceil(max_pages),
                    "items={} pages={} max={}",
                    total_items,
                    pages,
                    max_pages
                );
                assert_exact_coverage(&chunks, total_items);
            }
        }
    }

    #[test]
    fn test_zero_items_is_invalid() {
        let err = plan_chunks(0, DIGITAL, 100).unwrap_err();
        assert!(matches!(err, CardpressError::InvalidJob(_)));
    }

    #[test]
    fn test_zero_layout_constants_are_invalid() {
        let bad = LayoutConstants {
            items_per_page: 0,
            pages_per_item: 1,
        };
        assert!(plan_chunks(10, bad, 100).is_err());
        assert!(plan_chunks(10, DIGITAL, 0).is_err());
    }

    #[test]
    fn test_ceiling_below_item_span_is_invalid() {
        let err = plan_chunks(10, PRINT, 1).unwrap_err();
        assert!(matches!(err, CardpressError::InvalidJob(_)));
    }
}
