//! Physical page size policy per template kind and region

use crate::types::PageDimensions;
use cardpress_types::{Region, TemplateKind};

/// Square card edge for printed decks, in millimetres
pub const CARD_EDGE_MM: f64 = 60.0;

const A4: PageDimensions = PageDimensions {
    width_mm: 210.0,
    height_mm: 297.0,
    margins_mm: 10.0,
};

const US_LETTER: PageDimensions = PageDimensions {
    width_mm: 215.9,
    height_mm: 279.4,
    margins_mm: 10.0,
};

const CARD: PageDimensions = PageDimensions {
    width_mm: CARD_EDGE_MM,
    height_mm: CARD_EDGE_MM,
    margins_mm: 0.0,
};

/// Map a template kind and region to the target physical page geometry.
///
/// Pure function; the region flag only matters for digital sheets,
/// where it selects the household paper size.
pub fn page_dimensions(kind: TemplateKind, region: Region) -> PageDimensions {
    match kind {
        TemplateKind::Digital | TemplateKind::DigitalUs => match region {
            Region::Eu => A4,
            Region::Us => US_LETTER,
        },
        TemplateKind::SingleSheetPrint | TemplateKind::MultiSheetPrint => CARD,
    }
}
