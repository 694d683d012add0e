//! Page resize and bleed behavior over real PDF documents

use cardpress_core::pipeline::postprocess::{add_bleed, mm_to_pt, page_count, resize_pages};
use lopdf::{dictionary, Document, Object, Stream};

/// Minimal multi-page PDF with the given page size in points
fn build_pdf(pages: usize, width: f32, height: f32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 m 10 10 l S".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(width),
                Object::Real(height),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = pages as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("failed to serialize test PDF");
    out
}

fn page_sizes(bytes: &[u8]) -> Vec<(f64, f64)> {
    let doc = Document::load_mem(bytes).unwrap();
    let to_f64 = |o: &Object| match o {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("non-numeric MediaBox entry: {:?}", other),
    };

    doc.get_pages()
        .values()
        .map(|page_id| {
            let dict = doc.get_object(*page_id).unwrap().as_dict().unwrap();
            let array = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            (
                to_f64(&array[2]) - to_f64(&array[0]),
                to_f64(&array[3]) - to_f64(&array[1]),
            )
        })
        .collect()
}

fn first_page_content(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
}

const EPS: f64 = 0.01;

#[test]
fn test_resize_to_current_size_keeps_dimensions() {
    let a4_w = mm_to_pt(210.0) as f32;
    let a4_h = mm_to_pt(297.0) as f32;
    let pdf = build_pdf(3, a4_w, a4_h);

    let resized = resize_pages(&pdf, 210.0, 297.0).unwrap();

    for (w, h) in page_sizes(&resized) {
        assert!((w - a4_w as f64).abs() < EPS);
        assert!((h - a4_h as f64).abs() < EPS);
    }

    // Identity scale factors
    let content = first_page_content(&resized);
    assert!(content.contains("1.000000 0 0 1.000000"), "{}", content);
}

#[test]
fn test_resize_changes_every_page() {
    let pdf = build_pdf(4, 612.0, 792.0);

    let resized = resize_pages(&pdf, 210.0, 297.0).unwrap();

    let sizes = page_sizes(&resized);
    assert_eq!(sizes.len(), 4);
    for (w, h) in sizes {
        assert!((w - mm_to_pt(210.0)).abs() < EPS);
        assert!((h - mm_to_pt(297.0)).abs() < EPS);
    }
}

#[test]
fn test_bleed_grows_pages_by_twice_the_margin() {
    let card = mm_to_pt(60.0) as f32;
    let pdf = build_pdf(2, card, card);

    let with_bleed = add_bleed(&pdf, 3.0).unwrap();

    // 60mm + 2 * 3mm = 66mm square
    let expected = mm_to_pt(66.0);
    for (w, h) in page_sizes(&with_bleed) {
        assert!((w - expected).abs() < EPS, "width {}", w);
        assert!((h - expected).abs() < EPS, "height {}", h);
    }
}

#[test]
fn test_bleed_scales_and_recenters_content() {
    let card = mm_to_pt(60.0) as f32;
    let pdf = build_pdf(1, card, card);

    let with_bleed = add_bleed(&pdf, 3.0).unwrap();
    let content = first_page_content(&with_bleed);

    // Content is over-scaled to the bleed size, so the scaled bounding
    // box fills the new page and the centering translation is zero.
    let scale = mm_to_pt(66.0) / mm_to_pt(60.0);
    assert!(content.contains(&format!("{:.6} 0 0 {:.6} 0.000000 0.000000 cm", scale, scale)));
    assert!(content.trim_start().starts_with('q'));
    assert!(content.trim_end().ends_with('Q'));
}

#[test]
fn test_page_count_reports_all_pages() {
    let pdf = build_pdf(7, 612.0, 792.0);
    assert_eq!(page_count(&pdf).unwrap(), 7);
}

#[test]
fn test_garbage_input_is_a_document_error() {
    let err = add_bleed(b"definitely not a pdf", 3.0).unwrap_err();
    assert!(matches!(err, cardpress_core::CardpressError::Document(_)));
}
