//! Physical post-processing: page resize and bleed extension.
//!
//! Both operations work the same way: wrap the page content in a
//! `q ... cm ... Q` transform and set the MediaBox to the new frame.
//! Resize scales X and Y independently, so content is stretched when
//! the source aspect ratio differs from the target; that matches the
//! production behavior and is deliberate. Bleed over-scales the
//! content uniformly past the trim line and re-centers it, rather
//! than padding with blank margin.

use crate::constants::MM_TO_PT;
use crate::error::{CardpressError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

struct PageTransform {
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
    new_width: f64,
    new_height: f64,
}

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * MM_TO_PT
}

/// Scale every page's content and frame to the target dimensions.
///
/// A target equal to the current page size is an identity transform.
pub fn resize_pages(pdf_bytes: &[u8], width_mm: f64, height_mm: f64) -> Result<Vec<u8>> {
    let target_width = mm_to_pt(width_mm);
    let target_height = mm_to_pt(height_mm);

    transform_pages(pdf_bytes, |width, height| PageTransform {
        scale_x: target_width / width,
        scale_y: target_height / height,
        translate_x: 0.0,
        translate_y: 0.0,
        new_width: target_width,
        new_height: target_height,
    })
}

/// Extend every page by `bleed_mm` on each side, over-scaling and
/// re-centering the content so it reaches past the final trim line.
pub fn add_bleed(pdf_bytes: &[u8], bleed_mm: f64) -> Result<Vec<u8>> {
    let bleed = mm_to_pt(bleed_mm);

    transform_pages(pdf_bytes, |width, height| {
        let new_width = width + 2.0 * bleed;
        let new_height = height + 2.0 * bleed;
        let scale_x = new_width / width;
        let scale_y = new_height / height;
        let scaled_width = width * scale_x;
        let scaled_height = height * scale_y;
        PageTransform {
            scale_x,
            scale_y,
            translate_x: (new_width - scaled_width) / 2.0,
            translate_y: (new_height - scaled_height) / 2.0,
            new_width,
            new_height,
        }
    })
}

/// Page count of an assembled document
pub fn page_count(pdf_bytes: &[u8]) -> Result<u32> {
    let doc = load(pdf_bytes)?;
    Ok(doc.get_pages().len() as u32)
}

fn load(pdf_bytes: &[u8]) -> Result<Document> {
    Document::load_mem(pdf_bytes)
        .map_err(|e| CardpressError::Document(format!("failed to parse PDF: {}", e)))
}

fn transform_pages<F>(pdf_bytes: &[u8], transform_for: F) -> Result<Vec<u8>>
where
    F: Fn(f64, f64) -> PageTransform,
{
    let mut doc = load(pdf_bytes)?;
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    if page_ids.is_empty() {
        return Err(CardpressError::Document("document has no pages".to_string()));
    }

    for page_id in page_ids {
        let (width, height) = page_size(&doc, page_id)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(CardpressError::Document(format!(
                "page has degenerate MediaBox ({} x {})",
                width, height
            )));
        }

        let t = transform_for(width, height);

        let content = doc
            .get_page_content(page_id)
            .map_err(|e| CardpressError::Document(format!("unreadable page content: {}", e)))?;

        let mut wrapped = format!(
            "q\n{:.6} 0 0 {:.6} {:.6} {:.6} cm\n",
            t.scale_x, t.scale_y, t.translate_x, t.translate_y
        )
        .into_bytes();
        wrapped.extend_from_slice(&content);
        wrapped.extend_from_slice(b"\nQ");

        doc.change_page_content(page_id, wrapped)
            .map_err(|e| CardpressError::Document(format!("failed to rewrite page: {}", e)))?;

        let page_dict = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| CardpressError::Document(format!("page is not a dictionary: {}", e)))?;
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(t.new_width as f32),
                Object::Real(t.new_height as f32),
            ]),
        );
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| CardpressError::Document(format!("failed to serialize PDF: {}", e)))?;
    Ok(out)
}

/// Width and height from the page's MediaBox, walking up the Pages
/// tree when the box is inherited
fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f64, f64)> {
    let mut dict = page_dict(doc, page_id)?;

    // Inheritance depth is tiny in practice; the cap guards cycles
    for _ in 0..16 {
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let resolved = resolve(doc, media_box)?;
            return media_box_size(doc, resolved);
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                let resolved = resolve(doc, parent)?;
                dict = resolved.as_dict().map_err(|e| {
                    CardpressError::Document(format!("malformed Pages node: {}", e))
                })?;
            }
            Err(_) => break,
        }
    }

    Err(CardpressError::Document(
        "page has no MediaBox".to_string(),
    ))
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| CardpressError::Document(format!("page is not a dictionary: {}", e)))
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| CardpressError::Document(format!("dangling reference: {}", e))),
        other => Ok(other),
    }
}

fn media_box_size(doc: &Document, media_box: &Object) -> Result<(f64, f64)> {
    let array = media_box
        .as_array()
        .map_err(|e| CardpressError::Document(format!("MediaBox is not an array: {}", e)))?;

    if array.len() != 4 {
        return Err(CardpressError::Document(format!(
            "MediaBox has {} entries, expected 4",
            array.len()
        )));
    }

    let mut values = [0.0f64; 4];
    for (i, entry) in array.iter().enumerate() {
        values[i] = object_as_f64(resolve(doc, entry)?)?;
    }

    Ok((values[2] - values[0], values[3] - values[1]))
}

fn object_as_f64(object: &Object) -> Result<f64> {
    match object {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(*r as f64),
        other => Err(CardpressError::Document(format!(
            "MediaBox entry is not numeric: {:?}",
            other
        ))),
    }
}
