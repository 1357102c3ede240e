use super::layout::{Document, Font, Item, Rgb, PAGE_HEIGHT_MM};
use super::metrics::MM_PER_PT;
use anyhow::Context;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream, StringFormat};

const MEDIA_WIDTH_PT: i64 = 595;
const MEDIA_HEIGHT_PT: i64 = 842;

fn pt(mm: f32) -> Object {
    Object::Real((mm / MM_PER_PT).into())
}

fn pdf_y(mm_from_top: f32) -> Object {
    pt(PAGE_HEIGHT_MM - mm_from_top)
}

fn unit(c: u8) -> Object {
    Object::Real((c as f32 / 255.0).into())
}

fn color_op(op: &str, Rgb(r, g, b): Rgb) -> Operation {
    Operation::new(op, vec![unit(r), unit(g), unit(b)])
}

fn font_name(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
    }
}

/// Maps text onto WinAnsiEncoding. Characters outside it become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn page_operations(items: &[Item]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for item in items {
        match item {
            Item::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ops.push(color_op("rg", *color));
                ops.push(Operation::new(
                    "re",
                    vec![pt(*x), pdf_y(y + height), pt(*width), pt(*height)],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            Item::StrokeRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ops.push(color_op("RG", *color));
                ops.push(Operation::new("w", vec![Object::Real(0.5f32.into())]));
                ops.push(Operation::new(
                    "re",
                    vec![pt(*x), pdf_y(y + height), pt(*width), pt(*height)],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            Item::Text {
                x,
                y,
                size,
                font,
                color,
                content,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(color_op("rg", *color));
                ops.push(Operation::new(
                    "Tf",
                    vec![font_name(*font).into(), Object::Real((*size).into())],
                ));
                ops.push(Operation::new("Td", vec![pt(*x), pdf_y(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(win_ansi(content), StringFormat::Hexadecimal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

/// Serializes a laid-out document to PDF bytes with the standard Helvetica
/// faces.
pub fn render_pdf(document: &Document) -> anyhow::Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids = Vec::with_capacity(document.pages.len());
    for (index, page) in document.pages.iter().enumerate() {
        let content = Content {
            operations: page_operations(&page.items),
        };
        let encoded = content
            .encode()
            .with_context(|| format!("failed to encode content stream for page {}", index + 1))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(MEDIA_WIDTH_PT),
                Object::Integer(MEDIA_HEIGHT_PT),
            ],
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes).context("failed to write pdf")?;
    Ok(bytes)
}
