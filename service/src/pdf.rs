use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Point};
use rust_decimal::Decimal;

use crate::error::ServiceError;
use crate::query::QuotationContents;
use crate::util::sanitize_filename;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

/// Attachment and download name for a quotation document:
/// `quotation_{id}_{first}_{last}.pdf` with the name parts sanitized,
/// so raw customer text never reaches a header.
pub fn quotation_filename(contents: &QuotationContents) -> String {
    sanitize_filename(&format!(
        "quotation_{}_{}_{}.pdf",
        contents.quotation.id, contents.customer.first_name, contents.customer.last_name
    ))
}

/// Draws the quotation document and returns the PDF bytes.
pub fn render_quotation_pdf(contents: &QuotationContents) -> Result<Vec<u8>, ServiceError> {
    let quotation = &contents.quotation;
    let customer = &contents.customer;

    let (doc, page, first_layer) = PdfDocument::new(
        format!("Quotation {}", quotation.id),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_err)?;

    let mut layer = doc.get_page(page).get_layer(first_layer);
    let mut y: f32 = PAGE_HEIGHT - 15.0;

    text(
        &layer,
        &bold,
        &format!("Quotation #{}", quotation.id),
        16.0,
        MARGIN,
        y,
    );
    y -= 6.0;
    text(
        &layer,
        &regular,
        &format!("Date: {}", quotation.date.format("%Y-%m-%d %H:%M")),
        10.0,
        MARGIN,
        y,
    );
    y -= 10.0;

    text(&layer, &bold, &customer.business, 12.0, MARGIN, y);
    y -= 5.0;
    text(
        &layer,
        &regular,
        &format!("SIREN: {}", customer.siren),
        10.0,
        MARGIN,
        y,
    );
    y -= 5.0;
    text(&layer, &regular, &customer.address, 10.0, MARGIN, y);
    y -= 5.0;
    text(
        &layer,
        &regular,
        &format!("{} {}", customer.zipcode, customer.city),
        10.0,
        MARGIN,
        y,
    );
    if let Some(country) = &customer.country {
        y -= 5.0;
        text(&layer, &regular, country, 10.0, MARGIN, y);
    }
    y -= 5.0;
    text(
        &layer,
        &regular,
        &format!(
            "Attn: {} {} <{}>",
            customer.first_name, customer.last_name, customer.email
        ),
        10.0,
        MARGIN,
        y,
    );
    y -= 12.0;

    table_header(&layer, &bold, y);
    y -= 2.0;
    rule(&layer, y);
    y -= 6.0;

    for (line, product) in &contents.lines {
        if y < 30.0 {
            let (page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(next_layer);
            y = PAGE_HEIGHT - 20.0;
            table_header(&layer, &bold, y);
            y -= 2.0;
            rule(&layer, y);
            y -= 6.0;
        }
        let line_total = Decimal::from(line.quantity) * product.price;
        text(&layer, &regular, &product.code, 10.0, MARGIN, y);
        text(&layer, &regular, &clip(&product.name, 40), 10.0, 45.0, y);
        text(&layer, &regular, &line.quantity.to_string(), 10.0, 125.0, y);
        text(
            &layer,
            &regular,
            &format!("{:.2}", product.price),
            10.0,
            145.0,
            y,
        );
        text(&layer, &regular, &format!("{line_total:.2}"), 10.0, 175.0, y);
        y -= 6.0;
    }

    rule(&layer, y + 2.0);
    y -= 4.0;

    let totals = contents.totals();
    text(&layer, &regular, "Total", 11.0, 145.0, y);
    text(
        &layer,
        &regular,
        &format!("{:.2}", totals.total),
        11.0,
        175.0,
        y,
    );
    y -= 6.0;
    text(&layer, &bold, "Total incl. tax", 11.0, 145.0, y);
    text(
        &layer,
        &bold,
        &format!("{:.2}", totals.tax_inclusive),
        11.0,
        175.0,
        y,
    );

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(render_err)?;
    writer.into_inner().map_err(render_err)
}

fn table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    text(layer, bold, "Code", 10.0, MARGIN, y);
    text(layer, bold, "Product", 10.0, 45.0, y);
    text(layer, bold, "Qty", 10.0, 125.0, y);
    text(layer, bold, "Unit price", 10.0, 145.0, y);
    text(layer, bold, "Line total", 10.0, 175.0, y);
}

fn text(layer: &PdfLayerReference, font: &IndirectFontRef, value: &str, size: f32, x: f32, y: f32) {
    layer.use_text(value, size, Mm(x), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_owned()
    } else {
        let mut clipped: String = value.chars().take(max.saturating_sub(3)).collect();
        clipped.push_str("...");
        clipped
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> ServiceError {
    ServiceError::Render(err.to_string())
}
