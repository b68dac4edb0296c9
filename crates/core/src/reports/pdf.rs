//! Daily transaction report rendered as an A4 PDF.
#![allow(clippy::float_arithmetic)]

use brilink_shared::types::format_rupiah;
use chrono::{NaiveDate, NaiveDateTime};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use rust_decimal::Decimal;

use super::error::ReportRenderError;
use super::types::Totals;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 12.0;
const TOP: f32 = PAGE_HEIGHT - 18.0;
const BOTTOM: f32 = 22.0;
const ROW_HEIGHT: f32 = 5.0;

/// Detail table columns: header, width in mm, max characters.
const COLUMNS: [(&str, f32, usize); 10] = [
    ("No", 8.0, 4),
    ("Waktu", 15.0, 8),
    ("No. Transaksi", 28.0, 16),
    ("Kasir", 20.0, 12),
    ("Customer", 20.0, 12),
    ("Service", 22.0, 13),
    ("Amount", 21.0, 14),
    ("Service Fee", 17.0, 11),
    ("Bank Fee", 15.0, 10),
    ("Net Profit", 20.0, 14),
];

/// One line of the detail table.
#[derive(Debug, Clone)]
pub struct DailyReportRow {
    /// Local time of the transaction, `HH:MM:SS`.
    pub time: String,
    /// Transaction number.
    pub transaction_number: String,
    /// Cashier who posted it.
    pub cashier_name: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Service name.
    pub service_name: String,
    /// Amount.
    pub amount: Decimal,
    /// Service fee.
    pub service_fee: Decimal,
    /// Bank fee.
    pub bank_fee: Decimal,
    /// Net profit.
    pub net_profit: Decimal,
}

/// Everything printed on the daily report.
#[derive(Debug, Clone)]
pub struct DailyReport {
    /// Report date.
    pub date: NaiveDate,
    /// Cashier names joined with commas.
    pub cashier_label: String,
    /// Local generation time.
    pub generated_at: NaiveDateTime,
    /// Summary figures.
    pub totals: Totals,
    /// Detail rows in time order.
    pub rows: Vec<DailyReportRow>,
}

impl DailyReport {
    /// Distinct cashier names from the rows, sorted, or `fallback` when none.
    #[must_use]
    pub fn cashier_label(rows: &[DailyReportRow], fallback: &str) -> String {
        let mut names: Vec<&str> = rows
            .iter()
            .filter_map(|r| r.cashier_name.as_deref())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_unstable();
        names.dedup();

        if names.is_empty() {
            fallback.to_string()
        } else {
            names.join(", ")
        }
    }

    /// Attachment file name, `laporan-transaksi-YYYY-MM-DD.pdf`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("laporan-transaksi-{}.pdf", self.date.format("%Y-%m-%d"))
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor {
    fn text(&self, s: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(s, size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn ensure_room(&mut self, needed: f32) -> bool {
        if self.y - needed >= BOTTOM {
            return false;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        true
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(2)).collect();
        out.push_str("..");
        out
    }
}

fn table_row(cursor: &Cursor, cells: &[String], font: &IndirectFontRef) {
    let mut x = MARGIN;
    for ((_, width, max), cell) in COLUMNS.iter().zip(cells) {
        cursor.text(&clip(cell, *max), 7.0, x, font);
        x += width;
    }
}

fn header_row(cursor: &Cursor, fonts: &Fonts) {
    let headers: Vec<String> = COLUMNS.iter().map(|(h, _, _)| (*h).to_string()).collect();
    table_row(cursor, &headers, &fonts.bold);
}

/// Renders the report and returns the PDF bytes.
///
/// # Errors
///
/// Returns `ReportRenderError::Pdf` if the PDF library fails.
pub fn render_daily_report(report: &DailyReport) -> Result<Vec<u8>, ReportRenderError> {
    let (doc, page, layer) = PdfDocument::new(
        "Laporan Transaksi Harian",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportRenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportRenderError::Pdf(e.to_string()))?,
    };
    let layer = doc.get_page(page).get_layer(layer);
    let mut cursor = Cursor {
        doc,
        layer,
        y: TOP,
        pages: 1,
    };

    cursor.text("Laporan Transaksi Harian", 16.0, 62.0, &fonts.bold);
    cursor.advance(12.0);

    let info = [
        format!("Tanggal: {}", report.date.format("%d %B %Y")),
        format!("Kasir: {}", report.cashier_label),
        format!(
            "Waktu Generate: {}",
            report.generated_at.format("%d/%m/%Y %H:%M:%S")
        ),
    ];
    for line in &info {
        cursor.text(line, 10.0, MARGIN, &fonts.regular);
        cursor.advance(6.0);
    }
    cursor.advance(4.0);

    cursor.text("Ringkasan Transaksi", 13.0, MARGIN, &fonts.bold);
    cursor.advance(8.0);

    let t = &report.totals;
    let summary = [
        ("Total Transaksi", format!("{} transaksi", t.count)),
        ("Total Nominal", format_rupiah(t.amount)),
        ("Total Service Fee", format_rupiah(t.service_fee)),
        ("Total Bank Fee", format_rupiah(t.bank_fee)),
        ("Total Extra Fee", format_rupiah(t.extra_fee)),
        ("Total Net Profit", format_rupiah(t.net_profit)),
    ];
    for (label, value) in &summary {
        cursor.text(label, 10.0, MARGIN, &fonts.regular);
        cursor.text(value, 10.0, MARGIN + 70.0, &fonts.regular);
        cursor.advance(6.0);
    }
    cursor.advance(6.0);

    if report.rows.is_empty() {
        cursor.text("Tidak ada transaksi hari ini.", 10.0, MARGIN, &fonts.regular);
        cursor.advance(10.0);
    } else {
        cursor.text("Detail Transaksi", 13.0, MARGIN, &fonts.bold);
        cursor.advance(8.0);
        header_row(&cursor, &fonts);
        cursor.advance(ROW_HEIGHT + 1.0);

        for (i, row) in report.rows.iter().enumerate() {
            if cursor.ensure_room(ROW_HEIGHT) {
                header_row(&cursor, &fonts);
                cursor.advance(ROW_HEIGHT + 1.0);
            }
            let cells = [
                (i + 1).to_string(),
                row.time.clone(),
                row.transaction_number.clone(),
                row.cashier_name.clone().unwrap_or_else(|| "-".into()),
                row.customer_name.clone().unwrap_or_else(|| "-".into()),
                row.service_name.clone(),
                format_rupiah(row.amount),
                format_rupiah(row.service_fee),
                format_rupiah(row.bank_fee),
                format_rupiah(row.net_profit),
            ];
            table_row(&cursor, &cells, &fonts.regular);
            cursor.advance(ROW_HEIGHT);
        }
        cursor.advance(8.0);
    }

    cursor.ensure_room(10.0);
    cursor.text(
        "Laporan ini dihasilkan secara otomatis oleh sistem Brilink",
        8.0,
        60.0,
        &fonts.regular,
    );

    cursor
        .doc
        .save_to_bytes()
        .map_err(|e| ReportRenderError::Pdf(e.to_string()))
}
