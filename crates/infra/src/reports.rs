//! Flat CSV exports of the catalog and the movement ledger.

use chrono::NaiveDate;
use thiserror::Error;

use nexus_inventory::{ReportKind, Snapshot};

use crate::projections::search_transactions;

pub const INVENTORY_HEADERS: [&str; 7] =
    ["ID", "Name", "SKU", "Quantity", "Price", "Cost", "Last Updated"];
pub const MOVEMENT_HEADERS: [&str; 6] = ["Date", "Product", "SKU", "Type", "Quantity", "Note"];

/// Placeholder for product columns of a movement whose product was deleted.
pub const MISSING_PRODUCT: &str = "?";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv buffer could not be flushed: {0}")]
    Flush(String),

    #[error("csv output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A rendered report ready to be handed to a download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    pub kind: ReportKind,
    pub file_name: String,
    pub content: String,
}

pub fn report_file_name(kind: ReportKind, date: NaiveDate) -> String {
    let stem = match kind {
        ReportKind::Inventory => "inventory_report",
        ReportKind::Movements => "transaction_history",
    };
    format!("{stem}_{}.csv", date.format("%Y-%m-%d"))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// One row per product in catalog order.
pub fn inventory_csv(snapshot: &Snapshot) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(INVENTORY_HEADERS)?;
    for p in snapshot.products() {
        writer.write_record([
            p.id.to_string(),
            p.name.clone(),
            p.sku.clone(),
            p.quantity.to_string(),
            p.price.to_string(),
            p.cost.to_string(),
            p.last_updated.to_rfc3339(),
        ])?;
    }
    finish(writer)
}

/// Movements matching `filter` (see [`search_transactions`]), newest first.
pub fn movements_csv(snapshot: &Snapshot, filter: &str) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(MOVEMENT_HEADERS)?;
    for t in search_transactions(snapshot, filter) {
        let product = snapshot.product(&t.product_id);
        writer.write_record([
            t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            product.map_or(MISSING_PRODUCT.to_string(), |p| p.name.clone()),
            product.map_or(MISSING_PRODUCT.to_string(), |p| p.sku.clone()),
            t.movement.to_string(),
            t.quantity.to_string(),
            t.note.clone(),
        ])?;
    }
    finish(writer)
}

/// Render `kind` for `date` (used in the file name).
pub fn render(snapshot: &Snapshot, kind: ReportKind, date: NaiveDate) -> Result<CsvReport, ReportError> {
    let content = match kind {
        ReportKind::Inventory => inventory_csv(snapshot)?,
        ReportKind::Movements => movements_csv(snapshot, "")?,
    };
    Ok(CsvReport {
        kind,
        file_name: report_file_name(kind, date),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::fixtures::{at, product, snapshot, tx};
    use nexus_inventory::MovementType;

    fn lines(csv: &str) -> Vec<&str> {
        csv.lines().collect()
    }

    #[test]
    fn file_names_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(report_file_name(ReportKind::Inventory, date), "inventory_report_2024-01-15.csv");
        assert_eq!(
            report_file_name(ReportKind::Movements, date),
            "transaction_history_2024-01-15.csv"
        );
    }

    #[test]
    fn inventory_export_has_one_row_per_product() {
        let s = snapshot(vec![product("a", "c1", 2.5, 4, 0), product("b", "c1", 10.0, 3, 0)], vec![]);
        let csv = inventory_csv(&s).unwrap();
        let rows = lines(&csv);

        assert_eq!(rows[0], "ID,Name,SKU,Quantity,Price,Cost,Last Updated");
        assert_eq!(rows.len(), 3);
        assert!(rows[1].starts_with("a,Product a,SKU-a,4,2.5,1.25,2024-01-01T00:00:00"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut p = product("a", "c1", 1.0, 1, 0);
        p.name = "Pens, blue".to_string();
        let csv = inventory_csv(&snapshot(vec![p], vec![])).unwrap();
        assert!(csv.contains("\"Pens, blue\""));
    }

    #[test]
    fn movement_export_marks_deleted_products() {
        let s = snapshot(
            vec![product("p1", "c1", 1.0, 1, 0)],
            vec![
                tx("t2", "gone", MovementType::Outbound, 4, at(2, 9)),
                tx("t1", "p1", MovementType::Inbound, 7, at(1, 8)),
            ],
        );
        let csv = movements_csv(&s, "").unwrap();
        let rows = lines(&csv);

        assert_eq!(rows[0], "Date,Product,SKU,Type,Quantity,Note");
        assert_eq!(rows[1], "2024-01-02 09:00:00,?,?,OUTBOUND,4,note t2");
        assert_eq!(rows[2], "2024-01-01 08:00:00,Product p1,SKU-p1,INBOUND,7,note t1");
    }

    #[test]
    fn render_picks_content_and_name() {
        let s = snapshot(vec![], vec![]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let report = render(&s, ReportKind::Movements, date).unwrap();
        assert_eq!(report.file_name, "transaction_history_2024-03-01.csv");
        assert_eq!(report.content.trim_end(), "Date,Product,SKU,Type,Quantity,Note");
    }
}
