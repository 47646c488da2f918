use async_trait::async_trait;
use docstore_domain::{
    DespatchAdvice, DespatchAdviceKind, DespatchAdviceUpdate, DespatchLine, ExternalId, RowId,
    Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use crate::infrastructure::ports::RepoError;
use crate::infrastructure::sqlite::document_repo::{DocumentSchema, LineTable};
use crate::infrastructure::sqlite::helpers::{insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};

pub struct DespatchAdviceSchema;

#[async_trait]
impl DocumentSchema for DespatchAdviceSchema {
    type Kind = DespatchAdviceKind;

    const HEADER_TABLE: &'static str = "despatch_advices";
    const LINES: Option<LineTable> = Some(LineTable {
        table: "despatch_lines",
        header_column: "despatch_advice_id",
    });

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &DespatchAdvice,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO {} (despatch_number, issue_date, note, order_reference, \
             despatch_address_id, {NEW_ROW_COLUMNS}) VALUES (?, ?, ?, ?, ?, {NEW_ROW_VALUES})",
            Self::HEADER_TABLE
        );
        let query = sqlx::query(&sql)
            .bind(header.despatch_number.as_str())
            .bind(header.issue_date.as_str())
            .bind(header.note.as_deref())
            .bind(header.order_reference.as_deref())
            .bind(header.despatch_address_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_despatch_advice").await
    }

    async fn insert_line(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header_key: RowId,
        line: &DespatchLine,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO despatch_lines (despatch_advice_id, line_number, item_name, \
             delivered_quantity, backorder_quantity, outstanding_reason, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
        );
        let query = sqlx::query(&sql)
            .bind(header_key.get())
            .bind(line.line_number.as_str())
            .bind(line.item_name.as_str())
            .bind(line.delivered_quantity.as_str())
            .bind(line.backorder_quantity.as_deref())
            .bind(line.outstanding_reason.as_deref());
        insert_row(conn, query, id, stamp, "insert_despatch_line").await
    }

    fn header_fields(&self, row: &SqliteRow) -> Result<DespatchAdvice, RepoError> {
        Ok(DespatchAdvice {
            despatch_number: row.string("despatch_number")?,
            issue_date: row.string("issue_date")?,
            note: row.optional_string("note")?,
            order_reference: row.optional_string("order_reference")?,
            despatch_address_key: row.optional_key("despatch_address_id")?,
        })
    }

    fn line_fields(&self, row: &SqliteRow) -> Result<DespatchLine, RepoError> {
        Ok(DespatchLine {
            line_number: row.string("line_number")?,
            item_name: row.string("item_name")?,
            delivered_quantity: row.string("delivered_quantity")?,
            backorder_quantity: row.optional_string("backorder_quantity")?,
            outstanding_reason: row.optional_string("outstanding_reason")?,
        })
    }

    fn update_columns<'u>(
        &self,
        update: &'u DespatchAdviceUpdate,
    ) -> Vec<(&'static str, Option<&'u str>)> {
        vec![("note", update.note.as_deref())]
    }
}
