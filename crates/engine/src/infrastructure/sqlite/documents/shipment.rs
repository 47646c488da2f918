use async_trait::async_trait;
use docstore_domain::{
    ExternalId, GoodsItem, RowId, Shipment, ShipmentKind, ShipmentUpdate, Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use crate::infrastructure::ports::RepoError;
use crate::infrastructure::sqlite::document_repo::{DocumentSchema, LineTable};
use crate::infrastructure::sqlite::helpers::{insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};

pub struct ShipmentSchema;

#[async_trait]
impl DocumentSchema for ShipmentSchema {
    type Kind = ShipmentKind;

    const HEADER_TABLE: &'static str = "shipments";
    const LINES: Option<LineTable> = Some(LineTable {
        table: "goods_items",
        header_column: "shipment_id",
    });

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &Shipment,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO {} (shipment_ref, handling_code, gross_weight, delivery_instructions, \
             origin_address_id, delivery_address_id, exit_location_id, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})",
            Self::HEADER_TABLE
        );
        let query = sqlx::query(&sql)
            .bind(header.shipment_ref.as_str())
            .bind(header.handling_code.as_deref())
            .bind(header.gross_weight.as_deref())
            .bind(header.delivery_instructions.as_deref())
            .bind(header.origin_address_key.map(RowId::get))
            .bind(header.delivery_address_key.map(RowId::get))
            .bind(header.exit_location_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_shipment").await
    }

    async fn insert_line(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header_key: RowId,
        line: &GoodsItem,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO goods_items (shipment_id, sequence_number, description, quantity, \
             declared_value, origin_address_id, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
        );
        let query = sqlx::query(&sql)
            .bind(header_key.get())
            .bind(line.sequence_number.as_str())
            .bind(line.description.as_str())
            .bind(line.quantity.as_str())
            .bind(line.declared_value.as_deref())
            .bind(line.origin_address_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_goods_item").await
    }

    fn header_fields(&self, row: &SqliteRow) -> Result<Shipment, RepoError> {
        Ok(Shipment {
            shipment_ref: row.string("shipment_ref")?,
            handling_code: row.optional_string("handling_code")?,
            gross_weight: row.optional_string("gross_weight")?,
            delivery_instructions: row.optional_string("delivery_instructions")?,
            origin_address_key: row.optional_key("origin_address_id")?,
            delivery_address_key: row.optional_key("delivery_address_id")?,
            exit_location_key: row.optional_key("exit_location_id")?,
        })
    }

    fn line_fields(&self, row: &SqliteRow) -> Result<GoodsItem, RepoError> {
        Ok(GoodsItem {
            sequence_number: row.string("sequence_number")?,
            description: row.string("description")?,
            quantity: row.string("quantity")?,
            declared_value: row.optional_string("declared_value")?,
            origin_address_key: row.optional_key("origin_address_id")?,
        })
    }

    fn update_columns<'u>(
        &self,
        update: &'u ShipmentUpdate,
    ) -> Vec<(&'static str, Option<&'u str>)> {
        vec![
            ("handling_code", update.handling_code.as_deref()),
            ("delivery_instructions", update.delivery_instructions.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{DocumentRepo, SubResourceRepo};
    use crate::infrastructure::sqlite::test_support::{stamp, TestDb};
    use crate::infrastructure::sqlite::{SqliteDocumentRepo, SqliteSubResourceRepo};
    use docstore_domain::{Address, Location, NewDocument, NewGoodsItem, NewShipment};

    #[tokio::test]
    async fn three_attachments_land_in_their_own_columns() {
        let db = TestDb::new().await;
        let repo = SqliteDocumentRepo::new(db.pool.clone(), ShipmentSchema);
        let doc = NewDocument::new(
            NewShipment::new("SH-1")
                .with_origin_address(Address::new("Hamburg"))
                .with_delivery_address(Address::new("Lyon"))
                .with_exit_location(Location::new("Port of Hamburg").with_coordinates("53.54", "9.98")),
            vec![NewGoodsItem::new("1", "Machine parts", "12")],
        );

        let created = repo.create(doc, &stamp()).await.expect("create");
        let header = &created.header.fields;

        let lookups = SqliteSubResourceRepo::new(db.pool.clone());
        let origin = lookups
            .get_address(header.origin_address_key.expect("origin key"))
            .await
            .expect("get")
            .expect("origin row");
        let delivery = lookups
            .get_address(header.delivery_address_key.expect("delivery key"))
            .await
            .expect("get")
            .expect("delivery row");
        let exit = lookups
            .get_location(header.exit_location_key.expect("exit key"))
            .await
            .expect("get")
            .expect("exit row");

        assert_eq!(origin.fields.city_name.as_deref(), Some("Hamburg"));
        assert_eq!(delivery.fields.city_name.as_deref(), Some("Lyon"));
        assert_eq!(exit.fields.latitude.as_deref(), Some("53.54"));
        assert_eq!(db.count("addresses").await, 2);
        assert_eq!(db.count("locations").await, 1);

        let stored = repo
            .get_by_key(created.header.key)
            .await
            .expect("get")
            .expect("stored");
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn goods_items_get_their_own_origin_addresses() {
        let db = TestDb::new().await;
        let repo = SqliteDocumentRepo::new(db.pool.clone(), ShipmentSchema);
        let doc = NewDocument::new(
            NewShipment::new("SH-3").with_origin_address(Address::new("Hamburg")),
            vec![
                NewGoodsItem::new("1", "Pallets", "4").with_origin_address(Address::new("Gdansk")),
                NewGoodsItem::new("2", "Crates", "9"),
            ],
        );

        let created = repo.create(doc, &stamp()).await.expect("create");
        let header_origin = created.header.fields.origin_address_key.expect("header origin");
        let line_origin = created.lines[0]
            .record
            .fields
            .origin_address_key
            .expect("line origin");
        assert_ne!(header_origin, line_origin);
        assert_eq!(created.lines[1].record.fields.origin_address_key, None);
        assert_eq!(db.count("addresses").await, 2);

        let address = SqliteSubResourceRepo::new(db.pool.clone())
            .get_address(line_origin)
            .await
            .expect("get")
            .expect("line origin row");
        assert_eq!(address.fields.city_name.as_deref(), Some("Gdansk"));

        let stored = repo.get(created.header.id).await.expect("get").expect("stored");
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn failing_line_attachment_rolls_back_the_shipment() {
        let db = TestDb::new().await;
        db.fail_inserts_when("addresses", "NEW.city_name = 'Gdansk'")
            .await;
        let repo = SqliteDocumentRepo::new(db.pool.clone(), ShipmentSchema);
        let item = NewGoodsItem::new("1", "Pallets", "4").with_origin_address(Address::new("Gdansk"));
        let doc = NewDocument::new(
            NewShipment::new("SH-4").with_origin_address(Address::new("Hamburg")),
            vec![item],
        );

        let result = repo.create(doc, &stamp()).await;

        assert!(matches!(result, Err(RepoError::Database { .. })));
        assert_eq!(db.count("addresses").await, 0);
        assert_eq!(db.count("shipments").await, 0);
        assert_eq!(db.count("goods_items").await, 0);
    }

    #[tokio::test]
    async fn narrow_update_leaves_other_columns() {
        let db = TestDb::new().await;
        let repo = SqliteDocumentRepo::new(db.pool.clone(), ShipmentSchema);
        let mut header = NewShipment::new("SH-2");
        header.handling_code = Some("FRAGILE".into());
        header.gross_weight = Some("120.5".into());
        let created = repo
            .create(NewDocument::new(header, Vec::new()), &stamp())
            .await
            .expect("create");

        let update = ShipmentUpdate {
            delivery_instructions: Some("Dock 3".into()),
            ..ShipmentUpdate::default()
        };
        repo.update(created.header.id, &update, &stamp())
            .await
            .expect("update");

        let stored = repo
            .get(created.header.id)
            .await
            .expect("get")
            .expect("stored");
        assert_eq!(stored.header.fields.handling_code.as_deref(), Some("FRAGILE"));
        assert_eq!(stored.header.fields.gross_weight.as_deref(), Some("120.5"));
        assert_eq!(
            stored.header.fields.delivery_instructions.as_deref(),
            Some("Dock 3")
        );
    }
}
