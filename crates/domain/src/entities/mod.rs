//! Document entities: sub-resources, composite document kinds, and parties.

/// Line payloads without attachment slots are stored as they arrive.
macro_rules! unattached_lines {
    ($($line:ty),* $(,)?) => {
        $(
            impl Linkable for $line {
                type Linked = Self;

                fn attachments(&self) -> Vec<Attachment> {
                    Vec::new()
                }

                fn link(self, _keys: &AttachmentKeys) -> Self {
                    self
                }
            }
        )*
    };
}

mod address;
mod attachment;
mod consignment;
mod despatch_advice;
mod document;
mod location;
mod party;
mod purchase_order;
mod receipt_advice;
mod record;
mod shipment;
mod tax_scheme;

pub use address::Address;
pub use attachment::{
    collect_attachments, Attachment, AttachmentKeys, AttachmentSlot, Linkable, SubResource,
};
pub use consignment::{Consignment, ConsignmentKind, ConsignmentUpdate, NewConsignment, NoLines};
pub use despatch_advice::{
    DespatchAdvice, DespatchAdviceKind, DespatchAdviceUpdate, DespatchLine, NewDespatchAdvice,
};
pub use document::{Document, DocumentKind, DocumentOf, NewDocument, NewDocumentOf, Validate};
pub use location::Location;
pub use party::{
    CreatedChild, NewParty, ParentUpdate, Party, PartyDetails, PartyNode, PartyUpdate,
    TreePosition,
};
pub use purchase_order::{
    NewPurchaseOrder, PurchaseOrder, PurchaseOrderKind, PurchaseOrderLine, PurchaseOrderUpdate,
};
pub use receipt_advice::{
    NewReceiptAdvice, ReceiptAdvice, ReceiptAdviceKind, ReceiptAdviceUpdate, ReceiptLine,
};
pub use record::{Audit, LineRecord, Record, RecordStatus, Stamp};
pub use shipment::{GoodsItem, NewGoodsItem, NewShipment, Shipment, ShipmentKind, ShipmentUpdate};
pub use tax_scheme::{TaxScheme, TaxSchemeUpdate};

unattached_lines!(PurchaseOrderLine, DespatchLine, ReceiptLine, NoLines);
