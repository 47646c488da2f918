//! Column mappings of the document kinds.

mod consignment;
mod despatch_advice;
mod purchase_order;
mod receipt_advice;
mod shipment;

pub use consignment::ConsignmentSchema;
pub use despatch_advice::DespatchAdviceSchema;
pub use purchase_order::PurchaseOrderSchema;
pub use receipt_advice::ReceiptAdviceSchema;
pub use shipment::ShipmentSchema;
