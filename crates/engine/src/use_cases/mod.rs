//! Use cases - caller-facing operations over the repositories.
//!
//! Each write resolves the caller first, validates the payload, then hands
//! a single stamped call to storage. Reads skip identity resolution.

mod documents;
mod error;
mod parties;
mod sub_resources;
mod support;
mod tax_schemes;

pub use documents::DocumentService;
pub use error::ServiceError;
pub use parties::PartyService;
pub use sub_resources::SubResourceService;
pub use support::WriteGate;
pub use tax_schemes::TaxSchemeService;

use docstore_domain::{
    ConsignmentKind, DespatchAdviceKind, PurchaseOrderKind, ReceiptAdviceKind, ShipmentKind,
};

/// Container for all use cases.
pub struct UseCases {
    pub purchase_orders: DocumentService<PurchaseOrderKind>,
    pub shipments: DocumentService<ShipmentKind>,
    pub despatch_advices: DocumentService<DespatchAdviceKind>,
    pub receipt_advices: DocumentService<ReceiptAdviceKind>,
    pub consignments: DocumentService<ConsignmentKind>,
    pub parties: PartyService,
    pub tax_schemes: TaxSchemeService,
    pub sub_resources: SubResourceService,
}
