//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{ClockPort, IdentityPort},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{
    DocumentService, PartyService, SubResourceService, TaxSchemeService, UseCases, WriteGate,
};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: SqliteRepositories,
        identity: Arc<dyn IdentityPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let gate = WriteGate::new(identity, clock);

        let use_cases = UseCases {
            purchase_orders: DocumentService::new(repos.purchase_orders, gate.clone()),
            shipments: DocumentService::new(repos.shipments, gate.clone()),
            despatch_advices: DocumentService::new(repos.despatch_advices, gate.clone()),
            receipt_advices: DocumentService::new(repos.receipt_advices, gate.clone()),
            consignments: DocumentService::new(repos.consignments, gate.clone()),
            parties: PartyService::new(repos.parties, gate.clone()),
            tax_schemes: TaxSchemeService::new(repos.tax_schemes, gate),
            sub_resources: SubResourceService::new(repos.sub_resources),
        };

        Self { use_cases }
    }
}
