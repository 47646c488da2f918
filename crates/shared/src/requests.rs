//! Request bodies and query strings accepted by the document service.

use serde::{Deserialize, Serialize};

use docstore_domain::{NewDocument, NewParty};

/// Caller identity headers. The request id is generated when absent.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Query string of every list operation. Both values are passed through as
/// raw strings; parsing happens server-side so malformed values surface as
/// validation failures rather than transport rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Body of a composite create: the header payload and its lines.
pub type CreateDocumentRequest<H, L> = NewDocument<H, L>;

/// Body of a root or child party create.
pub type CreatePartyRequest = NewParty;

#[cfg(test)]
mod tests {
    use super::*;
    use docstore_domain::{NewPurchaseOrder, PurchaseOrderLine};

    #[test]
    fn create_body_lines_default_to_empty() {
        let body: CreateDocumentRequest<NewPurchaseOrder, PurchaseOrderLine> =
            serde_json::from_value(serde_json::json!({
                "header": { "order_number": "PO-1", "issue_date": "2024-04-01" }
            }))
            .expect("deserialize");
        assert!(body.lines.is_empty());
        assert_eq!(body.header.order_number, "PO-1");
        assert!(body.header.delivery_address.is_none());
    }

    #[test]
    fn misspelled_create_body_key_is_rejected() {
        let parsed: Result<CreateDocumentRequest<NewPurchaseOrder, PurchaseOrderLine>, _> =
            serde_json::from_value(serde_json::json!({
                "header": { "order_number": "PO-1", "issue_date": "2024-04-01" },
                "line_items": []
            }));
        assert!(parsed.is_err());
    }

    #[test]
    fn party_body_rejects_unknown_fields() {
        let parsed: Result<CreatePartyRequest, _> =
            serde_json::from_value(serde_json::json!({ "name": "Acme", "nmae": "Acme" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn list_query_fields_are_optional() {
        let query: ListQuery = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(query, ListQuery::default());
    }
}
