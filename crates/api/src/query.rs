//! Shared query parameter types.

use serde::Deserialize;
use uuid::Uuid;

/// `?partner_id=<uuid>` scope filter used by the question, coupon, and
/// analytics endpoints. Absent means "no partner scope": global content
/// only for writes, everything for reads.
#[derive(Debug, Default, Deserialize)]
pub struct PartnerScopeParams {
    pub partner_id: Option<Uuid>,
}
