use crate::cbc::{I18n, Note};
use crate::tax::keys::{TAG_REVERSE_CHARGE, TAG_SELF_BILLED};
use crate::tax::{SCHEMA_INVOICE, Scenario, ScenarioSet};

use super::{
    TAG_ANTIQUES, TAG_ART, TAG_CASH_BASIS, TAG_SECOND_HAND_GOODS, TAG_SIMPLIFIED_SCHEME,
    TAG_TRAVEL_AGENCY,
};

/// Legal texts Spanish invoices must carry for each special scheme.
pub(super) fn invoice_scenarios() -> ScenarioSet {
    let legal = |tag: &str, name: &str, text: &str| {
        Scenario::new(I18n::en(name)).tags(&[tag]).note(Note::legal(text).src(tag))
    };
    ScenarioSet::new(
        SCHEMA_INVOICE,
        vec![
            legal(TAG_REVERSE_CHARGE, "Reverse Charge", "Reverse Charge / Inversión del sujeto pasivo."),
            legal(
                TAG_SIMPLIFIED_SCHEME,
                "Simplified Scheme",
                "Factura expedida por contibuyente en régimen simplificado.",
            ),
            legal(TAG_SELF_BILLED, "Self-billed", "Facturación por el destinatario."),
            legal(TAG_TRAVEL_AGENCY, "Travel Agency", "Régimen especial de las agencias de viajes."),
            legal(TAG_SECOND_HAND_GOODS, "Second-hand Goods", "Régimen especial de los bienes usados."),
            legal(TAG_ART, "Art", "Régimen especial de los objetos de arte."),
            legal(
                TAG_ANTIQUES,
                "Antiques",
                "Régimen especial de las antigüedades y objetos de colección.",
            ),
            legal(TAG_CASH_BASIS, "Cash Basis", "Régimen especial del criterio de caja."),
        ],
    )
}
