// src/services/form_reducer.rs

// Transições puras do formulário: recebem o registro atual e devolvem o próximo.
// Toda máscara é aplicada aqui, então o registro sempre guarda a string de exibição.

use chrono::NaiveDate;

use crate::{
    common::formatters,
    models::authorization::{
        AuthorizationRecord, BuyerCategory, Field, IdDocumentType, RepresentativeDocumentType,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    BuyerCategory(BuyerCategory),
    BuyerName(String),
    BuyerEmail(String),
    BuyerPhone(String),
    BuyerTaxId(String),
    BuyerCompanyId(String),
    BuyerIdDocumentType(IdDocumentType),
    BuyerIdDocumentNumber(String),
    RepresentativeName(String),
    RepresentativeIdDocumentType(RepresentativeDocumentType),
    RepresentativeIdDocumentNumber(String),
    PurchaseDate(Option<NaiveDate>),
    PickupDate(Option<NaiveDate>),
    PurchaseValue(String),
    OrderNumber(String),
    PickupStore(String),
    AgreedToConsent(bool),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::BuyerCategory(_) => Field::BuyerCategory,
            FieldChange::BuyerName(_) => Field::BuyerName,
            FieldChange::BuyerEmail(_) => Field::BuyerEmail,
            FieldChange::BuyerPhone(_) => Field::BuyerPhone,
            FieldChange::BuyerTaxId(_) => Field::BuyerTaxId,
            FieldChange::BuyerCompanyId(_) => Field::BuyerCompanyId,
            FieldChange::BuyerIdDocumentType(_) => Field::BuyerIdDocumentType,
            FieldChange::BuyerIdDocumentNumber(_) => Field::BuyerIdDocumentNumber,
            FieldChange::RepresentativeName(_) => Field::RepresentativeName,
            FieldChange::RepresentativeIdDocumentType(_) => Field::RepresentativeIdDocumentType,
            FieldChange::RepresentativeIdDocumentNumber(_) => {
                Field::RepresentativeIdDocumentNumber
            }
            FieldChange::PurchaseDate(_) => Field::PurchaseDate,
            FieldChange::PickupDate(_) => Field::PickupDate,
            FieldChange::PurchaseValue(_) => Field::PurchaseValue,
            FieldChange::OrderNumber(_) => Field::OrderNumber,
            FieldChange::PickupStore(_) => Field::PickupStore,
            FieldChange::AgreedToConsent(_) => Field::AgreedToConsent,
        }
    }
}

/// Troca o tipo de comprador limpando os campos do ramo anterior.
/// Limpar um ramo já vazio não muda nada.
pub fn on_category_change(
    record: &AuthorizationRecord,
    category: BuyerCategory,
) -> AuthorizationRecord {
    let mut next = record.clone();
    next.buyer_category = Some(category);

    match category {
        BuyerCategory::Individual => {
            next.buyer_company_id.clear();
        }
        BuyerCategory::Corporate => {
            next.buyer_tax_id.clear();
            next.buyer_id_document_type = None;
            next.buyer_id_document_number.clear();
        }
    }

    next
}

/// Aplica uma alteração de campo e devolve o novo registro.
///
/// Também devolve os campos que precisam ser revalidados (o próprio campo e
/// os dependentes que foram limpos).
pub fn apply_change(
    record: &AuthorizationRecord,
    change: FieldChange,
) -> (AuthorizationRecord, Vec<Field>) {
    let mut touched = vec![change.field()];

    let next = match change {
        FieldChange::BuyerCategory(category) => {
            touched.extend([
                Field::BuyerTaxId,
                Field::BuyerCompanyId,
                Field::BuyerIdDocumentType,
                Field::BuyerIdDocumentNumber,
            ]);
            on_category_change(record, category)
        }
        FieldChange::BuyerIdDocumentType(doc_type) => {
            touched.push(Field::BuyerIdDocumentNumber);
            let mut next = record.clone();
            if next.buyer_id_document_type != Some(doc_type) {
                next.buyer_id_document_number.clear();
            }
            next.buyer_id_document_type = Some(doc_type);
            next
        }
        FieldChange::RepresentativeIdDocumentType(doc_type) => {
            touched.push(Field::RepresentativeIdDocumentNumber);
            let mut next = record.clone();
            if next.representative_id_document_type != Some(doc_type) {
                next.representative_id_document_number.clear();
            }
            next.representative_id_document_type = Some(doc_type);
            next
        }
        other => {
            let mut next = record.clone();
            set_value(&mut next, other);
            next
        }
    };

    (next, touched)
}

fn set_value(record: &mut AuthorizationRecord, change: FieldChange) {
    match change {
        FieldChange::BuyerName(v) => record.buyer_name = v,
        FieldChange::BuyerEmail(v) => record.buyer_email = v.trim().to_string(),
        FieldChange::BuyerPhone(v) => record.buyer_phone = formatters::format_phone(&v),
        FieldChange::BuyerTaxId(v) => record.buyer_tax_id = formatters::format_cpf(&v),
        FieldChange::BuyerCompanyId(v) => record.buyer_company_id = formatters::format_cnpj(&v),
        FieldChange::BuyerIdDocumentNumber(v) => {
            // Sem tipo escolhido não há máscara a aplicar; o campo continua vazio
            record.buyer_id_document_number = record
                .buyer_id_document_type
                .map(|doc_type| doc_type.format_number(&v))
                .unwrap_or_default();
        }
        FieldChange::RepresentativeName(v) => record.representative_name = v,
        FieldChange::RepresentativeIdDocumentNumber(v) => {
            record.representative_id_document_number = record
                .representative_id_document_type
                .map(|doc_type| doc_type.format_number(&v))
                .unwrap_or_default();
        }
        FieldChange::PurchaseDate(v) => record.purchase_date = v,
        FieldChange::PickupDate(v) => record.pickup_date = v,
        FieldChange::PurchaseValue(v) => {
            record.purchase_value = formatters::format_currency(&v)
        }
        FieldChange::OrderNumber(v) => record.order_number = formatters::format_order_number(&v),
        FieldChange::PickupStore(v) => record.pickup_store = v,
        FieldChange::AgreedToConsent(v) => record.agreed_to_consent = v,
        // Tratados em apply_change
        FieldChange::BuyerCategory(_)
        | FieldChange::BuyerIdDocumentType(_)
        | FieldChange::RepresentativeIdDocumentType(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_individual() -> AuthorizationRecord {
        AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Individual),
            buyer_tax_id: "123.456.789-01".into(),
            buyer_id_document_type: Some(IdDocumentType::DriverLicense),
            buyer_id_document_number: "01234567890".into(),
            ..Default::default()
        }
    }

    #[test]
    fn switching_to_corporate_clears_individual_branch() {
        let next = on_category_change(&filled_individual(), BuyerCategory::Corporate);

        assert_eq!(next.buyer_category, Some(BuyerCategory::Corporate));
        assert_eq!(next.buyer_tax_id, "");
        assert_eq!(next.buyer_id_document_type, None);
        assert_eq!(next.buyer_id_document_number, "");
    }

    #[test]
    fn switching_to_individual_clears_company_id() {
        let record = AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Corporate),
            buyer_company_id: "12.345.678/0001-99".into(),
            ..Default::default()
        };

        let next = on_category_change(&record, BuyerCategory::Individual);
        assert_eq!(next.buyer_company_id, "");
    }

    #[test]
    fn category_change_is_idempotent() {
        let once = on_category_change(&filled_individual(), BuyerCategory::Corporate);
        let twice = on_category_change(&once, BuyerCategory::Corporate);

        assert_eq!(once, twice);
    }

    #[test]
    fn category_change_does_not_touch_input() {
        let record = filled_individual();
        let _ = on_category_change(&record, BuyerCategory::Corporate);

        assert_eq!(record, filled_individual());
    }

    #[test]
    fn document_type_change_clears_number() {
        let (next, touched) = apply_change(
            &filled_individual(),
            FieldChange::BuyerIdDocumentType(IdDocumentType::NationalId),
        );

        assert_eq!(next.buyer_id_document_number, "");
        assert!(touched.contains(&Field::BuyerIdDocumentNumber));

        // Reescolher o mesmo tipo mantém o número
        let (same, _) = apply_change(
            &filled_individual(),
            FieldChange::BuyerIdDocumentType(IdDocumentType::DriverLicense),
        );
        assert_eq!(same.buyer_id_document_number, "01234567890");
    }

    #[test]
    fn number_without_type_stays_empty() {
        let (next, _) = apply_change(
            &AuthorizationRecord::default(),
            FieldChange::RepresentativeIdDocumentNumber("12345".into()),
        );

        assert_eq!(next.representative_id_document_number, "");
    }

    #[test]
    fn masked_inputs_are_stored_formatted() {
        let record = AuthorizationRecord::default();

        let (record, _) = apply_change(&record, FieldChange::BuyerPhone("11987654321".into()));
        let (record, _) = apply_change(&record, FieldChange::PurchaseValue("19990".into()));
        let (record, _) = apply_change(&record, FieldChange::OrderNumber("V4567".into()));
        let (record, _) = apply_change(
            &record,
            FieldChange::RepresentativeIdDocumentType(RepresentativeDocumentType::TaxId),
        );
        let (record, _) = apply_change(
            &record,
            FieldChange::RepresentativeIdDocumentNumber("12345678901".into()),
        );

        assert_eq!(record.buyer_phone, "(11) 98765-4321");
        assert_eq!(record.purchase_value, "199,90");
        assert_eq!(record.order_number, "4567");
        assert_eq!(record.representative_id_document_number, "123.456.789-01");
    }
}
