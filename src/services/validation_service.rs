// src/services/validation_service.rs

// --- MOTOR DE VALIDAÇÃO ---
// Puro: nunca altera o registro, só classifica.
// Todas as regras rodam sempre (sem curto-circuito) para que cada campo
// tenha sua mensagem disponível na tela.

use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::formatters::{self, CNPJ_DIGITS, CPF_DIGITS, DRIVER_LICENSE_DIGITS},
    config::MAX_UPLOAD_BYTES,
    models::authorization::{
        Attachments, AuthorizationRecord, BuyerInfo, Field, IdDocumentType, SignatureImage,
        UploadKind, UploadedFile,
    },
};

// Helper para criar erro de validação com mensagem
fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validação completa (submit).
pub fn validate_record(
    record: &AuthorizationRecord,
    signature: &SignatureImage,
    attachments: &Attachments,
) -> Result<(), ValidationErrors> {
    // 1. Regras fixas (derive do validator)
    let mut errors = match record.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(e) => e,
    };

    // 2. Regras condicionais ao tipo de comprador
    if let Some(buyer) = record.buyer_info() {
        validate_buyer(&buyer, &mut errors);
    }

    // 3. O número do documento do representante depende do tipo escolhido
    if record.representative_id_document_type.is_none()
        && !record.representative_id_document_number.is_empty()
    {
        errors.add(
            Field::RepresentativeIdDocumentNumber.as_str(),
            field_error("document_type_first", "Selecione primeiro o tipo de documento."),
        );
    }

    // 4. Assinatura (campo virtual)
    if signature.is_empty() {
        errors.add(
            Field::Signature.as_str(),
            field_error("signature_missing", "A assinatura é obrigatória."),
        );
    }

    // 5. Anexos
    for (kind, file) in [
        (UploadKind::IdentityDocument, &attachments.identity_document),
        (UploadKind::CompanyDocument, &attachments.company_document),
    ] {
        if let Some(file) = file {
            if let Err(err) = validate_upload(kind, file) {
                errors.add(kind.field().as_str(), err);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validação de um único campo (blur). Devolve a mensagem a exibir, se houver.
pub fn validate_field(
    record: &AuthorizationRecord,
    signature: &SignatureImage,
    attachments: &Attachments,
    field: Field,
) -> Option<String> {
    let errors = validate_record(record, signature, attachments).err()?;
    first_message(&errors, field)
}

// Uma função por variante; o validador agregado só escolhe qual chamar.
fn validate_buyer(buyer: &BuyerInfo<'_>, errors: &mut ValidationErrors) {
    match *buyer {
        BuyerInfo::Individual {
            tax_id,
            id_document_type,
            id_document_number,
        } => validate_individual(tax_id, id_document_type, id_document_number, errors),
        BuyerInfo::Corporate { company_id } => validate_corporate(company_id, errors),
    }
}

fn validate_individual(
    tax_id: &str,
    id_document_type: Option<IdDocumentType>,
    id_document_number: &str,
    errors: &mut ValidationErrors,
) {
    if formatters::digit_count(tax_id) < CPF_DIGITS {
        errors.add(
            Field::BuyerTaxId.as_str(),
            field_error("tax_id", "Informe um CPF válido."),
        );
    }

    if id_document_type.is_none() {
        errors.add(
            Field::BuyerIdDocumentType.as_str(),
            field_error("required", "Selecione o tipo de documento."),
        );
    }

    if id_document_number.trim().is_empty() {
        errors.add(
            Field::BuyerIdDocumentNumber.as_str(),
            field_error("required", "Informe o número do documento."),
        );
    } else {
        match id_document_type {
            None => errors.add(
                Field::BuyerIdDocumentNumber.as_str(),
                field_error("document_type_first", "Selecione primeiro o tipo de documento."),
            ),
            Some(IdDocumentType::DriverLicense)
                if formatters::format_driver_license(id_document_number) != id_document_number
                    || formatters::digit_count(id_document_number) != DRIVER_LICENSE_DIGITS =>
            {
                errors.add(
                    Field::BuyerIdDocumentNumber.as_str(),
                    field_error("driver_license", "A CNH deve ter 11 dígitos."),
                )
            }
            Some(IdDocumentType::NationalId)
                if formatters::format_national_id(id_document_number) != id_document_number =>
            {
                errors.add(
                    Field::BuyerIdDocumentNumber.as_str(),
                    field_error(
                        "national_id",
                        "O RG deve conter apenas letras maiúsculas e números.",
                    ),
                )
            }
            Some(_) => {}
        }
    }
}

fn validate_corporate(company_id: &str, errors: &mut ValidationErrors) {
    if formatters::digit_count(company_id) < CNPJ_DIGITS {
        errors.add(
            Field::BuyerCompanyId.as_str(),
            field_error("company_id", "Informe um CNPJ válido."),
        );
    }
}

/// Consentimento é uma trava à parte do schema: sem ele não há geração,
/// mesmo com todos os campos válidos.
pub fn check_consent(record: &AuthorizationRecord, errors: &mut ValidationErrors) {
    if !record.agreed_to_consent {
        errors.add(
            Field::AgreedToConsent.as_str(),
            field_error("consent", "Você precisa concordar com os termos."),
        );
    }
}

pub fn validate_upload(kind: UploadKind, file: &UploadedFile) -> Result<(), ValidationError> {
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        let mut err = field_error("file_size", "O arquivo deve ter no máximo 5MB.");
        err.add_param("max".into(), &MAX_UPLOAD_BYTES);
        return Err(err);
    }

    if !kind.accepts(&file.mime_type) {
        let message = match kind {
            UploadKind::IdentityDocument => "Envie uma imagem JPG, PNG ou WEBP.",
            UploadKind::CompanyDocument => "Envie uma imagem (JPG, PNG, WEBP) ou um PDF.",
        };
        return Err(field_error("file_type", message));
    }

    Ok(())
}

pub fn first_message(errors: &ValidationErrors, field: Field) -> Option<String> {
    errors
        .field_errors()
        .get(field.as_str())
        .and_then(|list| list.first())
        .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
}

/// Primeiro campo com erro, na ordem em que aparecem na tela.
pub fn first_error_field(errors: &ValidationErrors) -> Option<Field> {
    let failing = errors.field_errors();
    Field::DISPLAY_ORDER
        .into_iter()
        .find(|field| failing.contains_key(field.as_str()))
}

/// Mapa campo -> primeira mensagem, para exibição inline.
pub fn error_messages(errors: &ValidationErrors) -> HashMap<Field, String> {
    Field::DISPLAY_ORDER
        .into_iter()
        .filter_map(|field| first_message(errors, field).map(|message| (field, message)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::authorization::{BuyerCategory, RepresentativeDocumentType};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn signature() -> SignatureImage {
        SignatureImage(vec![0x89, b'P', b'N', b'G'])
    }

    fn individual_record() -> AuthorizationRecord {
        AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Individual),
            buyer_name: "Maria Souza".into(),
            buyer_email: "maria@exemplo.com.br".into(),
            buyer_phone: "(11) 98765-4321".into(),
            buyer_tax_id: "123.456.789-01".into(),
            buyer_id_document_type: Some(IdDocumentType::NationalId),
            buyer_id_document_number: "MG1234567".into(),
            representative_name: "João Lima".into(),
            representative_id_document_type: Some(RepresentativeDocumentType::DriverLicense),
            representative_id_document_number: "01234567890".into(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            pickup_date: NaiveDate::from_ymd_opt(2026, 3, 5),
            purchase_value: "199,90".into(),
            order_number: "4567".into(),
            agreed_to_consent: true,
            ..Default::default()
        }
    }

    fn failing_fields(result: Result<(), ValidationErrors>) -> Vec<Field> {
        match result {
            Ok(()) => vec![],
            Err(errors) => error_messages(&errors).into_keys().collect(),
        }
    }

    #[test]
    fn valid_individual_passes() {
        let result = validate_record(&individual_record(), &signature(), &Attachments::default());
        assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn individual_requires_full_cpf() {
        let record = AuthorizationRecord {
            buyer_tax_id: "123.456.789".into(),
            ..individual_record()
        };

        let fields = failing_fields(validate_record(&record, &signature(), &Attachments::default()));
        assert_eq!(fields, vec![Field::BuyerTaxId]);
    }

    #[test]
    fn individual_requires_id_document() {
        let record = AuthorizationRecord {
            buyer_id_document_type: None,
            buyer_id_document_number: String::new(),
            ..individual_record()
        };

        let errors = validate_record(&record, &signature(), &Attachments::default()).unwrap_err();
        assert_eq!(first_error_field(&errors), Some(Field::BuyerIdDocumentType));
        assert!(first_message(&errors, Field::BuyerIdDocumentNumber).is_some());
    }

    #[test]
    fn buyer_document_number_follows_its_type() {
        let short_cnh = AuthorizationRecord {
            buyer_id_document_type: Some(IdDocumentType::DriverLicense),
            buyer_id_document_number: "123".into(),
            ..individual_record()
        };
        let errors =
            validate_record(&short_cnh, &signature(), &Attachments::default()).unwrap_err();
        assert_eq!(
            first_message(&errors, Field::BuyerIdDocumentNumber).as_deref(),
            Some("A CNH deve ter 11 dígitos.")
        );

        let full_cnh = AuthorizationRecord {
            buyer_id_document_number: "01234567890".into(),
            ..short_cnh
        };
        assert!(validate_record(&full_cnh, &signature(), &Attachments::default()).is_ok());

        let lowercase_rg = AuthorizationRecord {
            buyer_id_document_number: "mg-1234567".into(),
            ..individual_record()
        };
        let fields =
            failing_fields(validate_record(&lowercase_rg, &signature(), &Attachments::default()));
        assert_eq!(fields, vec![Field::BuyerIdDocumentNumber]);
    }

    #[test]
    fn order_number_must_be_up_to_eight_digits() {
        for bad in ["ABC123456789", "123456789", "45 67"] {
            let record = AuthorizationRecord {
                order_number: bad.into(),
                ..individual_record()
            };
            let fields =
                failing_fields(validate_record(&record, &signature(), &Attachments::default()));
            assert_eq!(fields, vec![Field::OrderNumber], "aceitou {:?}", bad);
        }

        let record = AuthorizationRecord {
            order_number: "12345678".into(),
            ..individual_record()
        };
        assert!(validate_record(&record, &signature(), &Attachments::default()).is_ok());
    }

    #[test]
    fn corporate_ignores_individual_fields() {
        let record = AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Corporate),
            buyer_company_id: "12.345.678/0001-99".into(),
            buyer_tax_id: "123".into(),
            buyer_id_document_type: None,
            buyer_id_document_number: String::new(),
            ..individual_record()
        };

        assert!(validate_record(&record, &signature(), &Attachments::default()).is_ok());
    }

    #[test]
    fn corporate_requires_full_cnpj() {
        let record = AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Corporate),
            buyer_company_id: "12.345.678/0001".into(),
            ..individual_record()
        };

        let fields = failing_fields(validate_record(&record, &signature(), &Attachments::default()));
        assert_eq!(fields, vec![Field::BuyerCompanyId]);
    }

    #[test]
    fn missing_signature_is_a_field_error() {
        let errors = validate_record(
            &individual_record(),
            &SignatureImage::default(),
            &Attachments::default(),
        )
        .unwrap_err();

        assert_eq!(
            first_message(&errors, Field::Signature).as_deref(),
            Some("A assinatura é obrigatória.")
        );
    }

    #[test]
    fn representative_number_only_needs_presence() {
        let record = AuthorizationRecord {
            representative_id_document_number: "1".into(),
            ..individual_record()
        };
        assert!(validate_record(&record, &signature(), &Attachments::default()).is_ok());

        let record = AuthorizationRecord {
            representative_id_document_type: None,
            ..individual_record()
        };
        let fields = failing_fields(validate_record(&record, &signature(), &Attachments::default()));
        assert_eq!(
            fields.len(),
            2,
            "tipo e número devem falhar juntos: {:?}",
            fields
        );
    }

    #[test]
    fn pickup_before_purchase_is_accepted() {
        let record = AuthorizationRecord {
            purchase_date: NaiveDate::from_ymd_opt(2026, 3, 10),
            pickup_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..individual_record()
        };

        assert!(validate_record(&record, &signature(), &Attachments::default()).is_ok());
    }

    #[test]
    fn empty_record_reports_every_rule() {
        let errors = validate_record(
            &AuthorizationRecord::default(),
            &SignatureImage::default(),
            &Attachments::default(),
        )
        .unwrap_err();

        let messages = error_messages(&errors);
        assert_eq!(first_error_field(&errors), Some(Field::BuyerCategory));
        for field in [
            Field::BuyerName,
            Field::BuyerEmail,
            Field::BuyerPhone,
            Field::RepresentativeName,
            Field::RepresentativeIdDocumentType,
            Field::RepresentativeIdDocumentNumber,
            Field::PurchaseDate,
            Field::PickupDate,
            Field::PurchaseValue,
            Field::OrderNumber,
            Field::Signature,
        ] {
            assert!(messages.contains_key(&field), "faltou erro em {:?}", field);
        }
        // Sem tipo de comprador nenhum ramo é validado
        assert!(!messages.contains_key(&Field::BuyerTaxId));
        assert!(!messages.contains_key(&Field::BuyerCompanyId));
    }

    #[test]
    fn validation_is_deterministic() {
        let record = AuthorizationRecord {
            buyer_email: "invalido".into(),
            ..individual_record()
        };

        let first = validate_record(&record, &SignatureImage::default(), &Attachments::default());
        let second = validate_record(&record, &SignatureImage::default(), &Attachments::default());
        assert_eq!(first, second);
    }

    #[test]
    fn blur_returns_only_that_field() {
        let record = AuthorizationRecord {
            buyer_name: "Jo".into(),
            ..individual_record()
        };

        assert_eq!(
            validate_field(&record, &signature(), &Attachments::default(), Field::BuyerName)
                .as_deref(),
            Some("O nome deve ter no mínimo 3 caracteres.")
        );
        assert_eq!(
            validate_field(&record, &signature(), &Attachments::default(), Field::BuyerEmail),
            None
        );
    }

    #[test]
    fn uploads_are_checked_for_size_and_type() {
        let attachments = Attachments {
            identity_document: Some(UploadedFile {
                file_name: "rg.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: vec![1, 2, 3],
            }),
            company_document: Some(UploadedFile {
                file_name: "contrato.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: vec![0; MAX_UPLOAD_BYTES + 1],
            }),
        };

        let errors =
            validate_record(&individual_record(), &signature(), &attachments).unwrap_err();

        assert_eq!(
            first_message(&errors, Field::IdentityDocument).as_deref(),
            Some("Envie uma imagem JPG, PNG ou WEBP.")
        );
        assert_eq!(
            first_message(&errors, Field::CompanyDocument).as_deref(),
            Some("O arquivo deve ter no máximo 5MB.")
        );
    }
}
