// src/models/authorization.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::common::formatters;

// --- ENUMS ---

// Discriminante: define quais campos do comprador são obrigatórios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuyerCategory {
    Individual, // Pessoa física (CPF)
    Corporate,  // Pessoa jurídica (CNPJ)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdDocumentType {
    NationalId,    // RG
    DriverLicense, // CNH
}

impl IdDocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            IdDocumentType::NationalId => "RG",
            IdDocumentType::DriverLicense => "CNH",
        }
    }

    pub fn format_number(&self, input: &str) -> String {
        match self {
            IdDocumentType::NationalId => formatters::format_national_id(input),
            IdDocumentType::DriverLicense => formatters::format_driver_license(input),
        }
    }
}

// O representante pode se identificar também pelo CPF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepresentativeDocumentType {
    NationalId,
    DriverLicense,
    TaxId,
}

impl RepresentativeDocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            RepresentativeDocumentType::NationalId => "RG",
            RepresentativeDocumentType::DriverLicense => "CNH",
            RepresentativeDocumentType::TaxId => "CPF",
        }
    }

    pub fn format_number(&self, input: &str) -> String {
        match self {
            RepresentativeDocumentType::NationalId => formatters::format_national_id(input),
            RepresentativeDocumentType::DriverLicense => formatters::format_driver_license(input),
            RepresentativeDocumentType::TaxId => formatters::format_cpf(input),
        }
    }
}

// --- LOJAS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
}

// Hoje só existe uma loja de retirada; a lista fica aberta para novas unidades.
pub const STORES: &[Store] = &[Store {
    id: "loja-centro",
    name: "Loja Centro",
    address: "Rua Direita, 100 - Centro, São Paulo - SP",
}];

pub fn find_store(id: &str) -> Option<&'static Store> {
    STORES.iter().find(|store| store.id == id)
}

fn validate_store(id: &str) -> Result<(), ValidationError> {
    if find_store(id).is_none() {
        let mut err = ValidationError::new("unknown_store");
        err.message = Some("Selecione a loja de retirada.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    // DDD + número (fixo ou celular)
    if formatters::digit_count(phone) < 10 {
        let mut err = ValidationError::new("phone");
        err.add_param("min".into(), &10);
        err.message = Some("Informe um telefone válido com DDD.".into());
        return Err(err);
    }
    Ok(())
}

// Entra no nome do arquivo, nos links e no QR Code: só dígitos
fn validate_order_number(order_number: &str) -> Result<(), ValidationError> {
    if order_number.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Informe o número do pedido.".into());
        return Err(err);
    }
    if order_number.len() > formatters::ORDER_NUMBER_MAX_DIGITS
        || !order_number.chars().all(|c| c.is_ascii_digit())
    {
        let mut err = ValidationError::new("order_number");
        err.add_param("max".into(), &formatters::ORDER_NUMBER_MAX_DIGITS);
        err.message = Some("O número do pedido deve ter até 8 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

// --- O REGISTRO ---

/// Estado do formulário. Os campos formatados guardam a string de exibição.
///
/// As regras que não dependem do tipo de comprador ficam aqui no derive;
/// as regras condicionais ficam no `validation_service`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationRecord {
    #[validate(required(message = "Selecione o tipo de comprador."))]
    pub buyer_category: Option<BuyerCategory>,

    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub buyer_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub buyer_email: String,

    #[validate(custom(function = "validate_phone"))]
    pub buyer_phone: String,

    // Ramo pessoa física
    pub buyer_tax_id: String,
    pub buyer_id_document_type: Option<IdDocumentType>,
    pub buyer_id_document_number: String,

    // Ramo pessoa jurídica
    pub buyer_company_id: String,

    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub representative_name: String,

    #[validate(required(message = "Selecione o tipo de documento."))]
    pub representative_id_document_type: Option<RepresentativeDocumentType>,

    #[validate(length(min = 1, message = "Informe o número do documento."))]
    pub representative_id_document_number: String,

    #[validate(required(message = "Informe a data da compra."))]
    pub purchase_date: Option<NaiveDate>,

    #[validate(required(message = "Informe a data da retirada."))]
    pub pickup_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Informe o valor da compra."))]
    pub purchase_value: String,

    #[validate(custom(function = "validate_order_number"))]
    pub order_number: String,

    #[validate(custom(function = "validate_store"))]
    pub pickup_store: String,

    pub agreed_to_consent: bool,
}

impl Default for AuthorizationRecord {
    // Formulário vazio, só a loja já vem selecionada
    fn default() -> Self {
        Self {
            buyer_category: None,
            buyer_name: String::new(),
            buyer_email: String::new(),
            buyer_phone: String::new(),
            buyer_tax_id: String::new(),
            buyer_id_document_type: None,
            buyer_id_document_number: String::new(),
            buyer_company_id: String::new(),
            representative_name: String::new(),
            representative_id_document_type: None,
            representative_id_document_number: String::new(),
            purchase_date: None,
            pickup_date: None,
            purchase_value: String::new(),
            order_number: String::new(),
            pickup_store: STORES[0].id.to_string(),
            agreed_to_consent: false,
        }
    }
}

impl AuthorizationRecord {
    pub fn order_id(&self) -> String {
        formatters::canonical_order_id(&self.order_number)
    }

    pub fn store(&self) -> Option<&'static Store> {
        find_store(&self.pickup_store)
    }

    /// Projeção do ramo ativo do comprador. `None` enquanto o tipo não foi escolhido.
    pub fn buyer_info(&self) -> Option<BuyerInfo<'_>> {
        match self.buyer_category? {
            BuyerCategory::Individual => Some(BuyerInfo::Individual {
                tax_id: &self.buyer_tax_id,
                id_document_type: self.buyer_id_document_type,
                id_document_number: &self.buyer_id_document_number,
            }),
            BuyerCategory::Corporate => Some(BuyerInfo::Corporate {
                company_id: &self.buyer_company_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyerInfo<'a> {
    Individual {
        tax_id: &'a str,
        id_document_type: Option<IdDocumentType>,
        id_document_number: &'a str,
    },
    Corporate {
        company_id: &'a str,
    },
}

// --- CAMPOS ---

/// Caminho de cada campo no mapa de erros.
/// `Signature`, `IdentityDocument` e `CompanyDocument` não fazem parte do registro,
/// mas recebem erros como qualquer outro campo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BuyerCategory,
    BuyerName,
    BuyerEmail,
    BuyerPhone,
    BuyerTaxId,
    BuyerCompanyId,
    BuyerIdDocumentType,
    BuyerIdDocumentNumber,
    RepresentativeName,
    RepresentativeIdDocumentType,
    RepresentativeIdDocumentNumber,
    PurchaseDate,
    PickupDate,
    PurchaseValue,
    OrderNumber,
    PickupStore,
    IdentityDocument,
    CompanyDocument,
    Signature,
    AgreedToConsent,
}

impl Field {
    // Ordem em que os campos aparecem na tela; o primeiro erro nessa ordem recebe o foco
    pub const DISPLAY_ORDER: [Field; 20] = [
        Field::BuyerCategory,
        Field::BuyerName,
        Field::BuyerTaxId,
        Field::BuyerCompanyId,
        Field::BuyerIdDocumentType,
        Field::BuyerIdDocumentNumber,
        Field::BuyerEmail,
        Field::BuyerPhone,
        Field::CompanyDocument,
        Field::RepresentativeName,
        Field::RepresentativeIdDocumentType,
        Field::RepresentativeIdDocumentNumber,
        Field::OrderNumber,
        Field::PurchaseDate,
        Field::PurchaseValue,
        Field::PickupStore,
        Field::PickupDate,
        Field::IdentityDocument,
        Field::Signature,
        Field::AgreedToConsent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::BuyerCategory => "buyer_category",
            Field::BuyerName => "buyer_name",
            Field::BuyerEmail => "buyer_email",
            Field::BuyerPhone => "buyer_phone",
            Field::BuyerTaxId => "buyer_tax_id",
            Field::BuyerCompanyId => "buyer_company_id",
            Field::BuyerIdDocumentType => "buyer_id_document_type",
            Field::BuyerIdDocumentNumber => "buyer_id_document_number",
            Field::RepresentativeName => "representative_name",
            Field::RepresentativeIdDocumentType => "representative_id_document_type",
            Field::RepresentativeIdDocumentNumber => "representative_id_document_number",
            Field::PurchaseDate => "purchase_date",
            Field::PickupDate => "pickup_date",
            Field::PurchaseValue => "purchase_value",
            Field::OrderNumber => "order_number",
            Field::PickupStore => "pickup_store",
            Field::IdentityDocument => "identity_document",
            Field::CompanyDocument => "company_document",
            Field::Signature => "signature",
            Field::AgreedToConsent => "agreed_to_consent",
        }
    }
}

// --- ANEXOS ---

/// Assinatura capturada no canvas (PNG). Vazia enquanto o usuário não desenhar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureImage(pub Vec<u8>);

impl SignatureImage {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    IdentityDocument,
    CompanyDocument, // Contrato social / cartão CNPJ
}

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

impl UploadKind {
    pub fn accepts(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        match self {
            UploadKind::IdentityDocument => IMAGE_MIME_TYPES.contains(&mime_type.as_str()),
            UploadKind::CompanyDocument => {
                IMAGE_MIME_TYPES.contains(&mime_type.as_str()) || mime_type == "application/pdf"
            }
        }
    }

    pub fn field(&self) -> Field {
        match self {
            UploadKind::IdentityDocument => Field::IdentityDocument,
            UploadKind::CompanyDocument => Field::CompanyDocument,
        }
    }
}

/// Arquivos opcionais enviados junto com o formulário.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    pub identity_document: Option<UploadedFile>,
    pub company_document: Option<UploadedFile>,
}
