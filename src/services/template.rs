// src/services/template.rs

// Conteúdo do termo. Cada campo do modelo vem de exatamente um campo do registro
// ou de uma formatação sobre um ou dois campos (ex.: "R$ " + valor).

use crate::{
    common::formatters,
    models::authorization::{AuthorizationRecord, BuyerInfo},
};

pub const DOCUMENT_TITLE: &str = "TERMO DE AUTORIZAÇÃO DE RETIRADA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub title: &'static str,
    pub rows: Vec<FieldRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub organization_name: String,
    pub title: &'static str,
    pub declaration: String,
    pub groups: Vec<FieldGroup>, // comprador, representante, pedido
    pub order_id: String,
    pub signature_name: String,
    pub signature_document: String,
}

fn row(label: &'static str, value: impl Into<String>) -> FieldRow {
    FieldRow {
        label,
        value: value.into(),
    }
}

impl DocumentTemplate {
    pub fn populate(record: &AuthorizationRecord, organization_name: &str) -> Self {
        let order_id = record.order_id();
        let purchase_date = record
            .purchase_date
            .map(formatters::format_date)
            .unwrap_or_default();
        let pickup_date = record
            .pickup_date
            .map(formatters::format_date)
            .unwrap_or_default();
        let value = formatters::currency_display(&record.purchase_value);
        let (store_name, store_address) = match record.store() {
            Some(store) => (store.name.to_string(), store.address.to_string()),
            None => (record.pickup_store.clone(), String::new()),
        };

        let representative_document = match record.representative_id_document_type {
            Some(doc_type) => format!(
                "{} nº {}",
                doc_type.label(),
                record.representative_id_document_number
            ),
            None => record.representative_id_document_number.clone(),
        };

        // --- COMPRADOR ---
        let mut buyer_rows = vec![row("Nome", record.buyer_name.clone())];
        let (buyer_intro, signature_document) = match record.buyer_info() {
            Some(BuyerInfo::Corporate { company_id }) => {
                buyer_rows.push(row("CNPJ", company_id));
                (
                    format!(
                        "A empresa {}, inscrita no CNPJ sob o nº {}, autoriza",
                        record.buyer_name, company_id
                    ),
                    format!("CNPJ {}", company_id),
                )
            }
            Some(BuyerInfo::Individual {
                tax_id,
                id_document_type,
                id_document_number,
            }) => {
                buyer_rows.push(row("CPF", tax_id));
                let document = id_document_type
                    .map(|doc_type| format!("{} nº {}", doc_type.label(), id_document_number))
                    .unwrap_or_default();
                buyer_rows.push(row("Documento", document.clone()));
                (
                    format!(
                        "Eu, {}, inscrito(a) no CPF sob o nº {}, portador(a) do {}, autorizo",
                        record.buyer_name, tax_id, document
                    ),
                    format!("CPF {}", tax_id),
                )
            }
            None => (format!("{} autoriza", record.buyer_name), String::new()),
        };
        buyer_rows.push(row("E-mail", record.buyer_email.clone()));
        buyer_rows.push(row("Telefone", record.buyer_phone.clone()));

        let declaration = format!(
            "{} {}, portador(a) do {}, a retirar o pedido {}, realizado em {} no valor de {}, na unidade {}.",
            buyer_intro,
            record.representative_name,
            representative_document,
            order_id,
            purchase_date,
            value,
            store_name
        );

        let groups = vec![
            FieldGroup {
                title: "DADOS DO COMPRADOR",
                rows: buyer_rows,
            },
            FieldGroup {
                title: "DADOS DO AUTORIZADO",
                rows: vec![
                    row("Nome", record.representative_name.clone()),
                    row("Documento", representative_document),
                ],
            },
            FieldGroup {
                title: "DADOS DO PEDIDO",
                rows: vec![
                    row("Pedido", order_id.clone()),
                    row("Data da compra", purchase_date),
                    row("Valor", value),
                    row("Loja", store_name),
                    row("Endereço", store_address),
                    row("Data da retirada", pickup_date),
                ],
            },
        ];

        Self {
            organization_name: organization_name.to_string(),
            title: DOCUMENT_TITLE,
            declaration,
            groups,
            order_id,
            signature_name: record.buyer_name.clone(),
            signature_document,
        }
    }
}
