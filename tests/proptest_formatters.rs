//! Propriedades das máscaras de entrada
//!
//! Toda máscara precisa ser idempotente: o registro guarda a string formatada
//! e ela é reformatada a cada tecla.

use proptest::prelude::*;
use termo_retirada::{
    common::formatters::{
        digit_count, format_cnpj, format_cpf, format_currency, format_driver_license,
        format_national_id, format_order_number, format_phone,
    },
    models::authorization::{AuthorizationRecord, BuyerCategory},
    services::form_reducer::on_category_change,
};

fn category() -> impl Strategy<Value = BuyerCategory> {
    prop_oneof![Just(BuyerCategory::Individual), Just(BuyerCategory::Corporate)]
}

proptest! {
    #[test]
    fn phone_is_idempotent(input in ".{0,30}") {
        let once = format_phone(&input);
        prop_assert_eq!(format_phone(&once), once);
    }

    #[test]
    fn cpf_and_cnpj_are_idempotent(input in "[0-9./ -]{0,25}") {
        let cpf = format_cpf(&input);
        let cnpj = format_cnpj(&input);
        prop_assert_eq!(format_cpf(&cpf), cpf.clone());
        prop_assert_eq!(format_cnpj(&cnpj), cnpj.clone());
        prop_assert!(digit_count(&cpf) <= 11);
        prop_assert!(digit_count(&cnpj) <= 14);
    }

    #[test]
    fn currency_is_idempotent(input in ".{0,20}") {
        let once = format_currency(&input);
        prop_assert_eq!(format_currency(&once), once);
    }

    #[test]
    fn currency_keeps_two_decimals(cents in 0u64..10_000_000_000) {
        let formatted = format_currency(&cents.to_string());
        let (reais, centavos) = formatted.split_once(',').unwrap();
        prop_assert_eq!(centavos.len(), 2);
        prop_assert_eq!(reais.parse::<u64>().unwrap() * 100 + centavos.parse::<u64>().unwrap(), cents);
    }

    #[test]
    fn document_numbers_are_idempotent(input in "[a-zA-Z0-9.-]{0,20}") {
        let rg = format_national_id(&input);
        let cnh = format_driver_license(&input);
        let order = format_order_number(&input);
        prop_assert_eq!(format_national_id(&rg), rg.clone());
        prop_assert_eq!(format_driver_license(&cnh), cnh.clone());
        prop_assert_eq!(format_order_number(&order), order.clone());
        prop_assert!(order.len() <= 8);
    }

    #[test]
    fn category_switch_is_idempotent(
        first in category(),
        second in category(),
        tax_id in "[0-9]{0,11}",
        company_id in "[0-9]{0,14}",
    ) {
        let record = AuthorizationRecord {
            buyer_category: Some(first),
            buyer_tax_id: format_cpf(&tax_id),
            buyer_company_id: format_cnpj(&company_id),
            ..Default::default()
        };

        let once = on_category_change(&record, second);
        let twice = on_category_change(&once, second);
        prop_assert_eq!(&once, &twice);

        match second {
            BuyerCategory::Individual => prop_assert!(once.buyer_company_id.is_empty()),
            BuyerCategory::Corporate => prop_assert!(once.buyer_tax_id.is_empty()),
        }
    }
}
