// src/common/formatters.rs

// Máscaras de entrada do formulário.
// Todas guardam a string já formatada (não os dígitos crus) e são idempotentes:
// aplicar o formatador numa string já formatada devolve a mesma string.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const PHONE_MASK: &str = "(##) #####-####";
pub const CPF_MASK: &str = "###.###.###-##";
pub const CNPJ_MASK: &str = "##.###.###/####-##";

pub const CPF_DIGITS: usize = 11;
pub const CNPJ_DIGITS: usize = 14;
pub const DRIVER_LICENSE_DIGITS: usize = 11;
pub const NATIONAL_ID_MAX_LEN: usize = 14;
pub const ORDER_NUMBER_MAX_DIGITS: usize = 8;

// 13 dígitos = até R$ 99.999.999.999,99, cabe folgado num i64
const CURRENCY_MAX_DIGITS: usize = 13;

pub const ORDER_ID_PREFIX: &str = "V";
pub const ORDER_ID_SUFFIX: &str = "RIHP-01";

pub fn only_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn digit_count(input: &str) -> usize {
    input.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Encaixa os dígitos nas posições `#` da máscara.
///
/// Os literais só aparecem quando ainda existe um dígito para vir depois deles,
/// então "1198" vira "(11) 98" e não "(11) 98___-____". Dígitos além da
/// capacidade da máscara são descartados.
pub fn apply_mask(input: &str, mask: &str) -> String {
    let digits = only_digits(input);
    let mut digits = digits.chars().peekable();
    let mut out = String::with_capacity(mask.len());

    for slot in mask.chars() {
        if digits.peek().is_none() {
            break;
        }
        if slot == '#' {
            if let Some(d) = digits.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }

    out
}

pub fn format_phone(input: &str) -> String {
    apply_mask(input, PHONE_MASK)
}

pub fn format_cpf(input: &str) -> String {
    apply_mask(input, CPF_MASK)
}

pub fn format_cnpj(input: &str) -> String {
    apply_mask(input, CNPJ_MASK)
}

/// RG: letras maiúsculas e números, sem pontuação.
pub fn format_national_id(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(NATIONAL_ID_MAX_LEN)
        .collect()
}

/// CNH: somente os 11 dígitos do registro.
pub fn format_driver_license(input: &str) -> String {
    only_digits(input).chars().take(DRIVER_LICENSE_DIGITS).collect()
}

pub fn format_order_number(input: &str) -> String {
    only_digits(input).chars().take(ORDER_NUMBER_MAX_DIGITS).collect()
}

/// Valor em reais a partir dos dígitos digitados: "19990" -> "199,90".
///
/// Entrada sem dígitos devolve string vazia (e não "0,00").
pub fn format_currency(input: &str) -> String {
    let digits: String = only_digits(input)
        .trim_start_matches('0')
        .chars()
        .take(CURRENCY_MAX_DIGITS)
        .collect();

    if digits.is_empty() {
        // "0" ou "000" digitados continuam sendo um valor
        return if input.chars().any(|c| c.is_ascii_digit()) {
            "0,00".to_string()
        } else {
            String::new()
        };
    }

    match digits.parse::<i64>() {
        Ok(cents) => Decimal::new(cents, 2).to_string().replace('.', ","),
        Err(_) => String::new(),
    }
}

/// "199,90" -> "R$ 199,90"
pub fn currency_display(value: &str) -> String {
    format!("R$ {}", value)
}

/// Identificador canônico do pedido: `V{número}RIHP-01`.
pub fn canonical_order_id(order_number: &str) -> String {
    format!("{}{}{}", ORDER_ID_PREFIX, order_number, ORDER_ID_SUFFIX)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
