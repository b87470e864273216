// src/common/deep_links.rs

// Links pré-preenchidos usados quando o compartilhamento nativo não existe:
// o usuário baixa o PDF e encaminha por WhatsApp ou e-mail junto com o documento com foto.

pub fn forward_message(order_id: &str) -> String {
    format!(
        "Olá, estou enviando o termo de autorização e meu documento com foto para a retirada do pedido {}.",
        order_id
    )
}

pub fn email_subject(order_id: &str) -> String {
    format!(
        "Envio do Termo de Autorização de Retirada - Pedido {}",
        order_id
    )
}

pub fn whatsapp_link(phone: &str, order_id: &str) -> String {
    format!(
        "https://api.whatsapp.com/send/?phone={}&text={}&type=phone_number&app_absent=0",
        phone,
        urlencoding::encode(&forward_message(order_id))
    )
}

pub fn email_link(address: &str, order_id: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        address,
        urlencoding::encode(&email_subject(order_id)),
        urlencoding::encode(&forward_message(order_id))
    )
}
