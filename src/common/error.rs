// src/common/error.rs

use std::time::Duration;
use thiserror::Error;

// Falhas na rasterização ou na codificação do PDF.
// Nunca chegam ao canal de entrega: o pipeline aborta e o registro continua intacto.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Falha ao desenhar o termo: {0}")]
    Raster(String),

    #[error("Erro de imagem: {0}")]
    Image(#[from] image::ImageError),

    #[error("Erro ao codificar o PDF: {0}")]
    Pdf(#[from] oxidize_pdf::PdfError),

    #[error("Erro ao gerar o QR Code do pedido: {0}")]
    QrCode(#[from] qrcode::types::QrError),

    #[error("A tarefa de renderização foi interrompida: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("A renderização excedeu o tempo limite de {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Erro ao salvar o arquivo: {0}")]
    Io(#[from] std::io::Error),

    #[error("O compartilhamento falhou: {0}")]
    ShareFailed(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("É necessário aceitar o termo de consentimento")]
    ConsentRequired,

    #[error("Já existe um termo sendo gerado")]
    GenerationInProgress,

    #[error("Erro ao gerar o termo: {0}")]
    RenderError(#[from] RenderError),

    #[error("Erro ao entregar o termo: {0}")]
    DeliveryError(#[from] DeliveryError),

    // Variante genérica para erros de configuração (variáveis de ambiente inválidas etc.)
    #[error("Erro de configuração: {0}")]
    ConfigError(#[from] anyhow::Error),
}

impl AppError {
    /// Mensagem única exibida ao usuário (toast). Os detalhes ficam no log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => {
                "Um ou mais campos são inválidos. Verifique o formulário.".to_string()
            }
            AppError::ConsentRequired => {
                "Você precisa concordar com os termos para gerar o documento.".to_string()
            }
            AppError::GenerationInProgress => {
                "Aguarde, o termo já está sendo gerado.".to_string()
            }
            AppError::DeliveryError(_) => {
                "Não foi possível compartilhar o termo. Tente novamente.".to_string()
            }
            ref e => {
                tracing::error!("Erro ao gerar o termo: {}", e);
                "Ocorreu um erro ao gerar o PDF. Tente novamente.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failures_collapse_into_one_notification() {
        let raster = AppError::from(RenderError::Raster("canvas vazio".into()));
        let timeout = AppError::from(RenderError::Timeout(Duration::from_secs(5)));

        assert_eq!(raster.user_message(), timeout.user_message());
        assert_eq!(
            raster.user_message(),
            "Ocorreu um erro ao gerar o PDF. Tente novamente."
        );
    }

    #[test]
    fn consent_has_dedicated_message() {
        assert!(AppError::ConsentRequired.user_message().contains("concordar"));
    }
}
