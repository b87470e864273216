// src/services/delivery.rs

// Como o PDF chega ao usuário.
// O document_service só conhece o trait DeliveryChannel; quem decide entre
// compartilhamento nativo e download + links é `select_channel`, na montagem.

use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};

use crate::{
    common::{deep_links, error::DeliveryError},
    config::AppConfig,
};

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub fn artifact_file_name(order_id: &str) -> String {
    format!("authorization_{}.pdf", order_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact {
    pub order_id: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentArtifact {
    pub fn new(order_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        let order_id = order_id.into();
        Self {
            file_name: artifact_file_name(&order_id),
            order_id,
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Ponte com o compartilhamento nativo da plataforma (fornecida pelo host).
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// A plataforma aceita compartilhar arquivos (não só texto/links)?
    fn can_share_files(&self) -> bool;

    async fn share(&self, request: ShareRequest) -> Result<(), DeliveryError>;
}

/// Onde o arquivo é salvo quando não há compartilhamento nativo.
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError>;
}

/// Conteúdo do diálogo de instruções exibido depois do download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualForwardInstructions {
    pub file_name: String,
    pub saved_to: PathBuf,
    pub whatsapp_link: String,
    pub email_link: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    Shared { title: String },
    SavedForManualForward(ManualForwardInstructions),
}

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, artifact: &DocumentArtifact) -> Result<DeliveryReport, DeliveryError>;
}

// =========================================================================
//  1. COMPARTILHAMENTO NATIVO
// =========================================================================

pub struct NativeShareChannel {
    target: Arc<dyn ShareTarget>,
}

impl NativeShareChannel {
    pub fn new(target: Arc<dyn ShareTarget>) -> Self {
        Self { target }
    }
}

#[async_trait]
impl DeliveryChannel for NativeShareChannel {
    async fn deliver(&self, artifact: &DocumentArtifact) -> Result<DeliveryReport, DeliveryError> {
        let title = format!("Termo de Autorização - Pedido {}", artifact.order_id);
        let request = ShareRequest {
            title: title.clone(),
            text: format!(
                "Segue o termo de autorização de retirada do pedido {}. \
                 Envie junto uma foto do documento com foto do comprador.",
                artifact.order_id
            ),
            file_name: artifact.file_name.clone(),
            mime_type: PDF_MIME_TYPE,
            bytes: artifact.bytes.clone(),
        };

        self.target.share(request).await?;
        tracing::info!(order_id = %artifact.order_id, "📤 Termo compartilhado");

        Ok(DeliveryReport::Shared { title })
    }
}

// =========================================================================
//  2. DOWNLOAD + ENCAMINHAMENTO MANUAL
// =========================================================================

pub struct SaveAndForwardChannel {
    sink: Arc<dyn FileSink>,
    whatsapp_number: String,
    contact_email: String,
}

impl SaveAndForwardChannel {
    pub fn new(sink: Arc<dyn FileSink>, whatsapp_number: &str, contact_email: &str) -> Self {
        Self {
            sink,
            whatsapp_number: whatsapp_number.to_string(),
            contact_email: contact_email.to_string(),
        }
    }
}

#[async_trait]
impl DeliveryChannel for SaveAndForwardChannel {
    async fn deliver(&self, artifact: &DocumentArtifact) -> Result<DeliveryReport, DeliveryError> {
        let saved_to = self.sink.save(&artifact.file_name, &artifact.bytes).await?;
        tracing::info!(path = %saved_to.display(), "💾 Termo salvo para envio manual");

        Ok(DeliveryReport::SavedForManualForward(ManualForwardInstructions {
            file_name: artifact.file_name.clone(),
            saved_to,
            whatsapp_link: deep_links::whatsapp_link(&self.whatsapp_number, &artifact.order_id),
            email_link: deep_links::email_link(&self.contact_email, &artifact.order_id),
            steps: vec![
                format!(
                    "O arquivo {} foi salvo no seu dispositivo (pasta de downloads).",
                    artifact.file_name
                ),
                "Tire uma foto nítida do seu documento com foto (RG ou CNH).".to_string(),
                "Envie o termo e a foto pelo WhatsApp ou por e-mail usando os botões abaixo."
                    .to_string(),
            ],
        }))
    }
}

/// Grava o PDF num diretório local (downloads).
pub struct DirectoryFileSink {
    dir: PathBuf,
}

impl DirectoryFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileSink for DirectoryFileSink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Escolhe o canal conforme a capacidade da plataforma.
/// Sem compartilhamento de arquivos não é erro: cai no download + links.
pub fn select_channel(
    share_target: Option<Arc<dyn ShareTarget>>,
    sink: Arc<dyn FileSink>,
    config: &AppConfig,
) -> Arc<dyn DeliveryChannel> {
    match share_target {
        Some(target) if target.can_share_files() => {
            tracing::debug!("Compartilhamento nativo disponível");
            Arc::new(NativeShareChannel::new(target))
        }
        _ => {
            tracing::debug!("Compartilhamento nativo indisponível, usando download");
            Arc::new(SaveAndForwardChannel::new(
                sink,
                &config.whatsapp_number,
                &config.contact_email,
            ))
        }
    }
}
