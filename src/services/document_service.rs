// src/services/document_service.rs

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    common::error::{AppError, RenderError},
    config::AppConfig,
    models::authorization::{AuthorizationRecord, SignatureImage},
    services::{
        delivery::{DeliveryChannel, DeliveryReport, DocumentArtifact},
        pdf_encoder, rasterizer,
        template::DocumentTemplate,
    },
};

// Template "montado" fora da tela enquanto é rasterizado.
// O Drop desmonta em qualquer saída: sucesso, erro ou pânico na task.
struct TemplateMount {
    template: DocumentTemplate,
    mounted: Arc<AtomicUsize>,
}

impl TemplateMount {
    fn attach(template: DocumentTemplate, mounted: Arc<AtomicUsize>) -> Self {
        mounted.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(order_id = %template.order_id, "Template montado");
        Self { template, mounted }
    }

    fn template(&self) -> &DocumentTemplate {
        &self.template
    }
}

impl Drop for TemplateMount {
    fn drop(&mut self) {
        self.mounted.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(order_id = %self.template.order_id, "Template desmontado");
    }
}

#[derive(Clone)]
pub struct DocumentService {
    organization_name: String,
    supersampling: u32,
    render_timeout: Option<Duration>,
    mounted: Arc<AtomicUsize>,
}

impl DocumentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            organization_name: config.organization_name.clone(),
            supersampling: config.supersampling,
            render_timeout: config.render_timeout,
            mounted: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Quantos templates estão montados agora (0 fora de uma geração).
    pub fn mounted_templates(&self) -> usize {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Gera o PDF do termo a partir de um registro já validado.
    ///
    /// Quem chama DEVE serializar as chamadas: no máximo uma geração em andamento
    /// por registro. Depois de iniciada, a rasterização não pode ser cancelada;
    /// com `render_timeout` configurado a espera é abandonada, mas a task
    /// bloqueante termina sozinha. O registro é só lido.
    pub async fn generate_authorization_pdf(
        &self,
        record: &AuthorizationRecord,
        signature: &SignatureImage,
    ) -> Result<DocumentArtifact, RenderError> {
        let order_id = record.order_id();
        let title = format!("Termo de Autorização de Retirada - Pedido {}", order_id);

        // 1. Preenche o template
        let mount = TemplateMount::attach(
            DocumentTemplate::populate(record, &self.organization_name),
            self.mounted.clone(),
        );
        let signature = signature.as_bytes().to_vec();
        let scale = self.supersampling;

        // 2. Rasteriza + 3. Codifica, fora da thread de interação
        let task = tokio::task::spawn_blocking(move || {
            let raster = rasterizer::rasterize(mount.template(), &signature, scale)?;
            drop(mount);
            pdf_encoder::encode_pdf(&raster, &title)
        });

        let bytes = match self.render_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| RenderError::Timeout(limit))???,
            None => task.await??,
        };

        tracing::info!(order_id = %order_id, bytes = bytes.len(), "✅ Termo gerado");
        Ok(DocumentArtifact::new(order_id, bytes))
    }

    /// Gera e entrega. Nenhum artefato parcial chega ao canal: se a geração
    /// falhar, o canal nem é chamado.
    pub async fn generate_and_deliver(
        &self,
        record: &AuthorizationRecord,
        signature: &SignatureImage,
        channel: &dyn DeliveryChannel,
    ) -> Result<DeliveryReport, AppError> {
        let artifact = self.generate_authorization_pdf(record, signature).await?;
        let report = channel.deliver(&artifact).await?;
        Ok(report)
    }
}
