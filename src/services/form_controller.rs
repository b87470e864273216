// src/services/form_controller.rs

// Dono do registro durante a sessão de edição.
// Ciclo do submit:
//   Idle -> Validating -> ValidationFailed -> Idle (foco no primeiro erro)
//                      -> Validated -> Generating -> Delivered
//                                                 -> GenerationFailed -> Idle

use std::{collections::HashMap, sync::Arc};
use validator::ValidationErrors;

use crate::{
    common::error::AppError,
    config::AppConfig,
    models::authorization::{
        Attachments, AuthorizationRecord, Field, SignatureImage, UploadKind, UploadedFile,
    },
    services::{
        delivery::{self, DeliveryChannel, DeliveryReport, DirectoryFileSink, ShareTarget},
        document_service::DocumentService,
        form_reducer::{self, FieldChange},
        session_store::SessionStore,
        validation_service,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    ValidationFailed { focus: Field },
    Validated,
    Generating,
    Delivered,
    GenerationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected {
        focus: Field,
        errors: HashMap<Field, String>,
        notification: String,
    },
    Delivered(DeliveryReport),
    Failed {
        notification: String,
    },
    // Já existe uma geração em andamento
    Busy {
        notification: String,
    },
}

pub struct FormController {
    record: AuthorizationRecord,
    signature: SignatureImage,
    attachments: Attachments,
    errors: HashMap<Field, String>,
    state: SubmitState,
    history: Vec<SubmitState>,
    session: Arc<dyn SessionStore>,
    documents: DocumentService,
    channel: Arc<dyn DeliveryChannel>,
}

impl FormController {
    pub fn new(
        session: Arc<dyn SessionStore>,
        documents: DocumentService,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            record: AuthorizationRecord::default(),
            signature: SignatureImage::default(),
            attachments: Attachments::default(),
            errors: HashMap::new(),
            state: SubmitState::Idle,
            history: vec![SubmitState::Idle],
            session,
            documents,
            channel,
        }
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_config(
        config: &AppConfig,
        session: Arc<dyn SessionStore>,
        share_target: Option<Arc<dyn ShareTarget>>,
    ) -> Self {
        let sink = Arc::new(DirectoryFileSink::new(config.download_dir.clone()));
        let channel = delivery::select_channel(share_target, sink, config);
        Self::new(session, DocumentService::new(config), channel)
    }

    pub fn record(&self) -> &AuthorizationRecord {
        &self.record
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Transições do último submit, a partir do estado em que ele começou.
    pub fn history(&self) -> &[SubmitState] {
        &self.history
    }

    pub fn errors(&self) -> &HashMap<Field, String> {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// O botão de gerar só fica desabilitado durante a geração.
    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::Generating
    }

    // --- AVISO INICIAL ---

    pub fn should_show_intro(&self) -> bool {
        !self.session.intro_seen()
    }

    pub fn dismiss_intro(&self) {
        self.session.mark_intro_seen();
    }

    // --- EDIÇÃO ---

    pub fn change(&mut self, change: FieldChange) {
        let changed = change.field();
        let (next, touched) = form_reducer::apply_change(&self.record, change);
        self.record = next;

        // Dependentes limpos são revalidados; o próprio campo só se já mostrava erro
        for field in touched {
            if field != changed || self.errors.contains_key(&field) {
                self.refresh(field);
            }
        }
    }

    pub fn blur(&mut self, field: Field) {
        self.refresh(field);
    }

    pub fn set_signature(&mut self, signature: SignatureImage) {
        self.signature = signature;
        if self.errors.contains_key(&Field::Signature) {
            self.refresh(Field::Signature);
        }
    }

    // Limpar o quadro conta como tocar no campo
    pub fn clear_signature(&mut self) {
        self.signature = SignatureImage::default();
        self.refresh(Field::Signature);
    }

    pub fn attach(&mut self, kind: UploadKind, file: UploadedFile) {
        match kind {
            UploadKind::IdentityDocument => self.attachments.identity_document = Some(file),
            UploadKind::CompanyDocument => self.attachments.company_document = Some(file),
        }
        self.refresh(kind.field());
    }

    fn refresh(&mut self, field: Field) {
        let message = if field == Field::AgreedToConsent {
            let mut errors = ValidationErrors::new();
            validation_service::check_consent(&self.record, &mut errors);
            validation_service::first_message(&errors, field)
        } else {
            validation_service::validate_field(
                &self.record,
                &self.signature,
                &self.attachments,
                field,
            )
        };

        match message {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn transition(&mut self, next: SubmitState) {
        tracing::debug!(from = ?self.state, to = ?next, "Transição do formulário");
        self.state = next.clone();
        self.history.push(next);
    }

    // --- SUBMIT ---

    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            tracing::warn!("Submit ignorado: geração em andamento");
            return SubmitOutcome::Busy {
                notification: AppError::GenerationInProgress.user_message(),
            };
        }

        // Cada submit recomeça o histórico
        self.history.clear();
        self.history.push(self.state.clone());

        // 1. Validação completa + trava de consentimento
        self.transition(SubmitState::Validating);
        let mut errors = match validation_service::validate_record(
            &self.record,
            &self.signature,
            &self.attachments,
        ) {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        validation_service::check_consent(&self.record, &mut errors);

        if let Some(focus) = validation_service::first_error_field(&errors) {
            self.errors = validation_service::error_messages(&errors);
            let notification = if focus == Field::AgreedToConsent {
                AppError::ConsentRequired.user_message()
            } else {
                AppError::ValidationError(errors).user_message()
            };
            tracing::info!(focus = ?focus, "Formulário com erros");

            self.transition(SubmitState::ValidationFailed { focus });
            self.transition(SubmitState::Idle);
            return SubmitOutcome::Rejected {
                focus,
                errors: self.errors.clone(),
                notification,
            };
        }
        self.errors.clear();
        self.transition(SubmitState::Validated);

        // 2. Geração + entrega sobre uma cópia do registro
        self.transition(SubmitState::Generating);
        let snapshot = self.record.clone();
        let result = self
            .documents
            .generate_and_deliver(&snapshot, &self.signature, self.channel.as_ref())
            .await;

        match result {
            Ok(report) => {
                self.transition(SubmitState::Delivered);
                SubmitOutcome::Delivered(report)
            }
            Err(e) => {
                let notification = e.user_message();
                self.transition(SubmitState::GenerationFailed);
                self.transition(SubmitState::Idle);
                SubmitOutcome::Failed { notification }
            }
        }
    }
}
