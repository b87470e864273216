// src/lib.rs

//! Geração do Termo de Autorização de Retirada.
//!
//! O fluxo completo roda no dispositivo do usuário: o formulário é validado
//! (`services::validation_service`), o termo é desenhado em bitmap e
//! convertido em PDF (`services::document_service`) e o arquivo é entregue
//! por um `DeliveryChannel` (compartilhamento nativo ou download + links).

pub mod common;
pub mod config;
pub mod models;
pub mod services;

pub use crate::common::error::{AppError, DeliveryError, RenderError};
pub use crate::config::AppConfig;
pub use crate::models::authorization::{AuthorizationRecord, BuyerCategory};
pub use crate::services::form_controller::{FormController, SubmitOutcome, SubmitState};
