// src/config.rs

use anyhow::Context;
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_ORGANIZATION_NAME: &str = "Loja Matriz";
pub const DEFAULT_WHATSAPP_NUMBER: &str = "5511999990000";
pub const DEFAULT_CONTACT_EMAIL: &str = "retirada@lojamatriz.com.br";

// Desenha em 2x para o texto continuar legível na impressão
pub const DEFAULT_SUPERSAMPLING: u32 = 2;
const MAX_SUPERSAMPLING: u32 = 4;

// Limite de upload por arquivo (documento com foto / contrato social)
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub organization_name: String,
    pub whatsapp_number: String,
    pub contact_email: String,
    pub supersampling: u32,
    // Sem valor = sem timeout (a renderização termina ou falha sozinha)
    pub render_timeout: Option<Duration>,
    pub download_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            supersampling: DEFAULT_SUPERSAMPLING,
            render_timeout: None,
            download_dir: env::temp_dir(),
        }
    }
}

impl AppConfig {
    // Lê o .env (se existir) e aplica por cima dos valores padrão.
    // Diferente de um servidor, nada aqui é obrigatório.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(name) = lookup("ORGANIZATION_NAME") {
            config.organization_name = name;
        }
        if let Some(number) = lookup("WHATSAPP_NUMBER") {
            config.whatsapp_number = number;
        }
        if let Some(email) = lookup("CONTACT_EMAIL") {
            config.contact_email = email;
        }
        if let Some(raw) = lookup("SUPERSAMPLING") {
            let factor: u32 = raw
                .parse()
                .with_context(|| format!("SUPERSAMPLING inválido: {}", raw))?;
            anyhow::ensure!(
                (1..=MAX_SUPERSAMPLING).contains(&factor),
                "SUPERSAMPLING deve estar entre 1 e {}",
                MAX_SUPERSAMPLING
            );
            config.supersampling = factor;
        }
        if let Some(raw) = lookup("RENDER_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("RENDER_TIMEOUT_SECS inválido: {}", raw))?;
            config.render_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(dir) = lookup("DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }

        tracing::info!(
            organization = %config.organization_name,
            supersampling = config.supersampling,
            "✅ Configuração carregada"
        );

        Ok(config)
    }
}

/// Inicializa o logger. Pode ser chamado mais de uma vez (testes, hosts diferentes).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
