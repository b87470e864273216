// src/services/session_store.rs

// O único estado que sobrevive dentro da sessão: se o aviso inicial já foi fechado.
// O controller recebe o store na construção, então os testes escolhem o estado inicial.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

pub trait SessionStore: Send + Sync {
    fn intro_seen(&self) -> bool;
    fn mark_intro_seen(&self);
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    intro_seen: Arc<AtomicBool>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intro_seen(seen: bool) -> Self {
        Self {
            intro_seen: Arc::new(AtomicBool::new(seen)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn intro_seen(&self) -> bool {
        self.intro_seen.load(Ordering::Relaxed)
    }

    fn mark_intro_seen(&self) {
        self.intro_seen.store(true, Ordering::Relaxed);
    }
}
