pub mod delivery;
pub mod document_service;
pub mod form_controller;
pub mod form_reducer;
pub mod pdf_encoder;
pub mod rasterizer;
pub mod session_store;
pub mod template;
pub mod validation_service;
