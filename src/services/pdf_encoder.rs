// src/services/pdf_encoder.rs

use image::{RgbImage, codecs::jpeg::JpegEncoder};
use oxidize_pdf::{Document, Image, Page};

use crate::common::error::RenderError;

// Largura A4 em pontos. A altura sai da proporção do bitmap:
// conteúdo muito alto não é paginado, a página só fica mais comprida.
pub const PAGE_WIDTH_PT: f64 = 595.28;
const JPEG_QUALITY: u8 = 92;
const IMAGE_NAME: &str = "Termo";

pub fn page_height_for(width_px: u32, height_px: u32) -> f64 {
    PAGE_WIDTH_PT * height_px as f64 / width_px as f64
}

/// Codifica o bitmap numa página única de PDF.
pub fn encode_pdf(raster: &RgbImage, title: &str) -> Result<Vec<u8>, RenderError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Raster("bitmap vazio".to_string()));
    }

    // 1. Bitmap -> JPEG (embutido direto como DCTDecode)
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(raster)?;

    // 2. Página com a largura fixa e altura proporcional
    let page_height = page_height_for(width, height);
    let mut page = Page::new(PAGE_WIDTH_PT, page_height);
    page.add_image(IMAGE_NAME, Image::from_jpeg_data(jpeg)?);
    page.draw_image(IMAGE_NAME, 0.0, 0.0, PAGE_WIDTH_PT, page_height)?;

    // 3. Documento
    let mut doc = Document::new();
    doc.set_title(title);
    doc.set_creator("termo-retirada");
    doc.add_page(page);

    let mut buffer = Vec::new();
    doc.write(&mut buffer)?;

    tracing::debug!(bytes = buffer.len(), page_height, "PDF codificado");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn height_follows_aspect_ratio() {
        assert!((page_height_for(1588, 2246) - 841.89).abs() < 0.1);
        assert!((page_height_for(100, 400) - PAGE_WIDTH_PT * 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn encodes_single_page_with_embedded_jpeg() {
        let raster = RgbImage::from_pixel(200, 300, Rgb([255, 255, 255]));

        let pdf = encode_pdf(&raster, "Termo V4567RIHP-01").unwrap();
        let content = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-"));
        assert!(content.contains("/Count 1"));
        assert!(content.contains("DCTDecode"));
    }

    #[test]
    fn empty_bitmap_is_rejected() {
        let raster = RgbImage::new(0, 0);
        assert!(matches!(encode_pdf(&raster, "x"), Err(RenderError::Raster(_))));
    }
}
