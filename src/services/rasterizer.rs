// src/services/rasterizer.rs

// Desenha o termo num bitmap. Tudo é calculado em pixels do dispositivo
// (medida base × fator de supersampling) para o texto sair nítido na impressão.
// O texto usa a fonte bitmap 8x8, então não depende de arquivos de fonte.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{DynamicImage, Rgba, RgbaImage, RgbImage, imageops};
use qrcode::{Color, QrCode};

use crate::{common::error::RenderError, services::template::DocumentTemplate};

// A4 a 96 dpi
pub const BASE_WIDTH: u32 = 794;
const MARGIN: u32 = 48;
const HEADER_HEIGHT: u32 = 72;
const LABEL_COLUMN: u32 = 170;
const SIGNATURE_BOX: (u32, u32) = (320, 110);
const QR_BOX: u32 = 110;
const QR_QUIET_ZONE: u32 = 2;

const TITLE_SIZE: f32 = 2.5;
const HEADING_SIZE: f32 = 1.75;
const BODY_SIZE: f32 = 1.5;
const SMALL_SIZE: f32 = 1.25;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([33, 33, 33, 255]);
const MUTED: Rgba<u8> = Rgba([110, 110, 110, 255]);
const BRAND: Rgba<u8> = Rgba([200, 16, 46, 255]);
const GROUP_BG: Rgba<u8> = Rgba([238, 238, 238, 255]);
const RULE: Rgba<u8> = Rgba([170, 170, 170, 255]);

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Rect { x: u32, y: u32, w: u32, h: u32, color: Rgba<u8> },
    Text { x: u32, y: u32, dot: u32, color: Rgba<u8>, text: String },
    Qr { x: u32, y: u32, module: u32 },
    Signature { x: u32, y: u32, w: u32, h: u32 },
}

// Primeira passada: posiciona tudo e descobre a altura final
struct Layout {
    scale: u32,
    width: u32,
    y: u32,
    ops: Vec<DrawOp>,
}

impl Layout {
    fn new(scale: u32) -> Self {
        Self {
            scale,
            width: BASE_WIDTH * scale,
            y: 0,
            ops: Vec::new(),
        }
    }

    fn px(&self, base: u32) -> u32 {
        base * self.scale
    }

    fn dot(&self, size: f32) -> u32 {
        ((size * self.scale as f32).round() as u32).max(1)
    }

    fn char_width(&self, size: f32) -> u32 {
        self.dot(size) * 8
    }

    fn line_height(&self, size: f32) -> u32 {
        self.dot(size) * 8 + self.px(6)
    }

    fn max_chars(&self, size: f32, available: u32) -> usize {
        ((available / self.char_width(size)) as usize).max(1)
    }

    fn content_width(&self) -> u32 {
        self.width - 2 * self.px(MARGIN)
    }

    fn rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn text(&mut self, x: u32, y: u32, size: f32, color: Rgba<u8>, text: impl Into<String>) {
        let dot = self.dot(size);
        self.ops.push(DrawOp::Text {
            x,
            y,
            dot,
            color,
            text: text.into(),
        });
    }

    fn frame(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let t = self.scale.max(1);
        self.rect(x, y, w, t, RULE);
        self.rect(x, y + h.saturating_sub(t), w, t, RULE);
        self.rect(x, y, t, h, RULE);
        self.rect(x + w.saturating_sub(t), y, t, h, RULE);
    }

    // Texto com quebra de linha; avança o cursor
    fn paragraph(&mut self, x: u32, available: u32, size: f32, color: Rgba<u8>, text: &str) {
        let max = self.max_chars(size, available);
        for line in wrap(text, max) {
            let y = self.y;
            self.text(x, y, size, color, line);
            self.y += self.line_height(size);
        }
    }

    fn header(&mut self, organization_name: &str) {
        let band = self.px(HEADER_HEIGHT);
        let width = self.width;
        self.rect(0, 0, width, band, BRAND);

        // Marca: quadrado branco com a inicial da organização
        let (mx, my, side) = (self.px(MARGIN), self.px(16), self.px(40));
        self.rect(mx, my, side, side, WHITE);
        let initial: String = organization_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();
        let mark = self.char_width(3.0);
        self.text(
            mx + side.saturating_sub(mark) / 2,
            my + side.saturating_sub(mark) / 2,
            3.0,
            BRAND,
            initial,
        );

        let name_x = mx + side + self.px(16);
        let name_y = band.saturating_sub(self.char_width(TITLE_SIZE)) / 2;
        let max = self.max_chars(TITLE_SIZE, width.saturating_sub(name_x + self.px(MARGIN)));
        let name: String = organization_name.chars().take(max).collect();
        self.text(name_x, name_y, TITLE_SIZE, WHITE, name);

        self.y = band + self.px(24);
    }

    fn title(&mut self, title: &str) {
        let text_width = self.char_width(TITLE_SIZE) * title.chars().count() as u32;
        let x = self.width.saturating_sub(text_width) / 2;
        let y = self.y;
        self.text(x, y, TITLE_SIZE, INK, title);
        self.y += self.line_height(TITLE_SIZE) + self.px(16);
    }

    fn group(&mut self, title: &str, rows: &[(&str, &str)]) {
        let (x, w) = (self.px(MARGIN), self.content_width());
        let top = self.y;
        let pad = self.px(8);

        let bar = self.line_height(HEADING_SIZE) + pad;
        self.rect(x, top, w, bar, GROUP_BG);
        self.text(x + self.px(12), top + pad, HEADING_SIZE, INK, title);
        self.y = top + bar + pad;

        let value_x = x + self.px(LABEL_COLUMN);
        let value_width = w.saturating_sub(self.px(LABEL_COLUMN) + self.px(12));
        for (label, value) in rows {
            let y = self.y;
            self.text(x + self.px(12), y, BODY_SIZE, MUTED, format!("{}:", label));
            self.paragraph(value_x, value_width, BODY_SIZE, INK, value);
            // Valor vazio ainda ocupa a linha
            if self.y == y {
                self.y += self.line_height(BODY_SIZE);
            }
        }

        self.y += pad;
        let bottom = self.y;
        self.frame(x, top, w, bottom - top);
        self.y += self.px(16);
    }

    fn signature_and_qr(&mut self, template: &DocumentTemplate, qr_width: u32) {
        let top = self.y + self.px(8);
        let x = self.px(MARGIN);

        // --- ASSINATURA ---
        self.text(x, top, SMALL_SIZE, MUTED, "Assinatura do comprador:");
        let box_y = top + self.line_height(SMALL_SIZE);
        let (w, h) = (self.px(SIGNATURE_BOX.0), self.px(SIGNATURE_BOX.1));
        self.ops.push(DrawOp::Signature { x, y: box_y, w, h });

        let line_y = box_y + h;
        let thickness = self.scale.max(1);
        self.rect(x, line_y, w, thickness, INK);

        self.y = line_y + self.px(6);
        self.paragraph(x, w, BODY_SIZE, INK, &template.signature_name);
        self.paragraph(x, w, SMALL_SIZE, MUTED, &template.signature_document);
        let left_bottom = self.y;

        // --- QR CODE DO PEDIDO ---
        let modules = qr_width + 2 * QR_QUIET_ZONE;
        let module = (self.px(QR_BOX) / modules).max(1);
        let size = module * modules;
        let qr_x = self.width.saturating_sub(self.px(MARGIN) + size);
        self.ops.push(DrawOp::Qr {
            x: qr_x,
            y: top,
            module,
        });
        let caption = format!("Pedido {}", template.order_id);
        let caption_width = self.char_width(SMALL_SIZE) * caption.chars().count() as u32;
        let caption_x = (qr_x + size).saturating_sub(caption_width);
        self.text(caption_x, top + size + self.px(4), SMALL_SIZE, MUTED, caption);
        let right_bottom = top + size + self.px(4) + self.line_height(SMALL_SIZE);

        self.y = left_bottom.max(right_bottom) + self.px(MARGIN);
    }
}

/// Quebra o texto em linhas de até `max_chars` caracteres.
/// Palavras maiores que a linha são cortadas.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.chars().take(max_chars).collect());
            word = word.chars().skip(max_chars).collect();
        }
        if word.is_empty() {
            continue;
        }

        let line_len = line.chars().count();
        let word_len = word.chars().count();
        if !line.is_empty() && line_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

// Segunda passada: pinta as operações
struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, WHITE),
        }
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        let x_end = x.saturating_add(w).min(self.image.width());
        let y_end = y.saturating_add(h).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    fn text(&mut self, x: u32, y: u32, dot: u32, color: Rgba<u8>, text: &str) {
        let advance = dot * 8;
        for (i, c) in text.chars().enumerate() {
            let origin = x + i as u32 * advance;
            for (row, bits) in glyph(c).into_iter().enumerate() {
                for col in 0..8u32 {
                    // bit 0 é o pixel mais à esquerda
                    if (bits >> col) & 1 == 1 {
                        self.fill(origin + col * dot, y + row as u32 * dot, dot, dot, color);
                    }
                }
            }
        }
    }

    fn qr(&mut self, x: u32, y: u32, module: u32, code: &QrCode) {
        let width = code.width();
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let mx = (i % width) as u32 + QR_QUIET_ZONE;
                let my = (i / width) as u32 + QR_QUIET_ZONE;
                self.fill(x + mx * module, y + my * module, module, module, INK);
            }
        }
    }

    // Assinatura ajustada à caixa mantendo a proporção
    fn signature(&mut self, x: u32, y: u32, w: u32, h: u32, png: &[u8]) -> Result<(), RenderError> {
        let signature = image::load_from_memory(png)?.to_rgba8();
        let (sw, sh) = signature.dimensions();
        if sw == 0 || sh == 0 {
            return Err(RenderError::Raster("assinatura sem pixels".to_string()));
        }

        let ratio = (w as f32 / sw as f32).min(h as f32 / sh as f32);
        let fw = ((sw as f32 * ratio).round() as u32).max(1);
        let fh = ((sh as f32 * ratio).round() as u32).max(1);
        let resized = imageops::resize(&signature, fw, fh, imageops::FilterType::Triangle);

        let ox = x + (w - fw.min(w)) / 2;
        let oy = y + (h - fh.min(h)) / 2;
        imageops::overlay(&mut self.image, &resized, ox as i64, oy as i64);
        Ok(())
    }
}

/// Rasteriza o termo preenchido. Operação bloqueante: quem chama deve rodar
/// isso fora da thread de interação (ver `document_service`).
pub fn rasterize(
    template: &DocumentTemplate,
    signature_png: &[u8],
    scale: u32,
) -> Result<RgbImage, RenderError> {
    if scale == 0 {
        return Err(RenderError::Raster("fator de escala inválido".to_string()));
    }

    let code = QrCode::new(template.order_id.as_bytes())?;

    // 1. Layout
    let mut layout = Layout::new(scale);
    layout.header(&template.organization_name);
    layout.title(template.title);
    let (margin, content_width) = (layout.px(MARGIN), layout.content_width());
    layout.paragraph(margin, content_width, BODY_SIZE, INK, &template.declaration);
    layout.y += margin / 3;
    for group in &template.groups {
        let rows: Vec<(&str, &str)> = group
            .rows
            .iter()
            .map(|row| (row.label, row.value.as_str()))
            .collect();
        layout.group(group.title, &rows);
    }
    layout.signature_and_qr(template, code.width() as u32);

    // 2. Pintura
    let mut canvas = Canvas::new(layout.width, layout.y);
    for op in &layout.ops {
        match op {
            DrawOp::Rect { x, y, w, h, color } => canvas.fill(*x, *y, *w, *h, *color),
            DrawOp::Text { x, y, dot, color, text } => canvas.text(*x, *y, *dot, *color, text),
            DrawOp::Qr { x, y, module } => canvas.qr(*x, *y, *module, &code),
            DrawOp::Signature { x, y, w, h } => canvas.signature(*x, *y, *w, *h, signature_png)?,
        }
    }

    tracing::debug!(
        width = layout.width,
        height = layout.y,
        scale,
        "Termo rasterizado"
    );

    // JPEG não tem canal alfa; o fundo já é branco opaco
    Ok(DynamicImage::ImageRgba8(canvas.image).into_rgb8())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::authorization::{
        AuthorizationRecord, BuyerCategory, IdDocumentType, RepresentativeDocumentType,
    };
    use chrono::NaiveDate;
    use std::io::Cursor;

    pub(crate) fn signature_png() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(120, 40, Rgba([0, 0, 0, 0]));
        for x in 10..110 {
            img.put_pixel(x, 20, Rgba([0, 0, 0, 255]));
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn template() -> DocumentTemplate {
        let record = AuthorizationRecord {
            buyer_category: Some(BuyerCategory::Individual),
            buyer_name: "Maria Souza".into(),
            buyer_email: "maria@exemplo.com.br".into(),
            buyer_phone: "(11) 98765-4321".into(),
            buyer_tax_id: "123.456.789-01".into(),
            buyer_id_document_type: Some(IdDocumentType::NationalId),
            buyer_id_document_number: "MG1234567".into(),
            representative_name: "João Lima".into(),
            representative_id_document_type: Some(RepresentativeDocumentType::TaxId),
            representative_id_document_number: "987.654.321-00".into(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            pickup_date: NaiveDate::from_ymd_opt(2026, 3, 5),
            purchase_value: "199,90".into(),
            order_number: "4567".into(),
            ..Default::default()
        };
        DocumentTemplate::populate(&record, "Loja Matriz")
    }

    #[test]
    fn wrap_respects_width() {
        assert_eq!(wrap("um dois tres", 7), vec!["um dois", "tres"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn supersampling_scales_the_bitmap() {
        let single = rasterize(&template(), &signature_png(), 1).unwrap();
        let double = rasterize(&template(), &signature_png(), 2).unwrap();

        assert_eq!(single.width(), BASE_WIDTH);
        assert_eq!(double.width(), BASE_WIDTH * 2);
        assert!(double.height() > single.height());
    }

    #[test]
    fn rasterization_is_deterministic() {
        let a = rasterize(&template(), &signature_png(), 2).unwrap();
        let b = rasterize(&template(), &signature_png(), 2).unwrap();

        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn header_band_uses_brand_color() {
        let img = rasterize(&template(), &signature_png(), 1).unwrap();

        assert_eq!(img.get_pixel(2, 2).0, [200, 16, 46]);
        assert_eq!(img.get_pixel(2, img.height() - 2).0, [255, 255, 255]);
    }

    #[test]
    fn invalid_signature_is_a_render_error() {
        let result = rasterize(&template(), b"nao e png", 2);
        assert!(matches!(result, Err(RenderError::Image(_))));
    }

    #[test]
    fn latin_glyphs_are_available() {
        for c in ['ç', 'ã', 'é', 'Ç'] {
            assert_ne!(glyph(c), [0; 8], "sem glifo para {}", c);
        }
    }
}
