//! QR code generation for product records
//!
//! A product is flattened into a labelled text payload, encoded as a QR
//! symbol, rasterised onto a white canvas and serialized to PNG. The PNG can
//! then be embedded inline as a base64 data URI.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::store::Product;

/// Pixels per QR module
pub const QR_BOX_SIZE: u32 = 5;
/// Light modules around the symbol
pub const QR_BORDER_MODULES: u32 = 2;
/// Error correction level for every generated symbol
pub const QR_EC_LEVEL: EcLevel = EcLevel::L;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Text encoded into a product's QR code
pub fn payload(product: &Product) -> String {
    format!(
        "PRODAPP: {}\nProduct Name: {}\nBarcode: {}\nExpiry Date: {}\nStatus: {}",
        product.id, product.name, product.barcode, product.expiry_date, product.status
    )
}

/// Rasterise `data` as a QR code with the fixed module size and border
pub fn render_symbol(data: &str) -> Result<GrayImage, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), QR_EC_LEVEL)?;

    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(QR_BOX_SIZE, QR_BOX_SIZE)
        .dark_color(DARK)
        .light_color(LIGHT)
        .build();

    let border_px = QR_BORDER_MODULES * QR_BOX_SIZE;
    let mut canvas = GrayImage::from_pixel(
        symbol.width() + 2 * border_px,
        symbol.height() + 2 * border_px,
        LIGHT,
    );
    imageops::overlay(&mut canvas, &symbol, i64::from(border_px), i64::from(border_px));

    Ok(canvas)
}

/// PNG bytes of the product's QR code
pub fn encode_product(product: &Product) -> Result<Vec<u8>, QrError> {
    let image = render_symbol(&payload(product))?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Inline `data:` URI for PNG bytes
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// QR generation errors
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("Payload cannot be encoded as a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Failed to write PNG: {0}")]
    Png(#[from] image::ImageError),
}
