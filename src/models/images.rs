//! Validation of product images sent inline as `data:` URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image positions in messages are 1-based, as displayed in the order form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Vous ne pouvez pas ajouter plus de 5 images")]
    TooMany,
    #[error("L'image n°{0} n'est pas une image valide")]
    NotAnImage(usize),
    #[error("L'image n°{0} ne doit pas dépasser 5MB")]
    TooLarge(usize),
}

pub fn validate_images(images: &[String]) -> Result<(), ImageError> {
    if images.len() > MAX_IMAGES {
        return Err(ImageError::TooMany);
    }

    for (index, image) in images.iter().enumerate() {
        let position = index + 1;
        let payload = image_payload(image).ok_or(ImageError::NotAnImage(position))?;

        // Cheap upper bound before paying for a full decode.
        if payload.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
            return Err(ImageError::TooLarge(position));
        }

        let decoded = STANDARD
            .decode(payload)
            .map_err(|_| ImageError::NotAnImage(position))?;
        if decoded.is_empty() {
            return Err(ImageError::NotAnImage(position));
        }
        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge(position));
        }
    }

    Ok(())
}

/// Return the base64 payload of a `data:image/<subtype>;base64,<payload>` URI.
fn image_payload(uri: &str) -> Option<&str> {
    let (header, payload) = uri.strip_prefix("data:")?.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let subtype = mime.strip_prefix("image/")?;
    if subtype.is_empty() {
        return None;
    }
    Some(payload)
}
