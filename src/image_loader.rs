use std::sync::Arc;

use egui::{ColorImage, Vec2};
use parking_lot::Mutex;
use thiserror::Error;

use crate::element::ElementId;

/// Errors from decoding uploaded image bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode image bytes: {0}")]
    Decode(#[from] image::ImageError),
}

/// Result of one asynchronous decode.
pub enum DecodeOutcome {
    Ready {
        id: ElementId,
        image: ColorImage,
        /// Native pixel size, used to replace the placeholder extent.
        size: Vec2,
    },
    Failed {
        id: ElementId,
    },
}

/// Decodes uploaded image bytes off the event thread.
///
/// Outcomes land in a slot shared under a mutex; the mutation engine
/// drains it from the event thread and flips the elements' `loaded`
/// flags. On wasm there are no threads, so the decode runs inline;
/// uploads there are small and the slot keeps the call shape identical.
pub struct ImageLoader {
    outcomes: Arc<Mutex<Vec<DecodeOutcome>>>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self { outcomes: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Starts decoding `bytes` for the element `id`.
    pub fn spawn_decode(&self, id: ElementId, bytes: Vec<u8>) {
        let outcomes = Arc::clone(&self.outcomes);

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let outcome = decode_outcome(id, &bytes);
            outcomes.lock().push(outcome);
        });

        #[cfg(target_arch = "wasm32")]
        outcomes.lock().push(decode_outcome(id, &bytes));
    }

    /// Drains every finished decode.
    pub fn poll(&self) -> Vec<DecodeOutcome> {
        std::mem::take(&mut *self.outcomes.lock())
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_outcome(id: ElementId, bytes: &[u8]) -> DecodeOutcome {
    match decode(bytes) {
        Ok((image, size)) => DecodeOutcome::Ready { id, image, size },
        Err(_) => DecodeOutcome::Failed { id },
    }
}

/// Decodes encoded bytes into egui pixels plus the native size.
pub fn decode(bytes: &[u8]) -> Result<(ColorImage, Vec2), DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    let size = Vec2::new(decoded.width() as f32, decoded.height() as f32);
    let rgba = decoded.to_rgba8();
    let pixels = rgba.as_flat_samples();
    let image = ColorImage::from_rgba_unmultiplied(
        [decoded.width() as usize, decoded.height() as usize],
        pixels.as_slice(),
    );
    Ok((image, size))
}
