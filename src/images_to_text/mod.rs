//! OCR collaborator: turns a recipe photo into raw text.

mod ocr;

pub use ocr::{GoogleVisionOcr, ImageSource};
