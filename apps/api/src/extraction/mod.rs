// Document text: PDF parsing (pdf-extract, then lopdf) and normalisation helpers.

pub mod pdf;
pub mod text;
