// Skills: taxonomy, extraction from free text, and JD requirement sections.

pub mod extractor;
pub mod handlers;
pub mod jd_sections;
pub mod taxonomy;
