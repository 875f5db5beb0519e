pub mod ask;
pub mod gemini;
