pub mod digest;
pub mod llm;
pub mod stt;
