pub mod compatible;
pub mod ollama;
pub mod openai;
