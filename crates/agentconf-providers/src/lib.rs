//! AgentConf analysis providers - adapters over external text-analysis services
//!
//! The engine extracts environment-variable declarations from package files
//! by asking an external analysis service. That service returns free-form
//! text; the adapters here own the prompt shape and the tolerant parsing
//! that turns the response into validated declarations, so the rest of the
//! system only ever sees `Result<Vec<VariableDeclaration>, AnalysisError>`.

pub mod analyzer;
pub mod error;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use analyzer::DeclarationAnalyzer;
pub use error::AnalysisError;
pub use openai::OpenAiAnalyzer;
pub use parse::parse_declarations;
