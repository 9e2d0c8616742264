pub mod agents;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;

pub use io::{read_transcript, render_comparison, render_sequential, render_state, write_json};
pub use llm::{GatewayConfig, GatewayError, ModelGateway, Provider, TextGenerator};
pub use models::{
    AgentMessage, AgentState, CallDisposition, Disposition, EvaluationResults, SentimentLabel,
    SoapNote, Topic, UrgencyAssessment, Winner,
};
pub use pipeline::{
    ComparisonRun, DocumentationResult, ProgressCallback, StepInfo, process_and_evaluate,
    process_and_evaluate_detailed, run_multi_agent, run_sequential_pipeline,
};
