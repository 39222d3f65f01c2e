//! Service layer: loading inputs, dispatching prompts, parsing replies, and
//! the control loop that ties them together.

pub mod harvest_loop;
pub mod input_loader;
pub mod request_dispatcher;
pub mod response_parser;

pub use harvest_loop::{HarvestLoop, HarvestSettings, PromptTemplates, WaitPolicy, FAILED_DIR};
pub use input_loader::{load_inputs, read_adjectives, HarvestInputs};
pub use request_dispatcher::RequestDispatcher;
pub use response_parser::{sanitize_filename, sanitize_path_segment, ResponseParser};
