pub mod engine;
pub mod input;
pub mod models;
pub mod render;

pub use engine::scan_input;
pub use input::{Input, InputError, open_inputs};
pub use models::InputReport;
pub use render::write_report;
