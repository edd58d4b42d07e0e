pub mod report_parser;
pub mod subtask_parser;
pub mod table_parser;

pub use report_parser::parse_recommendation_section;
pub use subtask_parser::parse_subtasks;
pub use table_parser::{parse_summary, parse_table};
