pub mod daily_usage;
pub mod operation_type;
