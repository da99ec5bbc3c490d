pub mod grade;
pub mod operation;
pub mod phrase;
pub mod test_result;
