pub mod test_result;
pub mod test_result_detail;
