pub mod middleware;
pub mod test_utils;
pub mod validation;
