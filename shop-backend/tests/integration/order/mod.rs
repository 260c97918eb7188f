pub mod order_tests;
pub mod sales_report_tests;
