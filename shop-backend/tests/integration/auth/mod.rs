pub mod signin_tests;
pub mod signup_tests;
pub mod session_tests;
