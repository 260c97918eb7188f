pub mod invitation_tests;
pub mod product_tests;
pub mod provider_tests;
