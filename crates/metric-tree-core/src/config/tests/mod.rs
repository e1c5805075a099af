mod default_tests;
mod serialization_tests;
