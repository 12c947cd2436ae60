pub mod kickback_tests;
