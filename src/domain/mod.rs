pub mod error;

// Contact import module
pub mod contact;
