pub mod contact_import;
