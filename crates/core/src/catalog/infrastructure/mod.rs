pub mod directory_catalog;
