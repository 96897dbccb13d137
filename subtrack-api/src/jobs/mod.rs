pub mod discovery_manager;
