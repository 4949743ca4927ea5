// Integration tests for the on-disk address book
use soroban_toolkit::address_book::{AddressBook, AvailableKeys, EntryStatus};
use soroban_toolkit::logging::{RecordLevel, VerboseLogger, Verbosity};
use tempfile::tempdir;

#[cfg(test)]
mod address_book_tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = tempdir().unwrap();
        let logger = VerboseLogger::default();

        let mut book = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        book.set_contract_id("token", "CTOKEN");
        book.set_contract_id("pool", "CPOOL");
        book.set_wasm_hash("token", "aa11");
        book.write_to_file().unwrap();

        let reloaded = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        assert_eq!(reloaded.get_contract_id("token").unwrap(), "CTOKEN");
        assert_eq!(reloaded.get_contract_id("pool").unwrap(), "CPOOL");
        assert_eq!(reloaded.get_wasm_hash("token").unwrap(), "aa11");
        assert_eq!(
            reloaded.get_available_keys(),
            AvailableKeys {
                contract_keys: vec!["pool".to_string(), "token".to_string()],
                wasm_keys: vec!["token".to_string()],
            }
        );
    }

    #[test]
    fn test_networks_are_isolated() {
        let temp_dir = tempdir().unwrap();
        let logger = VerboseLogger::default();

        let mut testnet = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        testnet.set_contract_id("token", "CTEST");
        testnet.write_to_file().unwrap();

        let futurenet = AddressBook::load_from_file("futurenet", temp_dir.path(), &logger);
        assert!(futurenet.get_contract_id("token").is_err());
    }

    #[test]
    fn test_unparsable_file_starts_empty() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("testnet.contracts.json"), "{ not json").unwrap();
        let (logger, capture) = VerboseLogger::capturing(Verbosity::None);

        let book = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);

        assert!(book.get_available_keys().contract_keys.is_empty());
        assert!(capture.contains(
            RecordLevel::Warn,
            "Unable to load address book for network: testnet. Creating a new one."
        ));
    }

    #[test]
    fn test_file_with_missing_map_starts_empty() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("testnet.contracts.json"),
            r#"{"ids": {"token": "C1"}}"#,
        )
        .unwrap();

        let book = AddressBook::load_from_file("testnet", temp_dir.path(), &VerboseLogger::default());
        assert!(book.get_contract_id("token").is_err());
    }

    #[test]
    fn test_write_creates_nested_directories() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().join("deep").join("nested");
        let mut book = AddressBook::load_from_file("testnet", &base, &VerboseLogger::default());
        book.set_wasm_hash("token", "ff");
        book.write_to_file().unwrap();

        assert!(base.join("testnet.contracts.json").exists());
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let temp_dir = tempdir().unwrap();
        let logger = VerboseLogger::default();

        let mut book = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        book.set_contract_id("a", "C1");
        book.write_to_file().unwrap();
        book.remove_contract_id("a");
        book.set_contract_id("b", "C2");
        book.write_to_file().unwrap();

        let reloaded = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        assert!(reloaded.get_contract_id("a").is_err());
        assert_eq!(reloaded.get_contract_id("b").unwrap(), "C2");
    }

    #[test]
    fn test_missing_key_error_names_key_and_path() {
        let temp_dir = tempdir().unwrap();
        let book = AddressBook::load_from_file("testnet", temp_dir.path(), &VerboseLogger::default());
        let path = temp_dir.path().join("testnet.contracts.json");

        assert_eq!(
            book.get_contract_id("router").unwrap_err().to_string(),
            format!("Unable to find contractId for key: router in {}", path.display())
        );
        assert_eq!(
            book.get_wasm_hash("router").unwrap_err().to_string(),
            format!("Unable to find wasmHash for key: router in {}", path.display())
        );
    }

    #[test]
    fn test_set_after_stage_confirms() {
        let temp_dir = tempdir().unwrap();
        let mut book = AddressBook::load_from_file("testnet", temp_dir.path(), &VerboseLogger::default());

        book.stage_contract_id("pool", "CPOOL");
        assert_eq!(book.contract_id_status("pool"), Some(EntryStatus::Pending));
        book.set_contract_id("pool", "CPOOL2");
        assert_eq!(book.contract_id_status("pool"), Some(EntryStatus::Confirmed));
        assert_eq!(book.get_contract_id("pool").unwrap(), "CPOOL2");
    }

    #[test]
    fn test_save_is_logged_at_some() {
        let temp_dir = tempdir().unwrap();
        let (logger, capture) = VerboseLogger::capturing(Verbosity::Some);
        let book = AddressBook::load_from_file("testnet", temp_dir.path(), &logger);
        book.write_to_file().unwrap();

        assert!(capture.contains(
            RecordLevel::Some,
            &format!("Address book saved to: {}", book.file_path().display())
        ));
    }
}
