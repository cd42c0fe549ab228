use cfgsync_fs::{NormalizedPath, TextEncoding, TextFile, validate_path_identifier};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_decode_never_loses_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let file = TextFile::decode(bytes.clone());
        let reencoded: Vec<u8> = match file.encoding {
            TextEncoding::Utf8 => file.content.into_bytes(),
            TextEncoding::Latin1 => file.content.chars().map(|c| c as u32 as u8).collect(),
        };
        prop_assert_eq!(reencoded, bytes);
    }

    #[test]
    fn test_normalized_paths_have_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_plain_identifiers_are_accepted(s in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,30}") {
        prop_assume!(s != "." && s != "..");
        prop_assert!(validate_path_identifier(&s).is_ok());
    }

    #[test]
    fn test_identifiers_with_separators_are_rejected(
        head in "[a-z0-9_]{0,8}",
        sep in "[/\\\\:]",
        tail in "[a-z0-9_]{0,8}",
    ) {
        let value = format!("{head}{sep}{tail}");
        prop_assert!(validate_path_identifier(&value).is_err());
    }
}
