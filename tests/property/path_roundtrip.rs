//! Formatting a path and parsing it back yields the same path

use proptest::prelude::*;
use regtree::tree::path::{parse_qualified, qualified};
use regtree::{KeyPath, RootKey};

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.{}/-][A-Za-z0-9 _.{}/-]{0,10}[A-Za-z0-9_.{}/-]"
}

fn root() -> impl Strategy<Value = RootKey> {
    prop::sample::select(RootKey::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_key_path_display_parse_round_trip(segments in prop::collection::vec(segment(), 0..6)) {
        let path = KeyPath::from_segments(segments.iter().map(String::as_str)).unwrap();
        let reparsed = KeyPath::parse(&path.to_string());
        prop_assert_eq!(reparsed.segments(), path.segments());
        prop_assert_eq!(reparsed.len(), segments.len());
    }

    #[test]
    fn test_qualified_round_trip(root in root(), segments in prop::collection::vec(segment(), 0..6)) {
        let path = KeyPath::from_segments(segments.iter().map(String::as_str)).unwrap();
        let text = qualified(root, &path);
        let (parsed_root, parsed_path) = parse_qualified(&text).unwrap();
        prop_assert_eq!(parsed_root, root);
        prop_assert_eq!(parsed_path, path);
    }

    #[test]
    fn test_short_root_names_parse(root in root(), segments in prop::collection::vec(segment(), 1..4)) {
        let text = format!("{}\\{}", root.short_name(), segments.join("\\"));
        let (parsed_root, parsed_path) = parse_qualified(&text).unwrap();
        prop_assert_eq!(parsed_root, root);
        prop_assert_eq!(parsed_path.segments(), segments.as_slice());
    }
}
