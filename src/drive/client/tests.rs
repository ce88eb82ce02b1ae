use super::*;

#[test]
fn escape_plain_value_unchanged() {
    assert_eq!(escape_query_literal("Twitter Selfmade"), "Twitter Selfmade");
}

#[test]
fn escape_single_quote() {
    assert_eq!(escape_query_literal("Natalie's"), "Natalie\\'s");
}

#[test]
fn escape_backslash_before_quote() {
    assert_eq!(escape_query_literal(r"a\'b"), r"a\\\'b");
}

#[test]
fn folder_query_matches_exact_name() {
    let q = folder_by_name_query("Twitter Accounts");
    assert_eq!(
        q,
        "name='Twitter Accounts' and mimeType='application/vnd.google-apps.folder' and trashed=false"
    );
}

#[test]
fn child_folders_query_uses_contains() {
    let q = child_folders_query("root123", "Twitter Selfmade");
    assert!(q.starts_with("'root123' in parents"));
    assert!(q.contains("mimeType='application/vnd.google-apps.folder'"));
    assert!(q.contains("name contains 'Twitter Selfmade'"));
    assert!(q.ends_with("trashed=false"));
}

#[test]
fn child_file_query_uses_exact_name() {
    let q = child_file_query("folder9", "usage_stats.json");
    assert_eq!(
        q,
        "'folder9' in parents and name='usage_stats.json' and trashed=false"
    );
}

#[test]
fn child_file_query_escapes_name() {
    let q = child_file_query("f", "it's.json");
    assert!(q.contains("name='it\\'s.json'"));
}
