use std::fs;
use std::path::{Path, PathBuf};

use chat2md_engine::{extract_from_webarchive, read_main_resource, ErrorKind};
use plist::{Dictionary, Value};
use tempfile::TempDir;

fn write_archive(dir: &Path, name: &str, html: &[u8]) -> PathBuf {
    let mut resource = Dictionary::new();
    resource.insert("WebResourceData".to_string(), Value::Data(html.to_vec()));
    resource.insert(
        "WebResourceMIMEType".to_string(),
        Value::String("text/html".to_string()),
    );
    let mut root = Dictionary::new();
    root.insert("WebMainResource".to_string(), Value::Dictionary(resource));

    let path = dir.join(name);
    Value::Dictionary(root).to_file_binary(&path).unwrap();
    path
}

#[test]
fn minimal_archive_yields_visible_text_only() {
    let temp = TempDir::new().unwrap();
    let html = b"<html><body><script>alert(1)</script><p>Hello</p></body></html>";
    let path = write_archive(temp.path(), "chat.webarchive", html);

    let text = extract_from_webarchive(&path).unwrap();
    assert!(text.contains("Hello"));
    assert!(!text.contains("alert(1)"));
}

#[test]
fn extension_check_is_case_insensitive() {
    let temp = TempDir::new().unwrap();
    let path = write_archive(temp.path(), "Chat.WebArchive", b"<p>Hi</p>");
    assert_eq!(extract_from_webarchive(&path).unwrap(), "Hi");
}

#[test]
fn latin1_html_is_decoded_instead_of_failing() {
    let temp = TempDir::new().unwrap();
    let path = write_archive(temp.path(), "old.webarchive", b"<p>caf\xe9 cr\xe8me</p>");
    assert_eq!(extract_from_webarchive(&path).unwrap(), "café crème");
}

#[test]
fn missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = extract_from_webarchive(&temp.path().join("gone.webarchive")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[test]
fn wrong_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("page.html");
    fs::write(&path, "<p>hi</p>").unwrap();
    let err = extract_from_webarchive(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[test]
fn garbage_container_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.webarchive");
    fs::write(&path, b"\x00\x01 definitely not a plist").unwrap();
    let err = extract_from_webarchive(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[test]
fn missing_main_resource_is_rejected() {
    let temp = TempDir::new().unwrap();
    let mut root = Dictionary::new();
    root.insert("WebSubresources".to_string(), Value::Array(Vec::new()));
    let path = temp.path().join("empty.webarchive");
    Value::Dictionary(root).to_file_binary(&path).unwrap();

    let err = read_main_resource(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("WebMainResource"));
}

#[test]
fn missing_resource_data_is_rejected() {
    let temp = TempDir::new().unwrap();
    let mut resource = Dictionary::new();
    resource.insert("WebResourceURL".to_string(), Value::String("https://x".to_string()));
    let mut root = Dictionary::new();
    root.insert("WebMainResource".to_string(), Value::Dictionary(resource));
    let path = temp.path().join("nodata.webarchive");
    Value::Dictionary(root).to_file_binary(&path).unwrap();

    let err = read_main_resource(&path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("WebResourceData"));
}
