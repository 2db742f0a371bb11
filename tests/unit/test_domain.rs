use image_gallery::domain::image::{
    entity::{ImageUpload, StoreEntry, StoredBlob},
    errors::GalleryError,
    value_objects::{BlobName, ContainerName},
};

#[test]
fn container_name_follows_storage_naming_rules() {
    assert!(ContainerName::new("gallery".to_string()).is_ok());
    assert!(ContainerName::new("my-gallery-2024".to_string()).is_ok());
    assert!(ContainerName::new("ab".to_string()).is_err());
    assert!(ContainerName::new("a".repeat(64)).is_err());
    assert!(ContainerName::new("Gallery".to_string()).is_err());
    assert!(ContainerName::new("double--hyphen".to_string()).is_err());
    assert!(ContainerName::new("-leading".to_string()).is_err());
}

#[test]
fn default_container_name_is_valid() {
    let name = ContainerName::default();
    assert_eq!(name.as_str(), "webappstoragedotnet-imagecontainer");
    assert!(ContainerName::new(name.to_string()).is_ok());
}

#[test]
fn generated_names_have_timestamp_uuid_and_extension() {
    let name = BlobName::generate("Holiday Photo.JPEG");
    let (timestamp, rest) = name.as_str().split_once('_').expect("missing separator");

    assert_eq!(timestamp.len(), 20);
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    let (uuid, ext) = rest.split_once('.').expect("missing extension");
    assert!(uuid::Uuid::parse_str(uuid).is_ok());
    assert_eq!(ext, "jpeg");
}

#[test]
fn blob_name_from_uri_or_bare_name() {
    let from_uri = BlobName::from_name_or_uri(
        "https://acct.blob.core.windows.net/gallery/0001_abc.png?sv=2024&sig=x#frag",
    )
    .unwrap();
    assert_eq!(from_uri.as_str(), "0001_abc.png");

    let encoded = BlobName::from_name_or_uri("https://cdn.example.com/my%20photo.jpg").unwrap();
    assert_eq!(encoded.as_str(), "my photo.jpg");

    let bare = BlobName::from_name_or_uri("0002_def.jpg").unwrap();
    assert_eq!(bare.as_str(), "0002_def.jpg");

    let relative = BlobName::from_name_or_uri("gallery/0003_ghi.gif").unwrap();
    assert_eq!(relative.as_str(), "0003_ghi.gif");
}

#[test]
fn blob_name_rejects_inputs_without_a_name() {
    for input in ["", "   ", "https://acct.blob.core.windows.net/gallery/", "..", "?x=1"] {
        assert!(
            matches!(
                BlobName::from_name_or_uri(input),
                Err(GalleryError::InvalidInput(_))
            ),
            "expected {:?} to be rejected",
            input
        );
    }
}

#[test]
fn only_file_entries_are_images() {
    let file = StoreEntry::File(StoredBlob {
        name: "a.png".into(),
        uri: "https://s/a.png".into(),
    });
    let dir = StoreEntry::VirtualDirectory {
        prefix: "thumbs/".into(),
    };

    assert_eq!(file.as_file().map(|b| b.name.as_str()), Some("a.png"));
    assert!(dir.as_file().is_none());
    assert!(dir.into_file().is_none());
}

#[test]
fn placeholder_uploads_are_detected() {
    assert!(ImageUpload::new("", Vec::new()).is_placeholder());
    assert!(ImageUpload::new("  ", Vec::new()).is_placeholder());
    assert!(!ImageUpload::new("a.png", Vec::new()).is_placeholder());
    assert!(!ImageUpload::new("", vec![1u8]).is_placeholder());
}
