use crate::common::repository::{Sandbox, sandbox};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use twig::Error;
use twig::artifacts::objects::blob::Blob;
use twig::artifacts::objects::object::{Object, ObjectBox};
use twig::artifacts::objects::object_type::ObjectType;

mod common;

#[rstest]
fn identical_content_is_stored_once(sandbox: Sandbox) {
    let database = sandbox.repository.database();

    let first = database.store(&Blob::new(b"same bytes".to_vec())).unwrap();
    let second = database.store(&Blob::new(b"same bytes".to_vec())).unwrap();

    assert_eq!(first, second);
    assert_eq!(database.list(ObjectType::Blob).unwrap(), vec![first]);
}

#[rstest]
fn stored_blob_loads_back_with_binary_flag(sandbox: Sandbox) {
    let database = sandbox.repository.database();
    let oid = database.store(&Blob::new(b"bin\0ary".to_vec())).unwrap();

    let blob = database.load_blob(&oid).unwrap();

    assert!(blob.is_binary());
    assert_eq!(blob.content().as_ref(), b"bin\0ary");
}

#[rstest]
fn loading_with_the_wrong_kind_is_a_kind_mismatch(sandbox: Sandbox) {
    let database = sandbox.repository.database();
    let oid = database.store(&Blob::new(b"hello".to_vec())).unwrap();

    let result = database.load_tree(&oid);

    assert!(matches!(
        result,
        Err(Error::KindMismatch {
            expected: ObjectType::Tree,
            actual: ObjectType::Blob,
            ..
        })
    ));
}

#[rstest]
fn missing_object_is_not_found(sandbox: Sandbox) {
    let oid = Blob::new(b"never stored".to_vec()).object_id().unwrap();

    let result = sandbox.repository.database().load_blob(&oid);

    assert!(matches!(result, Err(Error::NotFound { kind: ObjectType::Blob, .. })));
}

#[rstest]
fn tampered_object_file_is_corrupt(sandbox: Sandbox) {
    let oid = Blob::new(b"original".to_vec()).object_id().unwrap();
    let object_path = sandbox
        .repository
        .database()
        .objects_path()
        .join(ObjectType::Blob.partition())
        .join(oid.to_path());
    std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
    std::fs::write(&object_path, b"definitely not zlib").unwrap();

    let result = sandbox.repository.database().load_blob(&oid);

    assert!(matches!(result, Err(Error::Corrupt { .. })));
}

#[rstest]
fn hash_object_only_writes_when_asked(sandbox: Sandbox) {
    sandbox.write("note.txt", "remember the milk");

    let oid = sandbox.repository.hash_object("note.txt", false).unwrap();
    assert!(!sandbox.repository.database().contains(ObjectType::Blob, &oid));

    let stored = sandbox.repository.hash_object("note.txt", true).unwrap();
    assert_eq!(stored, oid);
    assert_eq!(
        sandbox.repository.cat_file(None, &oid.to_string()).unwrap(),
        ObjectBox::Blob(Box::new(Blob::new(b"remember the milk".to_vec())))
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn storing_any_bytes_twice_yields_one_object(content in proptest::collection::vec(any::<u8>(), 0..512)) {
        let sandbox = sandbox();
        let database = sandbox.repository.database();

        let first = database.store(&Blob::new(content.clone())).unwrap();
        let second = database.store(&Blob::new(content.clone())).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(database.list(ObjectType::Blob).unwrap().len(), 1);
        let loaded = database.load_blob(&first).unwrap();
        prop_assert_eq!(loaded.content().as_ref(), content.as_slice());
    }
}
