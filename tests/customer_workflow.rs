use bank_records::{
    add_customer, list_customers, CustomerError, CustomerForm, CustomerRecord, RecordStore,
    ValidationError, NO_CUSTOMERS,
};
use std::fs;

#[test]
fn end_to_end_add_then_reject_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("customers.dat"));

    assert!(!store.path().exists());
    store.initialize().unwrap();
    assert!(store.load_all().is_empty());

    add_customer(&store, &CustomerForm::new("001", "Alice", "1234", "100.0")).unwrap();
    let alice = CustomerRecord::new("001", "Alice", "1234", 100.0);
    assert_eq!(store.load_all(), vec![alice.clone()]);

    let err = add_customer(&store, &CustomerForm::new("001", "Bob", "0000", "50.0")).unwrap_err();
    assert!(matches!(err, CustomerError::Duplicate(_)));
    assert_eq!(store.load_all(), vec![alice]);
}

#[test]
fn validation_failures_leave_file_bytes_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("customers.dat"));
    store.initialize().unwrap();
    add_customer(&store, &CustomerForm::new("001", "Alice", "1234", "100")).unwrap();
    let before = fs::read(store.path()).unwrap();

    let bad = [
        CustomerForm::new("002", "", "1234", "1"),
        CustomerForm::new("002", "Bob", " ", "1"),
        CustomerForm::new(" ", "Bob", "1234", "1"),
        CustomerForm::new("002", "Bob", "1234", "abc"),
    ];
    for form in &bad {
        let err = add_customer(&store, form).unwrap_err();
        assert!(matches!(
            err,
            CustomerError::Validation(ValidationError::MissingFields)
                | CustomerError::Validation(ValidationError::InvalidBalance(_))
        ));
    }

    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn corrupt_file_lists_as_empty_and_can_be_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("customers.dat"));
    fs::write(store.path(), b"(lp0\n.garbage").unwrap();

    assert_eq!(list_customers(&store, "$"), vec![NO_CUSTOMERS.to_string()]);

    // Adding on top of an unreadable file starts a fresh collection
    add_customer(&store, &CustomerForm::new("001", "Alice", "1234", "1")).unwrap();
    assert_eq!(list_customers(&store, "$"), vec!["001 | Alice | $1.00".to_string()]);
}
