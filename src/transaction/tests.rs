//! Tests for transaction support

use super::*;
use crate::test_fixtures::{create_temp_dir, create_test_files};

#[test]
fn test_rollback_restores_and_removes() {
    let temp = create_temp_dir();
    let root = temp.path();
    create_test_files(&temp, &[(".mcp.json", "{\"original\": true}")]);

    let mut transaction = Transaction::new(root);
    transaction.write(&root.join(".mcp.json"), b"{}").unwrap();
    transaction
        .write(&root.join(".claude/skills/review/SKILL.md"), b"# Review")
        .unwrap();

    assert_eq!(
        transaction.created_files(),
        vec![root.join(".claude/skills/review/SKILL.md")]
    );
    assert_eq!(
        transaction.created_dirs(),
        vec![
            root.join(".claude/skills/review"),
            root.join(".claude/skills"),
            root.join(".claude"),
        ]
    );

    transaction.rollback().unwrap();
    assert_eq!(
        fs::read(root.join(".mcp.json")).unwrap(),
        b"{\"original\": true}"
    );
    assert!(!root.join(".claude").exists());
}

#[test]
fn test_second_write_keeps_first_backup() {
    let temp = create_temp_dir();
    let root = temp.path();
    create_test_files(&temp, &[("a.txt", "v0")]);

    let mut transaction = Transaction::new(root);
    transaction.write(&root.join("a.txt"), b"v1").unwrap();
    transaction.write(&root.join("a.txt"), b"v2").unwrap();
    assert_eq!(transaction.written_files().len(), 1);

    transaction.rollback().unwrap();
    assert_eq!(fs::read(root.join("a.txt")).unwrap(), b"v0");
}

#[test]
fn test_commit_keeps_writes() {
    let temp = create_temp_dir();
    let root = temp.path();

    let mut transaction = Transaction::new(root);
    transaction.write(&root.join("x/y.txt"), b"kept").unwrap();
    transaction.commit();

    assert_eq!(fs::read(root.join("x/y.txt")).unwrap(), b"kept");
}

#[test]
fn test_drop_without_commit_rolls_back() {
    let temp = create_temp_dir();
    let root = temp.path();
    {
        let mut transaction = Transaction::new(root);
        transaction.write(&root.join("x/y.txt"), b"gone").unwrap();
    }
    assert!(!root.join("x").exists());
}

#[test]
fn test_rollback_keeps_non_empty_created_dirs() {
    let temp = create_temp_dir();
    let root = temp.path();

    let mut transaction = Transaction::new(root);
    transaction.write(&root.join("x/y.txt"), b"tmp").unwrap();
    fs::write(root.join("x/user.txt"), "user").unwrap();
    transaction.rollback().unwrap();

    assert!(root.join("x/user.txt").exists());
    assert!(!root.join("x/y.txt").exists());
}

#[test]
fn test_write_outside_root_rejected() {
    let temp = create_temp_dir();
    let root = temp.path().join("project");
    let mut transaction = Transaction::new(&root);
    let err = transaction
        .write(&temp.path().join("outside.txt"), b"x")
        .unwrap_err();
    assert!(matches!(err, MushError::PathEscapesRoot { .. }));
    transaction.commit();
}
