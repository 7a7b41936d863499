mod common;

use common::{page_count, pdf, sorter};
use sorter_core::cache::Purpose;
use sorter_core::models::MoveRequest;
use sorter_core::SorterError;
use std::fs;
use std::path::Path;

fn plain(source: &Path, dest: &Path) -> MoveRequest {
    MoveRequest {
        source: source.to_path_buf(),
        destination_folder: dest.to_path_buf(),
        pages_to_keep: 0,
        backup_folder: None,
    }
}

#[tokio::test]
async fn repeated_names_get_numbered_suffixes() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let (sorter, _) = sorter();

    let mut landed = Vec::new();
    for inbox in ["in1", "in2", "in3"] {
        let dir = temp.path().join(inbox);
        fs::create_dir_all(&dir).unwrap();
        let src = pdf(&dir, "a.pdf", 1);
        let record = sorter.move_document(plain(&src, &dest)).await.unwrap();
        assert!(!src.exists());
        assert!(record.backup_path.is_none());
        assert_eq!(record.original_folder, dir);
        landed.push(record.new_path);
    }

    assert_eq!(
        landed,
        vec![dest.join("a.pdf"), dest.join("a_1.pdf"), dest.join("a_2.pdf")]
    );
}

#[tokio::test]
async fn split_keeps_prefix_and_full_backup() {
    let temp = tempfile::tempdir().unwrap();
    let inbox = temp.path().join("inbox");
    let dest = temp.path().join("sorted");
    let backups = temp.path().join("backups");
    fs::create_dir_all(&inbox).unwrap();
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(&inbox, "scan.pdf", 10);
    let (sorter, _) = sorter();

    let record = sorter
        .move_document(MoveRequest {
            source: src.clone(),
            destination_folder: dest.clone(),
            pages_to_keep: 3,
            backup_folder: Some(backups.clone()),
        })
        .await
        .unwrap();

    assert_eq!(record.new_path, dest.join("scan.pdf"));
    assert_eq!(page_count(&record.new_path), 3);
    let backup = record.backup_path.clone().unwrap();
    assert_eq!(backup, backups.join("scan.pdf"));
    assert_eq!(page_count(&backup), 10);
    assert_eq!(record.pages_kept, Some(3));
    assert!(record.is_split());
    assert!(!src.exists());
}

#[tokio::test]
async fn keeping_more_pages_than_exist_keeps_all() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(temp.path(), "short.pdf", 4);
    let (sorter, _) = sorter();

    let record = sorter
        .move_document(MoveRequest {
            source: src,
            destination_folder: dest,
            pages_to_keep: 50,
            backup_folder: Some(temp.path().join("backups")),
        })
        .await
        .unwrap();

    assert_eq!(page_count(&record.new_path), 4);
    assert_eq!(record.pages_kept, Some(4));
}

#[tokio::test]
async fn pages_without_backup_folder_is_a_plain_move() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(temp.path(), "a.pdf", 5);
    let (sorter, _) = sorter();

    let mut req = plain(&src, &dest);
    req.pages_to_keep = 2;
    let record = sorter.move_document(req).await.unwrap();

    assert_eq!(page_count(&record.new_path), 5);
    assert!(record.backup_path.is_none());
    assert!(!record.is_split());
}

#[tokio::test]
async fn missing_source_or_destination_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let src = pdf(temp.path(), "a.pdf", 1);
    let (sorter, _) = sorter();

    let err = sorter
        .move_document(plain(&temp.path().join("ghost.pdf"), temp.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, SorterError::NotFound(_)));

    let err = sorter
        .move_document(plain(&src, &temp.path().join("nowhere")))
        .await
        .unwrap_err();
    assert!(matches!(err, SorterError::NotFound(_)));
    assert!(src.exists());
}

#[tokio::test]
async fn move_invalidates_cached_previews() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(temp.path(), "a.pdf", 2);
    let (sorter, _) = sorter();

    sorter.preview(&src).await.unwrap();
    sorter.all_pages(&src).await.unwrap();
    let cache = sorter.cache();
    assert!(cache.contains(&cache.key_for(&src, Purpose::Low)));

    sorter.move_document(plain(&src, &dest)).await.unwrap();
    assert!(!cache.contains(&cache.key_for(&src, Purpose::Low)));
    assert!(!cache.contains(&cache.key_for(&src, Purpose::AllPages)));
}

#[tokio::test]
async fn failed_split_reports_backup() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let src = temp.path().join("broken.pdf");
    fs::write(&src, b"%PDF-1.4 not really").unwrap();
    let backups = temp.path().join("backups");
    let (sorter, _) = sorter();

    let err = sorter
        .move_document(MoveRequest {
            source: src.clone(),
            destination_folder: dest.clone(),
            pages_to_keep: 1,
            backup_folder: Some(backups.clone()),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "split_error");
    assert_eq!(err.backup_path(), Some(&backups.join("broken.pdf")));
    assert!(backups.join("broken.pdf").exists());
    assert!(src.exists());
    assert!(!dest.join("broken.pdf").exists());
}

#[tokio::test]
async fn split_into_its_own_backup_folder_keeps_both_copies() {
    let temp = tempfile::tempdir().unwrap();
    let inbox = temp.path().join("inbox");
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&inbox).unwrap();
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(&inbox, "scan.pdf", 10);
    let (sorter, _) = sorter();

    let record = sorter
        .move_document(MoveRequest {
            source: src.clone(),
            destination_folder: dest.clone(),
            pages_to_keep: 3,
            backup_folder: Some(dest.clone()),
        })
        .await
        .unwrap();

    let backup = record.backup_path.clone().unwrap();
    assert_ne!(record.new_path, backup);
    assert_eq!(backup, dest.join("scan.pdf"));
    assert_eq!(record.new_path, dest.join("scan_1.pdf"));
    assert_eq!(page_count(&backup), 10);
    assert_eq!(page_count(&record.new_path), 3);
    assert!(!src.exists());

    let outcome = sorter.undo_record(record).await.unwrap();
    assert_eq!(outcome.restored_path, Some(src.clone()));
    assert_eq!(page_count(&src), 10);
    assert!(fs::read_dir(&dest).unwrap().next().is_none());
}

#[tokio::test]
async fn previews_under_dotted_paths_are_invalidated_by_move() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("sorted");
    fs::create_dir_all(&dest).unwrap();
    let src = pdf(temp.path(), "a.pdf", 1);
    let dotted = temp.path().join("sorted").join("..").join("a.pdf");
    let (sorter, _) = sorter();

    sorter.preview(&dotted).await.unwrap();
    let cache = sorter.cache();
    assert!(cache.contains(&cache.key_for(&src, Purpose::Low)));

    sorter.move_document(plain(&src, &dest)).await.unwrap();
    assert!(cache.is_empty());
}
