mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{pdf, sorter, sorter_with_picker};
use sorter_cli::api::handle;
use sorter_cli::protocol::Request;
use sorter_core::models::{ByteRange, MoveRequest};
use std::fs;

#[tokio::test]
async fn scan_and_page_count() {
    let temp = tempfile::tempdir().unwrap();
    pdf(temp.path(), "b.pdf", 2);
    pdf(temp.path(), "a.pdf", 5);
    fs::write(temp.path().join("notes.txt"), b"x").unwrap();
    let sorter = sorter();

    let resp = handle(
        &sorter,
        Request::ScanDirectory {
            path: temp.path().to_path_buf(),
        },
    )
    .await;
    assert_eq!(resp.status, 200);
    let body = resp.body.unwrap();
    let pdfs = body["pdfs"].as_array().unwrap();
    assert_eq!(pdfs.len(), 2);
    assert_eq!(pdfs[0]["name"], "a.pdf");

    let resp = handle(
        &sorter,
        Request::PageCount {
            path: temp.path().join("a.pdf"),
        },
    )
    .await;
    assert_eq!(resp.body.unwrap()["count"], 5);
}

#[tokio::test]
async fn missing_paths_are_404() {
    let temp = tempfile::tempdir().unwrap();
    let sorter = sorter();
    let missing = temp.path().join("nope.pdf");

    for req in [
        Request::ScanDirectory {
            path: temp.path().join("nope"),
        },
        Request::Preview {
            path: missing.clone(),
        },
        Request::PageCount {
            path: missing.clone(),
        },
        Request::Pdf {
            path: missing.clone(),
            range: None,
        },
    ] {
        let resp = handle(&sorter, req).await;
        assert_eq!(resp.status, 404);
        assert_eq!(resp.error.unwrap().kind, "not_found");
    }
}

#[tokio::test]
async fn scanning_a_file_is_400() {
    let temp = tempfile::tempdir().unwrap();
    let file = pdf(temp.path(), "a.pdf", 1);
    let resp = handle(&sorter(), Request::ScanDirectory { path: file }).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.error.unwrap().kind, "not_a_directory");
}

#[tokio::test]
async fn broken_documents() {
    let temp = tempfile::tempdir().unwrap();
    let broken = temp.path().join("broken.pdf");
    fs::write(&broken, b"garbage").unwrap();
    let sorter = sorter();

    let resp = handle(&sorter, Request::AllPages { path: broken.clone() }).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.unwrap()["pages"].as_array().unwrap().len(), 0);

    let resp = handle(&sorter, Request::Preview { path: broken }).await;
    assert_eq!(resp.status, 500);
    assert_eq!(resp.error.unwrap().kind, "render_error");
}

#[tokio::test]
async fn previews_are_base64_and_cached() {
    let temp = tempfile::tempdir().unwrap();
    let doc = pdf(temp.path(), "a.pdf", 3);
    let sorter = sorter();

    let first = handle(&sorter, Request::Preview { path: doc.clone() }).await;
    let second = handle(&sorter, Request::Preview { path: doc.clone() }).await;
    let first = first.body.unwrap();
    assert_eq!(first, second.body.unwrap());
    assert!(STANDARD.decode(first["preview"].as_str().unwrap()).is_ok());

    let pages = handle(&sorter, Request::AllPages { path: doc.clone() }).await;
    assert_eq!(pages.body.unwrap()["pages"].as_array().unwrap().len(), 3);

    let image = handle(&sorter, Request::PreviewImage { path: doc }).await;
    let body = image.body.unwrap();
    assert_eq!(body["content_type"], "image/jpeg");
    assert_eq!(body["cache_control"], "public, max-age=86400");
}

#[tokio::test]
async fn validate_folder_statuses() {
    let temp = tempfile::tempdir().unwrap();
    let sorter = sorter();

    let fresh = temp.path().join("new").join("nested");
    let resp = handle(&sorter, Request::ValidateFolder { path: fresh.clone() }).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.unwrap()["valid"], true);
    assert!(fresh.is_dir());

    let file = pdf(temp.path(), "a.pdf", 1);
    let resp = handle(&sorter, Request::ValidateFolder { path: file }).await;
    assert_eq!(resp.status, 400);
}

#[tokio::test]
async fn move_then_undo_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let inbox = temp.path().join("inbox");
    let sorted = temp.path().join("sorted");
    let backup = temp.path().join("backup");
    fs::create_dir_all(&inbox).unwrap();
    fs::create_dir_all(&sorted).unwrap();
    let source = pdf(&inbox, "scan.pdf", 6);
    let sorter = sorter();

    let resp = handle(
        &sorter,
        Request::MovePdf(MoveRequest {
            source: source.clone(),
            destination_folder: sorted.clone(),
            pages_to_keep: 2,
            backup_folder: Some(backup.clone()),
        }),
    )
    .await;
    assert_eq!(resp.status, 200);
    let body = resp.body.unwrap();
    assert_eq!(body["success"], true);
    let record = &body["record"];
    assert_eq!(record["new_path"], sorted.join("scan.pdf").to_str().unwrap());
    assert_eq!(record["backup_path"], backup.join("scan.pdf").to_str().unwrap());
    assert!(!source.exists());

    let resp = handle(
        &sorter,
        Request::Undo {
            sorted_path: sorted.join("scan.pdf"),
            backup_path: Some(backup.join("scan.pdf")),
            original_folder: inbox.clone(),
        },
    )
    .await;
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.body.unwrap()["restored_path"],
        source.to_str().unwrap()
    );
    assert_eq!(providers::pages::count_pages(&source).unwrap(), 6);
}

#[tokio::test]
async fn move_to_missing_folder_is_404() {
    let temp = tempfile::tempdir().unwrap();
    let source = pdf(temp.path(), "a.pdf", 1);
    let resp = handle(
        &sorter(),
        Request::MovePdf(MoveRequest {
            source: source.clone(),
            destination_folder: temp.path().join("absent"),
            pages_to_keep: 0,
            backup_folder: None,
        }),
    )
    .await;
    assert_eq!(resp.status, 404);
    assert!(source.exists());
}

#[tokio::test]
async fn undo_failures_are_500() {
    let temp = tempfile::tempdir().unwrap();
    let resp = handle(
        &sorter(),
        Request::Undo {
            sorted_path: temp.path().join("gone.pdf"),
            backup_path: Some(temp.path().join("backup").join("gone.pdf")),
            original_folder: temp.path().to_path_buf(),
        },
    )
    .await;
    assert_eq!(resp.status, 500);
    assert_eq!(resp.error.unwrap().kind, "undo_error");
}

#[tokio::test]
async fn pdf_ranges() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("raw.pdf");
    fs::write(&path, b"0123456789").unwrap();
    let sorter = sorter();

    let resp = handle(&sorter, Request::Pdf { path: path.clone(), range: None }).await;
    assert_eq!(resp.status, 200);
    let body = resp.body.unwrap();
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["accept_ranges"], "bytes");
    assert_eq!(STANDARD.decode(body["data"].as_str().unwrap()).unwrap(), b"0123456789");

    let resp = handle(
        &sorter,
        Request::Pdf {
            path: path.clone(),
            range: Some(ByteRange { start: 2, end: Some(4) }),
        },
    )
    .await;
    assert_eq!(resp.status, 206);
    let body = resp.body.unwrap();
    assert_eq!(body["total_len"], 10);
    assert_eq!(STANDARD.decode(body["data"].as_str().unwrap()).unwrap(), b"234");

    let resp = handle(
        &sorter,
        Request::Pdf {
            path,
            range: Some(ByteRange { start: 50, end: None }),
        },
    )
    .await;
    assert_eq!(resp.status, 416);
}

#[tokio::test]
async fn pick_folder_reports_choice_or_null() {
    let resp = handle(&sorter(), Request::PickFolder).await;
    assert_eq!(resp.status, 200);
    assert!(resp.body.unwrap()["path"].is_null());

    let chosen = std::path::PathBuf::from("/srv/sorted");
    let resp = handle(&sorter_with_picker(Some(chosen)), Request::PickFolder).await;
    assert_eq!(resp.body.unwrap()["path"], "/srv/sorted");
}
