//! Maps requests onto the core and core errors onto status codes.

use crate::protocol::{Request, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use sorter_core::{Sorter, SorterError};
use tracing::debug;

pub const PREVIEW_CACHE_CONTROL: &str = "public, max-age=86400";
pub const PDF_CACHE_CONTROL: &str = "private, max-age=3600";

pub fn status_for(err: &SorterError) -> u16 {
    match err {
        SorterError::NotFound(_) => 404,
        SorterError::NotADirectory(_) => 400,
        SorterError::InvalidRange { .. } => 416,
        _ => 500,
    }
}

pub async fn handle(sorter: &Sorter, req: Request) -> Response {
    debug!(request = ?req, "handling request");
    match dispatch(sorter, req).await {
        Ok(resp) => resp,
        Err((status, err)) => Response::from_error(status, &err),
    }
}

type Failure = (u16, SorterError);

fn fail(err: SorterError) -> Failure {
    (status_for(&err), err)
}

async fn dispatch(sorter: &Sorter, req: Request) -> Result<Response, Failure> {
    let resp = match req {
        Request::ScanDirectory { path } => {
            let pdfs = sorter.scan(&path).await.map_err(fail)?;
            Response::ok(json!({ "pdfs": pdfs }))
        }
        Request::Preview { path } => {
            let preview = sorter.preview(&path).await.map_err(fail)?;
            Response::ok(json!({ "preview": preview.as_str() }))
        }
        Request::AllPages { path } => {
            let pages = sorter.all_pages(&path).await.map_err(fail)?;
            Response::ok(json!({ "pages": pages.as_slice() }))
        }
        Request::PageCount { path } => {
            let count = sorter.page_count(&path).await.map_err(fail)?;
            Response::ok(json!({ "count": count }))
        }
        Request::PreviewImage { path } => {
            let jpeg = sorter.preview_image(&path).await.map_err(fail)?;
            Response::ok(json!({
                "content_type": "image/jpeg",
                "cache_control": PREVIEW_CACHE_CONTROL,
                "data": STANDARD.encode(jpeg),
            }))
        }
        Request::ValidateFolder { path } => {
            // Every failure here is a bad folder from the caller's point of view.
            let path = sorter.validate_folder(&path).await.map_err(|e| (400, e))?;
            Response::ok(json!({ "valid": true, "path": path }))
        }
        Request::MovePdf(move_req) => {
            let record = sorter.move_document(move_req).await.map_err(fail)?;
            Response::ok(json!({ "success": true, "record": record }))
        }
        Request::Undo {
            sorted_path,
            backup_path,
            original_folder,
        } => {
            let outcome = sorter
                .undo(&sorted_path, backup_path.as_deref(), &original_folder)
                .await
                .map_err(|e| (500, e))?;
            Response::ok(json!({ "restored_path": outcome.restored_path }))
        }
        Request::Pdf { path, range } => {
            let pdf = sorter.read_pdf(&path, range).await.map_err(fail)?;
            let status = if pdf.range.is_some() { 206 } else { 200 };
            Response::with_status(
                status,
                json!({
                    "content_type": "application/pdf",
                    "cache_control": PDF_CACHE_CONTROL,
                    "accept_ranges": "bytes",
                    "total_len": pdf.total_len,
                    "range": pdf.range,
                    "data": STANDARD.encode(&pdf.data),
                }),
            )
        }
        Request::PickFolder => {
            let path = sorter.pick_folder().await;
            Response::ok(json!({ "path": path }))
        }
    };
    Ok(resp)
}
