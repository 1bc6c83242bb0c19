use tracing::{debug, info, warn};

use super::context::AppContext;
use super::resize::downscale;
use super::response::{
    status_error, transport_error, BaseResponse, CnnInfo, IdentifyResponse, ModelInfoResponse,
    TestLocalResponse, NOT_A_PLANT_ERROR, NOT_A_PLANT_SUGGESTION, NO_SUGGESTIONS_ERROR, TIMEOUT_ERROR,
};
use super::upload::{Upload, UploadError};
use crate::features;
use crate::identify::IdentifyOutcome;
use crate::summary::caption;

/// Full identification flow behind `POST /identify`.
///
/// Every outcome is a well-formed response; external-service failures are
/// reported in `error` next to the local analysis.
pub fn identify(ctx: &AppContext, upload: Result<Upload, UploadError>) -> IdentifyResponse {
    let upload = match upload {
        Ok(upload) => upload,
        Err(err) => return IdentifyResponse::rejected(err),
    };

    let bytes = match prepare(ctx, &upload) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(file = upload.filename(), error = %err, "upload rejected");
            return IdentifyResponse::rejected(err);
        }
    };

    let decision = ctx.classifier.classify(&bytes);
    let phrases = ctx.policy.summarize(&features::extract(&bytes));
    let cnn_info = CnnInfo::new(decision, caption(&phrases));

    if !cnn_info.is_plant {
        info!(label = %cnn_info.label, "not a plant; skipping identification");
        return IdentifyResponse::Analysis(
            BaseResponse::new(cnn_info)
                .with_error(NOT_A_PLANT_ERROR)
                .with_suggestion(NOT_A_PLANT_SUGGESTION),
        );
    }

    let base = BaseResponse::new(cnn_info);
    match ctx.identifier.identify(&bytes) {
        IdentifyOutcome::Suggestions(reply) => IdentifyResponse::identified(reply, &base.cnn_info),
        IdentifyOutcome::NoSuggestions => IdentifyResponse::Analysis(base.with_error(NO_SUGGESTIONS_ERROR)),
        IdentifyOutcome::Status(code) => IdentifyResponse::Analysis(base.with_error(status_error(code))),
        IdentifyOutcome::Timeout => IdentifyResponse::Analysis(base.with_error(TIMEOUT_ERROR)),
        IdentifyOutcome::Transport(msg) => IdentifyResponse::Analysis(base.with_error(transport_error(&msg))),
    }
}

/// Stores the upload, shrinking it in place when it is too large, and
/// returns the bytes that were stored.
fn prepare(ctx: &AppContext, upload: &Upload) -> Result<Vec<u8>, UploadError> {
    let path = upload.persist(&ctx.upload_dir)?;
    match downscale(upload.bytes(), ctx.max_dimension)? {
        Some(resized) => {
            debug!(file = %path.display(), max = ctx.max_dimension, "upload downscaled");
            std::fs::write(&path, &resized)?;
            Ok(resized)
        }
        None => Ok(upload.bytes().to_vec()),
    }
}

/// Local classification and visual analysis only (`POST /test-local`).
/// The image is stored as uploaded, without resizing.
pub fn test_local(ctx: &AppContext, upload: Result<Upload, UploadError>) -> Result<TestLocalResponse, UploadError> {
    let upload = upload?;
    upload.persist(&ctx.upload_dir)?;
    let decision = ctx.classifier.classify(upload.bytes());
    let phrases = ctx.policy.summarize(&features::extract(upload.bytes()));
    Ok(TestLocalResponse::new(decision, phrases))
}

/// Static model facts (`GET /model-info`).
pub fn model_info(ctx: &AppContext) -> ModelInfoResponse {
    let descriptor = ctx.classifier.descriptor();
    let vocabulary = ctx.classifier.vocabulary();
    ModelInfoResponse {
        model: descriptor.name,
        input_size: format!("{}x{} pixels", descriptor.input_width, descriptor.input_height),
        pretrained_on: descriptor.pretrained_on,
        output_classes: descriptor.classes,
        plant_categories: vocabulary.category_count(),
        plant_keywords: vocabulary.keyword_count(),
        top_k: ctx.classifier.top_k(),
    }
}
