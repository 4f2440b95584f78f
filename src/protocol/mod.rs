mod messages;

pub use messages::{FileBlob, STATUS_SUCCESS, SaveResponse, UPLOAD_FIELD, UploadResponse};
