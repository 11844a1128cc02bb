use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;

use crate::cloud::s3::{ObjectStore, S3Store};
use crate::config::{Acl, UploadConfig};
use crate::constants::CONTENT_TYPE_KEY;
use crate::models::FileItem;
use crate::stage::{send_or_cancel, Stage, StageError};
use crate::utils::content_type::resolve_content_type;

/// Uploads each file it receives to a bucket and forwards it downstream.
///
/// Files are processed one at a time, in the order they arrive, and emitted
/// in that same order. Directories are skipped without producing output.
/// Any read or upload failure stops the stage; nothing is retried.
///
/// The forwarded item carries the buffered content (so downstream stages can
/// read it again for free), the original metadata, and a `Content-Type`
/// annotation with the type the object was stored under.
pub struct S3Put {
    config: UploadConfig,
    store: Option<Arc<dyn ObjectStore>>,
}

impl S3Put {
    /// Create a stage that builds its own S3 client when it starts
    pub fn new(config: UploadConfig) -> Self {
        S3Put { config, store: None }
    }

    /// Create a stage that uploads through the given store instead
    pub fn with_store(config: UploadConfig, store: Arc<dyn ObjectStore>) -> Self {
        S3Put { config, store: Some(store) }
    }
}

#[async_trait]
impl Stage for S3Put {
    async fn run(
        self,
        cancel: CancellationToken,
        mut input: Receiver<FileItem>,
        output: Sender<FileItem>,
    ) -> Result<(), StageError> {
        let S3Put { config, store } = self;

        let acl = config.validated_acl()?;

        let store = match store {
            Some(store) => store,
            None => {
                let store = S3Store::from_config(&config)
                    .map_err(|e| StageError::Client(e.into()))?;
                Arc::new(store) as Arc<dyn ObjectStore>
            }
        };

        info!("Uploading files to bucket {} with ACL {}", config.bucket, acl);

        let mut files_uploaded = 0u64;
        let mut bytes_uploaded = 0u64;

        loop {
            let item = tokio::select! {
                received = input.recv() => match received {
                    Some(item) => item,
                    None => {
                        info!("Upload complete: {} files ({} bytes) to bucket {}",
                              files_uploaded, bytes_uploaded, config.bucket);
                        return Ok(());
                    }
                },
                _ = cancel.cancelled() => {
                    debug!("Upload stage cancelled after {} files", files_uploaded);
                    return Err(StageError::Cancelled);
                }
            };

            if item.is_dir() {
                debug!("Skipping directory {}", item.name());
                continue;
            }

            let uploaded = upload_item(&config, store.as_ref(), acl, item).await?;
            files_uploaded += 1;
            bytes_uploaded += uploaded.info().size;

            send_or_cancel(&output, &cancel, uploaded).await?;
        }
    }
}

/// Buffer one file, store it, and build the item to forward
async fn upload_item(
    config: &UploadConfig,
    store: &dyn ObjectStore,
    acl: Acl,
    item: FileItem,
) -> Result<FileItem, StageError> {
    let (mut info, mut body, mut annotations) = item.into_parts();

    let mut content = Vec::new();
    body.read_to_end(&mut content).await
        .map_err(|source| StageError::Read { name: info.name.clone(), source })?;
    let content = Bytes::from(content);
    info.size = content.len() as u64;

    let content_type = resolve_content_type(&info.name, &content);
    annotations.insert(CONTENT_TYPE_KEY, content_type.as_str());
    debug!("{} resolved to {} ({} bytes)", info.name, content_type, info.size);

    info!("Uploading {}", info.name);

    let key = config.object_key(&info.name);
    store.put(&key, content.clone(), &content_type, acl).await
        .map_err(|e| StageError::Upload { key, source: e.into() })?;

    Ok(FileItem::from_bytes(info, content).with_annotations(annotations))
}
