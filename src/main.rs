use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode, ColorChoice};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use clap::Parser;

use s3_put_stage::cli::{Args, build_upload_config};
use s3_put_stage::config::UploadConfig;
use s3_put_stage::constants::CONTENT_TYPE_KEY;
use s3_put_stage::stage::{spawn_source, spawn_stage, FsSource, S3Put, StageError};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Load configuration; validation happens when the stage starts
    let config = build_upload_config(&args)?;

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run_pipeline(&args, config))
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Wire the filesystem source into the upload stage and drain its output
async fn run_pipeline(args: &Args, config: UploadConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let queue_size = args.queue_size.max(1);
    let (files_tx, files_rx) = mpsc::channel(queue_size);
    let (uploaded_tx, mut uploaded_rx) = mpsc::channel(queue_size);

    let bucket = config.bucket.clone();
    let source = FsSource::new(args.paths.clone()).recursive(args.recursive);

    let source_task = spawn_source(source, cancel.clone(), files_tx);
    let upload_task = spawn_stage(S3Put::new(config), cancel.clone(), files_rx, uploaded_tx);

    // Cancel the pipeline on Ctrl-C
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling upload");
            interrupt.cancel();
        }
    });

    let mut uploaded = 0usize;
    while let Some(file) = uploaded_rx.recv().await {
        uploaded += 1;
        debug!("Uploaded {} as {}", file.name(),
               file.annotations().get(CONTENT_TYPE_KEY).unwrap_or("unknown"));
    }

    let upload_result = upload_task.await.context("Upload stage panicked")?;
    let source_result = source_task.await.context("Source stage panicked")?;

    match (upload_result, source_result) {
        (Err(e), _) => {
            error!("Upload stopped after {} files", uploaded);
            Err(anyhow!(e).context(format!("Failed to upload to bucket {}", bucket)))
        }
        (Ok(()), Err(StageError::Cancelled)) | (Ok(()), Err(StageError::OutputClosed)) => {
            Err(anyhow!("Upload interrupted after {} files", uploaded))
        }
        (Ok(()), Err(e)) => Err(anyhow!(e).context("Failed to read input files")),
        (Ok(()), Ok(())) => {
            info!("Uploaded {} files to bucket {}", uploaded, bucket);
            Ok(())
        }
    }
}
