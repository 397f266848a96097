use crate::cli::ConvertArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::WorkflowProgressBar;
use molpipe::engine::progress::ProgressReporter;
use molpipe::workflows;
use tracing::{info, warn};

pub fn run(args: ConvertArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = builder::build_conversion_config(&args)?;

    let progress = WorkflowProgressBar::new();
    let reporter = ProgressReporter::with_callback(progress.callback());

    println!(
        "Converting {} structure file(s) into {}...",
        config.input_paths.len(),
        config.output_dir.display()
    );
    let summary = workflows::convert::run(&config, &reporter)?;

    if summary.conformers_written == 0 {
        warn!("Conversion finished but no conformers were written.");
    }
    println!(
        "✓ Converted {} file(s), {} conformer(s) written to {}",
        summary.files_processed,
        summary.conformers_written,
        config.output_dir.display()
    );
    Ok(())
}
