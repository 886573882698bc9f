use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::{LogLevel, log_level};

/// Progress bar counting bytes of moved chunks. Hidden in quiet mode.
pub fn chunk_progress(total_bytes: u64, message: &str) -> anyhow::Result<ProgressBar> {
    if log_level() == LogLevel::Quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.white}] {bytes}/{total_bytes} {msg}")?
            .progress_chars("█░░"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}
