use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use molpipe::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const PHASE_TEMPLATE: &str = "{spinner:.green} {msg}";
const COUNT_TEMPLATE: &str = "{msg:<10} {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]";

/// Terminal view of a workflow run: a spinner while a phase is setting up,
/// a counter once its task reports a total.
#[derive(Clone)]
pub struct WorkflowProgressBar {
    bar: ProgressBar,
}

impl WorkflowProgressBar {
    pub fn new() -> Self {
        Self::drawing_to(ProgressDrawTarget::stderr())
    }

    fn drawing_to(target: ProgressDrawTarget) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(None, target),
        }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event| update(&bar, event))
    }
}

fn update(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_style(style(PHASE_TEMPLATE));
            bar.set_message(name);
            bar.enable_steady_tick(TICK_INTERVAL);
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.set_style(style(COUNT_TEMPLATE));
            bar.set_length(total_steps);
            bar.set_position(0);
        }
        Progress::TaskAdvance { steps } => bar.inc(steps),
        Progress::TaskFinish => {
            // Short model batches can leave the counter below its total.
            if let Some(total) = bar.length() {
                bar.set_position(total);
            }
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            let phase = bar.message();
            bar.finish_with_message(format!("{phase} done"));
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl Default for WorkflowProgressBar {
    fn default() -> Self {
        Self::new()
    }
}
