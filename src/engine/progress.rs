//! Progress counter for processed nodes (heartbeat while the crawl runs)

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Force a refresh of the bar (e.g. so the counter shows "0 nodes" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " nodes"
    )))
}

/// Update progress bar if available
/// Uses try_lock so workers never block on it; a contended tick is dropped
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Counter shown while crawling, or `None` when progress output is off.
pub fn setup_progress(enabled: bool) -> Option<ProgressBar> {
    enabled.then(|| {
        let bar = create_counter("Crawling");
        refresh_bar(&bar);
        bar
    })
}

/// Final refresh so the last count is on screen before the summary is logged.
pub fn finish_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb
        && let Ok(mut bar) = pb.lock()
    {
        let _ = bar.refresh();
        eprintln!();
    }
}
