//! Watch mode: debounced rebuilds with terminal notices.
//!
//! ```text
//! notify watcher → sync channel → bridge thread → tokio channel
//!      → Debouncer (pure timing) → full rebuild → NoticeCenter
//! ```
//!
//! The watcher attaches before the initial build, so edits made while that
//! build runs are buffered instead of lost. Each quiet period after a burst
//! of file events triggers one full rebuild; build outcomes surface as
//! notices painted to the terminal:
//!
//! - success → Mint, auto-dismissed,
//! - changed files and section skips → Sky / Peach, auto-dismissed,
//! - build errors → Rose, sticky until the next successful build.

use crate::generate;
use crate::notice::{Notice, NoticeCenter, NoticeId, NoticeTint, ShowOptions};
use notify::{RecursiveMode, Watcher};
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

/// Quiet period after the last file event before a rebuild starts.
const DEBOUNCE_MS: u64 = 300;
/// Minimum spacing between consecutive rebuilds.
const REBUILD_COOLDOWN_MS: u64 = 800;
/// Auto-dismiss delay for transient notices.
const NOTICE_DISMISS: Duration = Duration::from_secs(4);

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Run watch mode until Ctrl-C.
pub async fn run(source: &Path, output: &Path) -> Result<(), WatchError> {
    // Watcher first: events during the initial build buffer in the channel.
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })?;
    watcher.watch(source, RecursiveMode::Recursive)?;

    let center = Arc::new(NoticeCenter::new());
    tokio::spawn(display_loop(Arc::downgrade(&center)));

    let mut sticky_errors = Vec::new();
    rebuild(source, output, &center, &mut sticky_errors);
    println!("Watching {} (Ctrl-C to stop)", source.display());

    // notify's callback is synchronous; hop its events onto a tokio channel
    // so the select loop below can await them.
    let (event_tx, mut event_rx) = mpsc::channel::<notify::Event>(64);
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if event_tx.blocking_send(event).is_err() {
                        break; // watch loop is gone
                    }
                }
                Err(err) => eprintln!("watch: notify error: {err}"),
            }
        }
    });

    // When the output directory sits inside the watched tree, its writes
    // must not retrigger the build.
    let ignored_root = std::fs::canonicalize(output).ok();
    let mut debouncer = Debouncer::new(ignored_root);

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            Some(event) = event_rx.recv() => debouncer.add_event(&event),
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                if let Some(changed) = debouncer.take_if_ready() {
                    announce_changes(&center, &changed);
                    rebuild(source, output, &center, &mut sticky_errors);
                }
            }
        }
    }

    // Dropping the center aborts every outstanding dismiss timer.
    Ok(())
}

fn rebuild(
    source: &Path,
    output: &Path,
    center: &NoticeCenter,
    sticky_errors: &mut Vec<NoticeId>,
) {
    match generate::generate(source, output) {
        Ok(report) => {
            // A good build clears any standing error notices.
            for id in sticky_errors.drain(..) {
                center.hide(id);
            }
            center.show(
                format!("built {} pages", report.total_written()),
                ShowOptions {
                    tint: NoticeTint::Mint,
                    duration: Some(NOTICE_DISMISS),
                    show_close: false,
                },
            );
            for skip in &report.skips {
                center.show(
                    format!("skipped {}", skip.describe()),
                    ShowOptions {
                        tint: NoticeTint::Peach,
                        duration: Some(NOTICE_DISMISS),
                        show_close: true,
                    },
                );
            }
        }
        Err(err) => {
            let id = center.show(
                format!("build failed: {err}"),
                ShowOptions {
                    tint: NoticeTint::Rose,
                    duration: None,
                    show_close: true,
                },
            );
            sticky_errors.push(id);
        }
    }
}

fn announce_changes(center: &NoticeCenter, changed: &[PathBuf]) {
    let message = match changed {
        [single] => format!("changed: {}", file_label(single)),
        many => format!("changed: {} files", many.len()),
    };
    center.show(
        message,
        ShowOptions {
            tint: NoticeTint::Sky,
            duration: Some(NOTICE_DISMISS),
            show_close: false,
        },
    );
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Terminal painter
// ============================================================================

/// Print each notice once, in insertion order. Ids are monotonic, so one
/// high-water mark is enough to know what is new.
async fn display_loop(center: Weak<NoticeCenter>) {
    let Some(mut rx) = center.upgrade().map(|c| c.subscribe()) else {
        return;
    };
    let mut last_printed: Option<NoticeId> = None;
    while rx.changed().await.is_ok() {
        let Some(center) = center.upgrade() else {
            break;
        };
        for notice in center.notices() {
            if Some(notice.id) <= last_printed {
                continue;
            }
            print_notice(&notice);
            last_printed = Some(notice.id);
        }
    }
}

fn print_notice(notice: &Notice) {
    println!("{}", notice_line(notice));
}

/// One terminal line per notice. Closeable notices with no expiry are
/// marked sticky; nothing in the terminal can dismiss them.
fn notice_line(notice: &Notice) -> String {
    let line = format!("{} {}", tint_badge(notice.tint), notice.message);
    if notice.show_close && notice.duration.is_none() {
        format!("{} {}", line, "(sticky)".dimmed())
    } else {
        line
    }
}

fn tint_badge(tint: NoticeTint) -> String {
    let label = format!("[{}]", tint.name());
    match tint {
        NoticeTint::Mint => label.green().to_string(),
        NoticeTint::Sky => label.cyan().to_string(),
        NoticeTint::Peach => label.yellow().to_string(),
        NoticeTint::Rose => label.red().to_string(),
        NoticeTint::Lilac => label.magenta().to_string(),
        NoticeTint::Sand => label.dimmed().to_string(),
    }
}

// ============================================================================
// Debouncer
// ============================================================================

/// Pure debouncer: timing and path dedup only, no rebuild logic.
struct Debouncer {
    changes: BTreeSet<PathBuf>,
    last_event: Option<Instant>,
    last_build: Option<Instant>,
    /// Paths under this root never count as changes.
    ignored_root: Option<PathBuf>,
}

impl Debouncer {
    fn new(ignored_root: Option<PathBuf>) -> Self {
        Self {
            changes: BTreeSet::new(),
            last_event: None,
            last_build: None,
            ignored_root,
        }
    }

    fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;
        use notify::event::ModifyKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            // mtime/atime/chmod noise would loop the rebuild forever.
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) || self.is_ignored(path) {
                continue;
            }
            self.changes.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the changed paths if the quiet period and cooldown elapsed.
    fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        self.last_build = Some(Instant::now());
        let changes = std::mem::take(&mut self.changes);
        Some(changes.into_iter().collect())
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }
        if let Some(last_build) = self.last_build {
            if last_build.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS) {
                return false;
            }
        }
        !self.changes.is_empty()
    }

    /// How long the event loop may sleep before the next possible ready
    /// time.
    fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining =
            Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());
        let cooldown_remaining = self
            .last_build
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignored_root
            .as_deref()
            .is_some_and(|root| path.starts_with(root))
    }
}

/// Editor temp/backup artifacts that must not trigger rebuilds.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
