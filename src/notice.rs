//! Transient notices with timed auto-dismissal.
//!
//! [`NoticeCenter`] is an in-memory ordered list of short-lived messages.
//! Watch mode shows one per build outcome and the terminal painter in
//! [`crate::watch`] repaints whenever the list changes.
//!
//! Lifecycle per item: shown → visible → (timer expiry or explicit
//! [`NoticeCenter::hide`]) → removed. Insertion order is display order.
//!
//! All mutation goes through `show`/`hide` under one mutex. Expiry timers
//! are one-shot tasks owned by the center's `JoinSet`, so dropping the
//! center aborts every outstanding timer; a timer task holds only a weak
//! reference to the list and cannot outlive it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};

/// The six pastel tints notices and section backgrounds share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTint {
    Mint,
    Sky,
    Peach,
    Rose,
    Lilac,
    Sand,
}

impl NoticeTint {
    pub const ALL: [NoticeTint; 6] = [
        NoticeTint::Mint,
        NoticeTint::Sky,
        NoticeTint::Peach,
        NoticeTint::Rose,
        NoticeTint::Lilac,
        NoticeTint::Sand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoticeTint::Mint => "mint",
            NoticeTint::Sky => "sky",
            NoticeTint::Peach => "peach",
            NoticeTint::Rose => "rose",
            NoticeTint::Lilac => "lilac",
            NoticeTint::Sand => "sand",
        }
    }
}

/// Process-unique notice handle. Ids are monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

/// How a notice should be shown.
#[derive(Debug, Clone, Copy)]
pub struct ShowOptions {
    pub tint: NoticeTint,
    /// `Some(d)` auto-dismisses after `d`; `None` stays until hidden.
    pub duration: Option<Duration>,
    pub show_close: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            tint: NoticeTint::Mint,
            duration: None,
            show_close: true,
        }
    }
}

/// A live notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub tint: NoticeTint,
    pub duration: Option<Duration>,
    pub show_close: bool,
}

struct State {
    items: Vec<Notice>,
    /// Abort handle per armed timer, keyed by notice id.
    timers: HashMap<NoticeId, AbortHandle>,
    revision: watch::Sender<u64>,
}

impl State {
    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

/// The notice manager.
///
/// `show` with a duration arms a tokio timer, so those calls must happen
/// inside a runtime. Everything else is plain synchronous state.
pub struct NoticeCenter {
    state: Arc<Mutex<State>>,
    /// Kept so `subscribe` works even while no display loop is attached.
    revision_rx: watch::Receiver<u64>,
    tasks: Mutex<JoinSet<()>>,
    next_id: AtomicU64,
}

impl NoticeCenter {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(State {
                items: Vec::new(),
                timers: HashMap::new(),
                revision: tx,
            })),
            revision_rx: rx,
            tasks: Mutex::new(JoinSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Show a notice. Returns its id, assigned synchronously, so two
    /// `show` calls in one burst get distinct ids in call order.
    pub fn show(&self, message: impl Into<String>, options: ShowOptions) -> NoticeId {
        let id = NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let notice = Notice {
            id,
            message: message.into(),
            tint: options.tint,
            duration: options.duration,
            show_close: options.show_close,
        };

        // The push and the timer arming share one state lock. A timer that
        // fires instantly (Duration::ZERO on a threaded runtime) blocks in
        // remove() until the lock drops, by which point the item and its
        // abort handle are both in place. Lock order is state then tasks;
        // no other path takes both.
        let mut state = lock(&self.state);
        state.items.push(notice);
        if let Some(duration) = options.duration {
            let weak = Arc::downgrade(&self.state);
            let mut tasks = lock(&self.tasks);
            // Reap timers that already fired.
            while tasks.try_join_next().is_some() {}
            let handle = tasks.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Some(state) = weak.upgrade() {
                    remove(&state, id);
                }
            });
            state.timers.insert(id, handle);
        }
        state.bump();
        id
    }

    /// Hide a notice and disarm its timer. Unknown ids are a no-op.
    pub fn hide(&self, id: NoticeId) {
        remove(&self.state, id);
    }

    /// Snapshot of live notices in insertion order.
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.state).items.clone()
    }

    /// A revision counter bumped on every list change. Display loops wait
    /// on it and repaint exactly when something changed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_rx.clone()
    }
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new()
    }
}

fn remove(state: &Mutex<State>, id: NoticeId) {
    let mut state = lock(state);
    let before = state.items.len();
    state.items.retain(|n| n.id != id);
    if let Some(handle) = state.timers.remove(&id) {
        handle.abort();
    }
    if state.items.len() != before {
        state.bump();
    }
}

// A panic while holding the lock leaves consistent state behind (push and
// retain keep the list valid), so poisoning is safe to ignore.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
