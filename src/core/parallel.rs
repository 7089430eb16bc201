use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Shared stop signal; workers finish their current item and start no more
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `f` over `items` on up to `jobs` scoped threads.
///
/// Results come back in item order. An item never started because of
/// cancellation yields `None`. Returns only after every worker has joined.
pub fn run_indexed<I, O, F>(items: &[I], jobs: usize, cancel: &CancelFlag, f: F) -> Vec<Option<O>>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Sync,
{
    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<O>>> = items.iter().map(|_| Mutex::new(None)).collect();
    let workers = jobs.max(1).min(items.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                if cancel.is_cancelled() {
                    break;
                }
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(item) = items.get(index) else {
                    break;
                };
                let output = f(item);
                let mut slot = slots[index].lock().unwrap_or_else(|p| p.into_inner());
                *slot = Some(output);
            });
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.into_inner().unwrap_or_else(|p| p.into_inner()))
        .collect()
}
