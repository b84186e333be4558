//! Live, throttled peer list.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use peerscope_core::{PresenceFeed, ViewPeerState};

use crate::context::{use_instance, use_tools};

/// Subscribe to presence and expose the throttled [`ViewPeerState`].
///
/// Stays loading until the instance is ready. The observer is stopped when
/// the calling component unmounts.
pub fn use_peers() -> Signal<ViewPeerState> {
    let window = use_tools().config.throttle_window();
    let handle = use_instance();
    let mut state = use_signal(ViewPeerState::loading);
    let feed: Rc<RefCell<Option<(PresenceFeed, Task)>>> =
        use_hook(|| Rc::new(RefCell::new(None)));

    let slot = feed.clone();
    use_effect(move || {
        let Some(instance) = handle.instance.read().clone() else {
            return;
        };

        let mut slot = slot.borrow_mut();
        if let Some((mut previous, forward)) = slot.take() {
            forward.cancel();
            previous.stop();
        }
        let started = PresenceFeed::start(instance.as_ref(), window);
        let mut updates = started.subscribe();

        let forward = spawn(async move {
            loop {
                let next = updates.borrow_and_update().clone();
                state.set(next);
                if updates.changed().await.is_err() {
                    break;
                }
            }
        });
        *slot = Some((started, forward));
    });

    use_drop(move || {
        if let Some((mut running, forward)) = feed.borrow_mut().take() {
            forward.cancel();
            running.stop();
        }
    });

    state
}
