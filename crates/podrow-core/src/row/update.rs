//! The virtual clock, layout passes and show/hide hooks.

use podrow_types::{HostCommand, HostSink};
use podrow_ui::TabOrder;
use podrow_ui::timer::earliest;

use super::PodRow;

impl<H: HostSink> PodRow<H> {
    /// Move the clock forward by `ms`, firing every timer that comes due on
    /// the way in deadline order. Timers scheduled by a callback inside the
    /// window fire too.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now.saturating_add(ms);
        while let Some(at) = self.next_deadline().filter(|&at| at <= target) {
            self.now = self.now.max(at);
            self.fire_due();
        }
        self.now = target;
    }

    /// When the next timer of the row, a pod or a custom icon fires.
    pub fn next_deadline(&self) -> Option<u64> {
        let row = [
            self.images_timer.deadline(),
            self.flying_timer.deadline(),
            self.kiosk_error_timer.deadline(),
            self.after_show.deadline(),
        ];
        let pods = self.pods.iter().flat_map(|p| {
            [
                p.next_deadline(),
                p.custom_icon().and_then(|icon| icon.next_deadline()),
            ]
        });
        earliest(row.into_iter().chain(pods))
    }

    fn fire_due(&mut self) {
        let now = self.now;
        if self.images_timer.take_due(now).is_some() && self.images_loading {
            log::warn!(
                "{} user pod images did not load in time",
                self.pending_images.len()
            );
            self.images_loading = false;
        }
        if self.flying_timer.take_due(now).is_some() {
            self.flying_pods = true;
        }
        if self.kiosk_error_timer.take_due(now).is_some() {
            self.send(HostCommand::CheckKioskAppLaunchError);
        }
        if self.after_show.poll(now).is_some() {
            self.complete_after_show();
        }
        for index in 0..self.pods.len() {
            self.with_pod(index, |pod, ctx| pod.fire_due(ctx));
            self.with_icon(index, |icon, env| icon.fire_due(env));
        }
    }

    fn complete_after_show(&mut self) {
        if let Some(index) = self.after_show_pod.take() {
            self.reset_pod(index, true);
        }
        self.screen_ready = true;
        log::debug!("Pod row ready at {}ms", self.now);
    }

    /// Lay the pods out for the current viewport. Pods that do not fit are
    /// hidden.
    pub(super) fn place_pods(&mut self) {
        self.placement_postponed = false;
        let (width, height) = self.viewport;
        self.shape = self
            .layout
            .compute(self.pods.len(), width, height, self.banner_visible);

        let mut hidden = 0;
        for (index, pod) in self.pods.iter_mut().enumerate() {
            match self.layout.place(index, self.shape) {
                Some(position) => {
                    pod.state.hidden = false;
                    pod.state.position = position;
                },
                None => {
                    pod.state.hidden = true;
                    hidden += 1;
                },
            }
            if let Some((w, h)) = pod.state.measured_size {
                self.layout.check_pod_size(w, h);
            }
        }
        if hidden > 0 {
            log::info!(
                "{hidden} pods do not fit a {}x{} grid and are hidden",
                self.shape.columns,
                self.shape.rows
            );
        }
    }

    /// Re-place the pods only if the new viewport changes the grid.
    pub fn on_window_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        let shape = self
            .layout
            .compute(self.pods.len(), width, height, self.banner_visible);
        if shape != self.shape {
            self.place_pods();
        }
        self.scroll_focused_pod_into_view();
    }

    /// The row is about to be shown.
    pub fn handle_before_show(&mut self) {
        self.flying_pods = false;
        self.flying_timer.cancel();
        self.visible = true;
        self.header_bar_tab = TabOrder::HEADER_BAR;
        if self.placement_postponed {
            self.place_pods();
            self.maybe_preselect_pod();
        }
    }

    /// The row is on screen. The focused pod takes input focus once its
    /// show animation ends.
    pub fn handle_after_show(&mut self) {
        self.flying_timer.schedule(self.now, 0, ());
        match self.focused {
            Some(index) => {
                self.after_show_pod = Some(index);
                self.after_show
                    .start(self.now, self.config.timing.show_transition_ms);
            },
            None => self.screen_ready = true,
        }
    }

    pub fn handle_hide(&mut self) {
        self.visible = false;
        self.header_bar_tab = TabOrder::DOCUMENT;
    }

    /// A user pod's avatar finished loading.
    pub fn handle_pod_image_load(&mut self, username: &str) {
        let Some(pos) = self.pending_images.iter().position(|id| id == username) else {
            return;
        };
        self.pending_images.remove(pos);
        if self.pending_images.is_empty() {
            self.images_loading = false;
            self.images_timer.cancel();
        }
    }

    /// The renderer finished a transition on the pod at `index`.
    pub fn transition_end(&mut self, index: usize) {
        let consumed = self
            .with_pod(index, |pod, ctx| pod.transition_end(ctx))
            .unwrap_or(false);
        if consumed {
            return;
        }
        if self.after_show_pod == Some(index) && self.after_show.signal().is_some() {
            self.complete_after_show();
        }
    }
}
