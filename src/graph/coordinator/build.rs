use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use eframe::egui::Vec2;
use log::{debug, info, warn};

use crate::graph::build::build_model;
use crate::graph::model::GraphModel;

use super::{GraphCoordinator, GraphStatus};

type BuildResult = Result<Option<GraphModel>, String>;

pub(super) struct PendingBuild {
    generation: u64,
    cancel: Arc<AtomicBool>,
    rx: Receiver<BuildResult>,
}

impl GraphCoordinator {
    /// Starts fetching and laying out the dataset on a worker thread. A build
    /// already in flight is cancelled and its result discarded.
    pub fn build_graph(&mut self, bounds: Vec2) {
        if let Some(previous) = self.pending.take() {
            previous.cancel.store(true, Ordering::Relaxed);
            info!("superseding graph build #{}", previous.generation);
        }

        self.generation += 1;
        let generation = self.generation;
        let cancel = Arc::new(AtomicBool::new(false));
        let pinned = self.carried_pins();
        let source = Arc::clone(&self.source);
        let config = self.config.clone();
        let worker_cancel = Arc::clone(&cancel);
        let (tx, rx) = mpsc::channel();

        info!("starting graph build #{generation} from {}", source.describe());
        thread::spawn(move || {
            let started = Instant::now();
            let result = source
                .fetch()
                .map_err(|error| format!("{error:#}"))
                .map(|dataset| {
                    if worker_cancel.load(Ordering::Relaxed) {
                        return None;
                    }
                    build_model(dataset, &pinned, bounds, &config, &worker_cancel)
                });
            debug!(
                "graph build #{generation} finished in {:.1} ms",
                started.elapsed().as_secs_f64() * 1000.0
            );
            if tx.send(result).is_err() {
                debug!("graph build #{generation} result discarded");
            }
        });

        self.pending = Some(PendingBuild {
            generation,
            cancel,
            rx,
        });
        self.status = GraphStatus::Computing;
    }

    pub fn is_building(&self) -> bool {
        self.pending.is_some()
    }

    /// Abandons the build in flight, returning to whatever graph was shown
    /// before it started.
    pub fn cancel_build(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        pending.cancel.store(true, Ordering::Relaxed);
        info!("cancelled graph build #{}", pending.generation);
        self.status = if self.model.is_empty() {
            GraphStatus::Idle
        } else {
            GraphStatus::Ready
        };
    }

    /// Installs a finished build, if any. Returns `true` when the status
    /// changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };

        match pending.rx.try_recv() {
            Ok(result) => {
                self.finish(pending.generation, result);
                true
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                false
            }
            Err(TryRecvError::Disconnected) => {
                self.fail(pending.generation, "graph build worker disconnected".to_owned());
                true
            }
        }
    }

    /// Blocks until the build in flight completes.
    pub fn wait_for_build(&mut self) -> &GraphStatus {
        if let Some(pending) = self.pending.take() {
            match pending.rx.recv() {
                Ok(result) => self.finish(pending.generation, result),
                Err(_) => {
                    self.fail(pending.generation, "graph build worker disconnected".to_owned())
                }
            }
        }
        &self.status
    }

    fn finish(&mut self, generation: u64, result: BuildResult) {
        if generation != self.generation {
            debug!("ignoring stale graph build #{generation}");
            return;
        }

        match result {
            Ok(Some(model)) => {
                info!(
                    "graph build #{generation} ready: {} people, {} relationships",
                    model.nodes.len(),
                    model.edges.len()
                );
                self.install(model);
            }
            Ok(None) => {
                debug!("graph build #{generation} was cancelled");
                self.status = if self.model.is_empty() {
                    GraphStatus::Idle
                } else {
                    GraphStatus::Ready
                };
            }
            Err(reason) => self.fail(generation, reason),
        }
    }

    fn fail(&mut self, generation: u64, reason: String) {
        warn!("graph build #{generation} failed: {reason}");
        self.model = GraphModel::default();
        self.visible = Default::default();
        self.clusters.clear();
        self.cluster_by_node.clear();
        self.selection.clear();
        self.pulls.clear();
        self.status = GraphStatus::Failed(reason);
        self.touch();
    }

    /// Positions of pinned nodes, keyed by id, for the next layout.
    fn carried_pins(&self) -> HashMap<String, Vec2> {
        self.model
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.pinned)
            .map(|(index, node)| {
                let position = self
                    .pulls
                    .get(&index)
                    .map_or(node.position, |pull| pull.original);
                (node.id.clone(), position)
            })
            .collect()
    }

    fn install(&mut self, model: GraphModel) {
        let selected_ids = self
            .selection
            .iter()
            .filter_map(|node| self.model.node(node).map(|node| node.id.clone()))
            .collect::<Vec<_>>();
        let anchor_id = self
            .selection
            .anchor()
            .and_then(|node| self.model.node(node))
            .map(|node| node.id.clone());

        self.model = model;
        self.pulls.clear();
        self.status = GraphStatus::Ready;

        let selected = selected_ids
            .iter()
            .filter_map(|id| self.model.node_index(id))
            .collect::<HashSet<_>>();
        let anchor = anchor_id.and_then(|id| self.model.node_index(&id));
        self.selection.replace(selected, anchor);
        self.apply_filters();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{Result, anyhow};
    use eframe::egui::vec2;
    use pretty_assertions::assert_eq;

    use super::super::testing::{ready, star};
    use super::*;
    use crate::config::EngineConfig;
    use crate::dataset::{Dataset, GraphSource};
    use crate::graph::events::EventSink;

    struct OfflineSource;

    impl GraphSource for OfflineSource {
        fn fetch(&self) -> Result<Dataset> {
            Err(anyhow!("server offline"))
        }

        fn describe(&self) -> String {
            "offline".to_owned()
        }
    }

    /// Holds `fetch` until the test releases it.
    struct GatedSource {
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl GraphSource for GatedSource {
        fn fetch(&self) -> Result<Dataset> {
            let release = self.release.lock().map_err(|_| anyhow!("poisoned"))?;
            let _ = release.recv_timeout(Duration::from_secs(5));
            Ok(star())
        }

        fn describe(&self) -> String {
            "gated".to_owned()
        }
    }

    #[test]
    fn failing_source_reports_reason() {
        let mut coordinator = GraphCoordinator::new(
            Arc::new(OfflineSource),
            EngineConfig::default(),
            EventSink::detached(),
        );
        coordinator.build_graph(vec2(800.0, 600.0));
        assert_eq!(coordinator.status(), &GraphStatus::Computing);

        match coordinator.wait_for_build() {
            GraphStatus::Failed(reason) => assert!(reason.contains("server offline")),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(coordinator.model().is_none());
    }

    #[test]
    fn second_build_supersedes_first() {
        let (mut coordinator, _events) = ready(star());
        coordinator.build_graph(vec2(800.0, 600.0));
        coordinator.build_graph(vec2(800.0, 600.0));
        assert_eq!(coordinator.generation, 3);

        assert_eq!(coordinator.wait_for_build(), &GraphStatus::Ready);
        assert!(!coordinator.is_building());
        assert!(!coordinator.poll());
        assert_eq!(coordinator.visible().node_count(), 5);
    }

    #[test]
    fn cancelled_build_never_lands() {
        let (release, gate) = mpsc::channel();
        let mut coordinator = GraphCoordinator::new(
            Arc::new(GatedSource {
                release: Mutex::new(gate),
            }),
            EngineConfig::default(),
            EventSink::detached(),
        );
        coordinator.build_graph(vec2(800.0, 600.0));
        coordinator.cancel_build();
        assert_eq!(coordinator.status(), &GraphStatus::Idle);

        let _ = release.send(());
        assert!(!coordinator.poll());
        assert_eq!(coordinator.wait_for_build(), &GraphStatus::Idle);
        assert!(coordinator.model().is_none());
    }

    #[test]
    fn rebuild_keeps_pins_hidden_and_selection() {
        let (mut coordinator, _events) = ready(star());
        let l2 = coordinator.model().and_then(|m| m.node_index("l2")).expect("l2");
        let l1 = coordinator.model().and_then(|m| m.node_index("l1")).expect("l1");
        coordinator.move_group(l2, vec2(31.0, -17.0), &[]);
        coordinator.pin_node("l2");
        let pinned_at = coordinator.model().map(|m| m.nodes[l2].position);
        coordinator.hide_node("l3");
        coordinator.select_only(l1);

        coordinator.build_graph(vec2(800.0, 600.0));
        assert_eq!(coordinator.wait_for_build(), &GraphStatus::Ready);

        let model = coordinator.model().expect("ready");
        let l2 = model.node_index("l2").expect("l2");
        assert_eq!(Some(model.nodes[l2].position), pinned_at);
        assert!(model.nodes[l2].pinned);
        assert_eq!(coordinator.visible().node_count(), 4);
        let l1 = model.node_index("l1");
        assert_eq!(coordinator.selection().anchor(), l1);
    }
}
