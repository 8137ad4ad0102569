// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background resource warming
//!
//! Resources are warmed in fixed-size batches. Attempts within a batch run
//! concurrently and each one is isolated: a failure or timeout marks only
//! that resource as failed. Warming never blocks readiness.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tender_adapters::{ResourceClient, ResourceError};
use tender_core::{Resource, WarmState, WarmingOptions, WarmingStatus};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};

/// Warms resources and keeps the sessions it opened
pub struct ResourceWarmer<R: ResourceClient> {
    client: R,
    shared: Arc<WarmerShared<R::Session>>,
}

struct WarmerShared<S> {
    registry: Mutex<Registry<S>>,
    running: watch::Sender<bool>,
}

struct Registry<S> {
    cycle: u64,
    /// Resource names in warming order
    order: Vec<String>,
    states: HashMap<String, WarmState>,
    sessions: HashMap<String, Arc<S>>,
    errors: HashMap<String, String>,
    completed: bool,
    task: Option<AbortHandle>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            cycle: 0,
            order: Vec::new(),
            states: HashMap::new(),
            sessions: HashMap::new(),
            errors: HashMap::new(),
            completed: false,
            task: None,
        }
    }
}

impl<S> Registry<S> {
    fn reset(&mut self) {
        self.order.clear();
        self.states.clear();
        self.sessions.clear();
        self.errors.clear();
        self.completed = false;
    }

    fn advance(&mut self, name: &str, next: WarmState) -> bool {
        match self.states.get_mut(name) {
            Some(state) => {
                let before = *state;
                *state = before.transition(next);
                *state != before
            }
            None => false,
        }
    }

    fn names_in(&self, state: WarmState) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| self.states.get(*name) == Some(&state))
            .cloned()
            .collect()
    }
}

impl<S> WarmerShared<S> {
    fn lock(&self) -> MutexGuard<'_, Registry<S>> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<R: ResourceClient> ResourceWarmer<R> {
    pub fn new(client: R) -> Self {
        let (running, _) = watch::channel(false);
        Self {
            client,
            shared: Arc::new(WarmerShared {
                registry: Mutex::new(Registry::default()),
                running,
            }),
        }
    }

    /// Start a warming cycle, replacing any previous one
    ///
    /// Duplicate names keep their first occurrence. Must be called from
    /// within a tokio runtime.
    pub fn start(&self, resources: Vec<Resource>, options: WarmingOptions) {
        let mut seen = HashSet::new();
        let resources: Vec<Resource> = resources
            .into_iter()
            .filter(|r| seen.insert(r.name.clone()))
            .collect();

        let mut registry = self.shared.lock();
        if let Some(task) = registry.task.take() {
            task.abort();
        }
        registry.reset();
        registry.cycle += 1;
        let cycle = registry.cycle;

        for resource in &resources {
            registry.order.push(resource.name.clone());
            registry
                .states
                .insert(resource.name.clone(), WarmState::Pending);
        }

        if resources.is_empty() {
            registry.completed = true;
            self.shared.running.send_replace(false);
            return;
        }

        tracing::info!(
            cycle,
            resources = resources.len(),
            batch_size = options.batch_size,
            "starting resource warming"
        );
        self.shared.running.send_replace(true);
        let handle = tokio::spawn(run_cycle(
            self.client.clone(),
            Arc::clone(&self.shared),
            cycle,
            resources,
            options,
        ));
        registry.task = Some(handle.abort_handle());
    }

    /// Abort the current cycle and drop all sessions
    pub fn stop(&self) {
        let mut registry = self.shared.lock();
        if let Some(task) = registry.task.take() {
            task.abort();
            tracing::debug!(cycle = registry.cycle, "warming cycle stopped");
        }
        // Invalidate results from attempts that are still unwinding
        registry.cycle += 1;
        registry.reset();
        self.shared.running.send_replace(false);
    }

    pub fn status(&self) -> WarmingStatus {
        let registry = self.shared.lock();
        let succeeded = registry.names_in(WarmState::Warmed);
        let failed = registry.names_in(WarmState::Failed);
        WarmingStatus {
            running: *self.shared.running.borrow(),
            completed: registry.completed,
            total: registry.order.len(),
            pending: registry.order.len() - succeeded.len() - failed.len(),
            succeeded,
            failed,
        }
    }

    /// Session opened for a warmed resource
    pub fn session(&self, name: &str) -> Option<Arc<R::Session>> {
        self.shared.lock().sessions.get(name).cloned()
    }

    /// Why a resource failed to warm
    pub fn failure(&self, name: &str) -> Option<String> {
        self.shared.lock().errors.get(name).cloned()
    }

    /// Wait until no warming cycle is running
    pub async fn wait_idle(&self) {
        let mut running = self.shared.running.subscribe();
        let _ = running.wait_for(|running| !*running).await;
    }
}

async fn run_cycle<R: ResourceClient>(
    client: R,
    shared: Arc<WarmerShared<R::Session>>,
    cycle: u64,
    resources: Vec<Resource>,
    options: WarmingOptions,
) {
    let start = Instant::now();
    let batch_size = options.batch_size.max(1);

    for (index, batch) in resources.chunks(batch_size).enumerate() {
        if index > 0 && !options.inter_batch_delay.is_zero() {
            tokio::time::sleep(options.inter_batch_delay).await;
        }

        {
            let mut registry = shared.lock();
            if registry.cycle != cycle {
                return;
            }
            for resource in batch {
                registry.advance(&resource.name, WarmState::Warming);
            }
        }
        tracing::debug!(cycle, batch = index, size = batch.len(), "warming batch");

        let mut attempts = JoinSet::new();
        for resource in batch {
            let client = client.clone();
            let resource = resource.clone();
            let timeout = options.attempt_timeout;
            attempts.spawn(async move {
                let result = warm_one(&client, &resource, timeout).await;
                (resource.name, result)
            });
        }

        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok((name, result)) => record(&shared, cycle, name, result),
                Err(e) => tracing::warn!(cycle, error = %e, "warming attempt aborted"),
            }
        }

        // Anything still warming lost its attempt to a panic
        {
            let mut registry = shared.lock();
            if registry.cycle != cycle {
                return;
            }
            for resource in batch {
                if registry.advance(&resource.name, WarmState::Failed) {
                    registry
                        .errors
                        .insert(resource.name.clone(), "warming attempt aborted".to_string());
                }
            }
        }
    }

    let mut registry = shared.lock();
    if registry.cycle != cycle {
        return;
    }
    registry.completed = true;
    registry.task = None;
    let warmed = registry.names_in(WarmState::Warmed).len();
    let failed = registry.names_in(WarmState::Failed).len();
    shared.running.send_replace(false);
    tracing::info!(
        cycle,
        warmed,
        failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "resource warming complete"
    );
}

async fn warm_one<R: ResourceClient>(
    client: &R,
    resource: &Resource,
    timeout: Duration,
) -> Result<R::Session, String> {
    let attempt = async {
        let session = client.connect(resource).await?;
        let operations = client.probe(&session).await?;
        tracing::debug!(
            resource = %resource.name,
            operations = operations.len(),
            "resource probed"
        );
        Ok::<_, ResourceError>(session)
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(session)) => Ok(session),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {:?}", timeout)),
    }
}

fn record<S>(
    shared: &WarmerShared<S>,
    cycle: u64,
    name: String,
    result: Result<S, String>,
) {
    let mut registry = shared.lock();
    if registry.cycle != cycle {
        return;
    }
    match result {
        Ok(session) => {
            if registry.advance(&name, WarmState::Warmed) {
                tracing::debug!(resource = %name, "resource warmed");
                registry.sessions.insert(name, Arc::new(session));
            }
        }
        Err(reason) => {
            if registry.advance(&name, WarmState::Failed) {
                tracing::warn!(resource = %name, error = %reason, "resource warming failed");
                registry.errors.insert(name, reason);
            }
        }
    }
}

#[cfg(test)]
#[path = "warmer_tests.rs"]
mod tests;
