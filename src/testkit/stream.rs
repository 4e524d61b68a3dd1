//! Mock stream and executor implementations for testing.
//!
//! - [`ScriptedStream`] - Fixed queue of events and decode errors.
//! - [`ChannelStream`] - Channel-backed stream fed on demand by the test.
//! - [`RecordingExecutor`] - Keeps every plan it is asked to execute.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::{OrderPlan, QuoteEvent};
use crate::error::{Error, Result};
use crate::runtime::{ExecutionReport, OrderExecutor, QuoteStream};

// ---------------------------------------------------------------------------
// ScriptedStream
// ---------------------------------------------------------------------------

/// A stream that yields a fixed queue of items, then ends.
#[derive(Default)]
pub struct ScriptedStream {
    items: VecDeque<Result<QuoteEvent>>,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append events to the queue.
    pub fn with_events(mut self, events: Vec<QuoteEvent>) -> Self {
        self.items.extend(events.into_iter().map(Ok));
        self
    }

    /// Append one undecodable item to the queue.
    pub fn with_error(mut self, error: Error) -> Self {
        self.items.push_back(Err(error));
        self
    }

    /// Items not yet consumed.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl QuoteStream for ScriptedStream {
    async fn next_event(&mut self) -> Option<Result<QuoteEvent>> {
        self.items.pop_front()
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// ChannelStream
// ---------------------------------------------------------------------------

/// A stream backed by an unbounded channel; ends when every sender is dropped.
pub struct ChannelStream {
    rx: mpsc::UnboundedReceiver<QuoteEvent>,
}

impl ChannelStream {
    /// Create the stream and the handle that feeds it.
    pub fn new() -> (Self, mpsc::UnboundedSender<QuoteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }
}

#[async_trait]
impl QuoteStream for ChannelStream {
    async fn next_event(&mut self) -> Option<Result<QuoteEvent>> {
        self.rx.recv().await.map(Ok)
    }

    fn source_name(&self) -> &'static str {
        "channel"
    }
}

// ---------------------------------------------------------------------------
// RecordingExecutor
// ---------------------------------------------------------------------------

/// An executor that records plans and either accepts or rejects all of them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    plans: Mutex<Vec<OrderPlan>>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor whose every call returns an execution error.
    pub fn failing() -> Self {
        Self {
            plans: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Plans received so far, including rejected ones.
    pub fn plans(&self) -> Vec<OrderPlan> {
        self.plans.lock().clone()
    }
}

#[async_trait]
impl OrderExecutor for RecordingExecutor {
    async fn execute(&self, plan: &OrderPlan) -> Result<ExecutionReport> {
        self.plans.lock().push(plan.clone());
        if self.fail {
            return Err(Error::Execution(format!("rejected plan {}", plan.plan_id)));
        }
        Ok(ExecutionReport {
            plan_id: plan.plan_id,
            submitted: plan.len(),
            dry_run: false,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
